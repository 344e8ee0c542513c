use crate::application::{ActionOutcome, PageContext, Result, guard};
use crate::domain::BookId;
use crate::domain::catalog::{Audience, Book, BookCard, CatalogFilter};

/// ブックマーク一覧画面
///
/// 一度だけ取得し、検索はメモリ上で書名に対して行う。
pub struct BookmarksPage {
    ctx: PageContext,
    bookmarks: Vec<Book>,
    search: String,
}

impl BookmarksPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            bookmarks: Vec::new(),
            search: String::new(),
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.bookmarks = guard(&self.ctx, self.ctx.api.list_bookmarks().await).await?;
        Ok(())
    }

    pub fn bookmarks(&self) -> &[Book] {
        &self.bookmarks
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.trim().to_lowercase();
    }

    pub fn visible(&self) -> Vec<&Book> {
        self.bookmarks
            .iter()
            .filter(|b| b.title.to_lowercase().contains(&self.search))
            .collect()
    }

    /// 件数表示（`3 Buku`）
    pub fn total_label(&self) -> String {
        format!("{} Buku", self.visible().len())
    }

    pub fn cards(&self) -> Vec<BookCard> {
        let filter = CatalogFilter::default();
        self.visible()
            .into_iter()
            .map(|b| BookCard::render(b, &filter, Audience::Member))
            .collect()
    }

    /// 確認のうえブックマークを外し、保持している一覧からその1件だけを除く
    pub async fn remove(&mut self, book_id: BookId) -> Result<ActionOutcome> {
        let prompt = self
            .bookmarks
            .iter()
            .find(|b| b.id == book_id)
            .map(|b| format!("Hapus buku \"{}\" dari bookmark?", b.title))
            .unwrap_or_else(|| "Hapus buku ini dari bookmark?".to_string());

        if !self.ctx.notifier.confirm(&prompt).await {
            return Ok(ActionOutcome::Declined);
        }

        guard(&self.ctx, self.ctx.api.remove_bookmark(book_id).await).await?;
        tracing::info!("Bookmark removed: {}", book_id);
        self.bookmarks.retain(|b| b.id != book_id);
        Ok(ActionOutcome::Applied)
    }
}
