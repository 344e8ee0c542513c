use crate::application::{ActionOutcome, PageContext, Result, guard};
use crate::domain::catalog::{Audience, Book, BookCard, CatalogFilter};
use crate::domain::reading::{EbookHistoryItem, ProgressUpdate, ReadingProgress};
use crate::domain::{BookId, HistoryId};

/// 電子書籍の棚
///
/// 検索語だけを送り、閲覧できる書籍（Ebook / Fisik & Ebook）だけを残す。
pub struct EbookShelfPage {
    ctx: PageContext,
    search: String,
    books: Vec<Book>,
}

impl EbookShelfPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            search: String::new(),
            books: Vec::new(),
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.fetch(self.search.clone()).await
    }

    pub async fn search(&mut self, query: &str) -> Result<()> {
        self.fetch(query.trim().to_string()).await
    }

    async fn fetch(&mut self, search: String) -> Result<()> {
        let mut filter = CatalogFilter::new();
        filter.set_search(search.clone());

        let books = guard(&self.ctx, self.ctx.api.list_books(&filter).await).await?;
        self.books = books
            .into_iter()
            .filter(|b| b.book_type.is_readable())
            .collect();
        self.search = search;
        Ok(())
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn cards(&self) -> Vec<BookCard> {
        let filter = CatalogFilter::default();
        self.books
            .iter()
            .map(|b| BookCard::render(b, &filter, Audience::Member))
            .collect()
    }
}

/// 電子書籍の閲覧履歴画面
pub struct EbookHistoryPage {
    ctx: PageContext,
    items: Vec<EbookHistoryItem>,
    search: String,
}

impl EbookHistoryPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            items: Vec::new(),
            search: String::new(),
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.items = guard(&self.ctx, self.ctx.api.ebook_history().await).await?;
        Ok(())
    }

    pub fn items(&self) -> &[EbookHistoryItem] {
        &self.items
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.trim().to_string();
    }

    pub fn visible(&self) -> Vec<&EbookHistoryItem> {
        self.items
            .iter()
            .filter(|item| item.matches_search(&self.search))
            .collect()
    }

    /// 確認のうえ履歴を1件削除し、保持している一覧からも除く
    pub async fn remove(&mut self, id: HistoryId) -> Result<ActionOutcome> {
        let title = self
            .items
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.delete_prompt())
            .unwrap_or_else(|| "Hapus riwayat baca ini?".to_string());

        if !self.ctx.notifier.confirm(&title).await {
            return Ok(ActionOutcome::Declined);
        }

        guard(&self.ctx, self.ctx.api.delete_ebook_history(id).await).await?;
        tracing::info!("Reading history {} removed", id);
        self.items.retain(|item| item.id != id);
        Ok(ActionOutcome::Applied)
    }
}

/// 読書位置を保存する
pub async fn save_progress(ctx: &PageContext, book_id: BookId, page: u32) -> Result<()> {
    let update = ProgressUpdate {
        book_id,
        page: page.max(1),
    };
    guard(ctx, ctx.api.save_progress(&update).await).await?;
    tracing::debug!("Progress saved: book {} page {}", book_id, update.page);
    Ok(())
}

/// 読書位置を取得する（記録がなければ1ページ目）
pub async fn load_progress(ctx: &PageContext, book_id: BookId) -> Result<ReadingProgress> {
    guard(ctx, ctx.api.reading_progress(book_id).await).await
}
