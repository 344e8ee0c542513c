use crate::application::{PageContext, Result, guard, surface};
use crate::domain::catalog::{Audience, Book, BookCard, BookType, CatalogFilter};

/// 書籍一覧画面（会員・管理者）
///
/// 絞り込み条件が変わるたびに /books を取得し直す。取得に失敗した場合は
/// 条件も一覧も変更前のまま残る。
pub struct CatalogPage {
    ctx: PageContext,
    audience: Audience,
    filter: CatalogFilter,
    books: Vec<Book>,
}

impl CatalogPage {
    pub fn new(ctx: PageContext, audience: Audience) -> Self {
        Self {
            ctx,
            audience,
            filter: CatalogFilter::new(),
            books: Vec::new(),
        }
    }

    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// 純粋関数：(条件, 一覧) からカードを作る
    pub fn cards(&self) -> Vec<BookCard> {
        self.books
            .iter()
            .map(|book| BookCard::render(book, &self.filter, self.audience))
            .collect()
    }

    /// 現在の条件で取得し直す
    pub async fn load(&mut self) -> Result<()> {
        self.apply(self.filter.clone()).await
    }

    pub async fn search(&mut self, query: &str) -> Result<()> {
        let mut next = self.filter.clone();
        next.set_search(query);
        self.apply(next).await
    }

    pub async fn toggle_type(&mut self, book_type: BookType) -> Result<()> {
        let mut next = self.filter.clone();
        next.toggle_type(book_type);
        self.apply(next).await
    }

    pub async fn toggle_category(&mut self, category: &str) -> Result<()> {
        let mut next = self.filter.clone();
        next.toggle_category(category);
        self.apply(next).await
    }

    pub async fn toggle_genre(&mut self, genre: &str) -> Result<()> {
        let mut next = self.filter.clone();
        next.toggle_genre(genre);
        self.apply(next).await
    }

    /// 任意のジャンルを追加する。空や重複は通知のみで取得しない
    pub async fn add_custom_genre(&mut self, input: &str) -> Result<()> {
        let mut next = self.filter.clone();
        if let Err(e) = next.add_custom_genre(input) {
            return Err(surface(&self.ctx, e.into()).await);
        }
        self.apply(next).await
    }

    pub async fn reset(&mut self) -> Result<()> {
        let mut next = self.filter.clone();
        next.reset();
        self.apply(next).await
    }

    async fn apply(&mut self, next: CatalogFilter) -> Result<()> {
        tracing::debug!(query = ?next.to_query_pairs(), "Loading catalog");
        let books = guard(&self.ctx, self.ctx.api.list_books(&next).await).await?;
        self.filter = next;
        self.books = books;
        Ok(())
    }
}
