#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use libra_client::adapters::mock::{Navigator, Notifier};
use libra_client::application::PageContext;
use libra_client::config::ClientConfig;
use libra_client::domain::catalog::{
    Book, BookType, BookUpdate, CatalogFilter, NewBook, Recommendation,
};
use libra_client::domain::member::{Member, Role, RoleUpdate};
use libra_client::domain::reading::{EbookHistoryItem, ProgressUpdate, ReadingProgress};
use libra_client::domain::{
    BookId, BorrowId, BorrowRequest, BorrowStatus, HistoryId, Rupiah, StatusUpdate, UserId,
    parse_timestamp,
};
use libra_client::ports::library_api::{Ack, ApiError, ApiResult, LibraryApi};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ============================================================================
// インメモリ LibraryApi（テスト用）
// ============================================================================

/// インメモリのバックエンド
///
/// 呼び出しを `"GET /books"` の形式で記録する。
/// `fail_with` を設定すると、以降の呼び出しはすべてそのエラーで失敗する。
#[derive(Default)]
pub struct InMemoryLibraryApi {
    books: Mutex<Vec<Book>>,
    bookmarks: Mutex<Vec<BookId>>,
    borrows: Mutex<Vec<BorrowRequest>>,
    members: Mutex<Vec<Member>>,
    history: Mutex<Vec<EbookHistoryItem>>,
    progress: Mutex<HashMap<BookId, u32>>,
    recommendations: Mutex<Vec<Recommendation>>,
    logged_in: Mutex<bool>,
    failure: Mutex<Option<ApiError>>,
    calls: Mutex<Vec<String>>,
    queries: Mutex<Vec<Vec<(&'static str, String)>>>,
}

impl InMemoryLibraryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(self, books: Vec<Book>) -> Self {
        *self.books.lock().unwrap() = books;
        self
    }

    pub fn with_bookmarks(self, ids: Vec<BookId>) -> Self {
        *self.bookmarks.lock().unwrap() = ids;
        self
    }

    pub fn with_borrows(self, borrows: Vec<BorrowRequest>) -> Self {
        *self.borrows.lock().unwrap() = borrows;
        self
    }

    pub fn with_members(self, members: Vec<Member>) -> Self {
        *self.members.lock().unwrap() = members;
        self
    }

    pub fn with_history(self, items: Vec<EbookHistoryItem>) -> Self {
        *self.history.lock().unwrap() = items;
        self
    }

    pub fn with_recommendations(self, items: Vec<Recommendation>) -> Self {
        *self.recommendations.lock().unwrap() = items;
        self
    }

    pub fn logged_in(self, logged_in: bool) -> Self {
        *self.logged_in.lock().unwrap() = logged_in;
        self
    }

    pub fn fail_with(&self, error: ApiError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// 読み取り以外の呼び出し
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("GET"))
            .collect()
    }

    pub fn last_query(&self) -> Option<Vec<(&'static str, String)>> {
        self.queries.lock().unwrap().last().cloned()
    }

    pub fn borrow_status(&self, id: BorrowId) -> Option<BorrowStatus> {
        self.borrows
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.status.clone())
    }

    pub fn bookmark_ids(&self) -> Vec<BookId> {
        self.bookmarks.lock().unwrap().clone()
    }

    pub fn member_role(&self, id: UserId) -> Option<Role> {
        self.members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.role.clone())
    }

    fn enter(&self, call: String) -> ApiResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn matches_filter(book: &Book, filter: &CatalogFilter) -> bool {
    let search = filter.search.trim().to_lowercase();
    if !search.is_empty() && !book.title.to_lowercase().contains(&search) {
        return false;
    }
    if filter.book_type.as_ref().is_some_and(|t| t != &book.book_type) {
        return false;
    }
    if filter.category.as_ref().is_some_and(|c| c != &book.category) {
        return false;
    }
    let genres = book.genres();
    filter.genres.iter().all(|g| genres.contains(g))
}

#[async_trait]
impl LibraryApi for InMemoryLibraryApi {
    async fn list_books(&self, filter: &CatalogFilter) -> ApiResult<Vec<Book>> {
        self.queries.lock().unwrap().push(filter.to_query_pairs());
        self.enter("GET /books".to_string())?;
        let books = self.books.lock().unwrap();
        Ok(books
            .iter()
            .filter(|b| matches_filter(b, filter))
            .cloned()
            .collect())
    }

    async fn add_book(&self, book: &NewBook) -> ApiResult<Ack> {
        self.enter(format!("POST /add-book {}", book.title))?;
        Ok(Ack::default())
    }

    async fn update_book(&self, book: &BookUpdate) -> ApiResult<Ack> {
        self.enter(format!("POST /books/update {}", book.id))?;
        Ok(Ack::with_message("Buku berhasil diperbarui"))
    }

    async fn delete_book(&self, id: BookId) -> ApiResult<Ack> {
        self.enter(format!("DELETE /books/{}", id))?;
        self.books.lock().unwrap().retain(|b| b.id != id);
        Ok(Ack::default())
    }

    async fn random_books(&self) -> ApiResult<Vec<Recommendation>> {
        self.enter("GET /api/books/random".to_string())?;
        Ok(self.recommendations.lock().unwrap().clone())
    }

    async fn list_bookmarks(&self) -> ApiResult<Vec<Book>> {
        self.enter("GET /api/bookmarks".to_string())?;
        let ids = self.bookmarks.lock().unwrap();
        let books = self.books.lock().unwrap();
        Ok(books.iter().filter(|b| ids.contains(&b.id)).cloned().collect())
    }

    async fn add_bookmark(&self, book_id: BookId) -> ApiResult<Ack> {
        self.enter(format!("POST /bookmark {}", book_id))?;
        self.bookmarks.lock().unwrap().push(book_id);
        Ok(Ack::default())
    }

    async fn remove_bookmark(&self, book_id: BookId) -> ApiResult<Ack> {
        self.enter(format!("DELETE /bookmark {}", book_id))?;
        self.bookmarks.lock().unwrap().retain(|id| *id != book_id);
        Ok(Ack::default())
    }

    async fn bookmark_status(&self, book_id: BookId) -> ApiResult<bool> {
        self.enter(format!("GET /bookmark/status {}", book_id))?;
        Ok(self.bookmarks.lock().unwrap().contains(&book_id))
    }

    async fn request_borrow(&self, book_id: BookId) -> ApiResult<Ack> {
        self.enter(format!("POST /pinjambuku {}", book_id))?;
        Ok(Ack::with_message("Pengajuan berhasil"))
    }

    async fn borrow_history(&self) -> ApiResult<Vec<BorrowRequest>> {
        self.enter("GET /api/riwayat-pinjam".to_string())?;
        Ok(self.borrows.lock().unwrap().clone())
    }

    async fn cancel_borrow(&self, id: BorrowId) -> ApiResult<Ack> {
        self.enter(format!("PATCH /api/member/riwayat-pinjam/{}", id))?;
        if let Some(b) = self.borrows.lock().unwrap().iter_mut().find(|b| b.id == id) {
            b.status = BorrowStatus::Canceled;
        }
        Ok(Ack::default())
    }

    async fn borrow_queue(&self) -> ApiResult<Vec<BorrowRequest>> {
        self.enter("GET /api/admin/daftar-pinjam/".to_string())?;
        Ok(self.borrows.lock().unwrap().clone())
    }

    async fn update_borrow_status(&self, id: BorrowId, update: &StatusUpdate) -> ApiResult<Ack> {
        self.enter(format!(
            "PATCH /api/admin/daftar-pinjam/{} {}",
            id, update.status
        ))?;
        if let Some(b) = self.borrows.lock().unwrap().iter_mut().find(|b| b.id == id) {
            b.status = update.status.clone();
        }
        Ok(Ack::with_message("Status berhasil diubah"))
    }

    async fn list_members(&self, search: Option<&str>) -> ApiResult<Vec<Member>> {
        self.enter(format!("GET /api/members {}", search.unwrap_or("")))?;
        let query = search.unwrap_or("").to_lowercase();
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .filter(|m| query.is_empty() || m.username.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    async fn update_member_role(&self, id: UserId, update: &RoleUpdate) -> ApiResult<Ack> {
        self.enter(format!("PUT /api/members/{}/role {}", id, update.role))?;
        if let Some(m) = self.members.lock().unwrap().iter_mut().find(|m| m.id == id) {
            m.role = update.role.clone();
        }
        Ok(Ack::default())
    }

    async fn delete_member(&self, id: UserId) -> ApiResult<Ack> {
        self.enter(format!("DELETE /api/members/{}", id))?;
        self.members.lock().unwrap().retain(|m| m.id != id);
        Ok(Ack::default())
    }

    async fn ebook_history(&self) -> ApiResult<Vec<EbookHistoryItem>> {
        self.enter("GET /api/ebook/history".to_string())?;
        Ok(self.history.lock().unwrap().clone())
    }

    async fn delete_ebook_history(&self, id: HistoryId) -> ApiResult<Ack> {
        self.enter(format!("DELETE /api/ebook/history {}", id))?;
        self.history.lock().unwrap().retain(|h| h.id != id);
        Ok(Ack::default())
    }

    async fn save_progress(&self, update: &ProgressUpdate) -> ApiResult<Ack> {
        self.enter(format!(
            "POST /api/ebook/progress {} {}",
            update.book_id, update.page
        ))?;
        self.progress
            .lock()
            .unwrap()
            .insert(update.book_id, update.page);
        Ok(Ack::default())
    }

    async fn reading_progress(&self, book_id: BookId) -> ApiResult<ReadingProgress> {
        self.enter(format!("GET /api/ebook/progress {}", book_id))?;
        Ok(self
            .progress
            .lock()
            .unwrap()
            .get(&book_id)
            .map(|page| ReadingProgress { page: *page })
            .unwrap_or_default())
    }

    async fn check_session(&self) -> ApiResult<bool> {
        self.enter("GET /api/check-session".to_string())?;
        Ok(*self.logged_in.lock().unwrap())
    }
}

// ============================================================================
// 画面コンテキスト
// ============================================================================

pub const LOGIN_URL: &str = "http://localhost:8080/login";

/// テスト用の画面コンテキスト
pub struct Harness {
    pub api: Arc<InMemoryLibraryApi>,
    pub notifier: Arc<Notifier>,
    pub navigator: Arc<Navigator>,
    pub ctx: PageContext,
}

impl Harness {
    pub fn new(api: InMemoryLibraryApi) -> Self {
        Self::with_notifier(api, Notifier::new())
    }

    /// すべての確認を拒否する
    pub fn declining(api: InMemoryLibraryApi) -> Self {
        Self::with_notifier(api, Notifier::declining())
    }

    fn with_notifier(api: InMemoryLibraryApi, notifier: Notifier) -> Self {
        let api = Arc::new(api);
        let notifier = Arc::new(notifier);
        let navigator = Arc::new(Navigator::new());
        let ctx = PageContext::new(
            &ClientConfig::default(),
            api.clone(),
            notifier.clone(),
            navigator.clone(),
        );
        Self {
            api,
            notifier,
            navigator,
            ctx,
        }
    }
}

// ============================================================================
// テストデータ
// ============================================================================

pub fn at(raw: &str) -> DateTime<FixedOffset> {
    parse_timestamp(raw).unwrap()
}

pub fn book(id: i64, title: &str, book_type: BookType, stock: i64, genre: &str) -> Book {
    Book {
        id: BookId::new(id),
        title: title.to_string(),
        author: "Tere Liye".to_string(),
        year: 2019,
        genre: genre.to_string(),
        category: "Fiksi".to_string(),
        book_type,
        stock,
        fine_amount: Rupiah::new(75_000),
        description: String::new(),
        cover_file: String::new(),
        location: "Rak B2".to_string(),
        ebook_file: String::new(),
    }
}

pub fn borrow(id: i64, title: &str, status: BorrowStatus) -> BorrowRequest {
    BorrowRequest {
        id: BorrowId::new(id),
        book_id: Some(BookId::new(id * 10)),
        book_title: title.to_string(),
        user_name: Some(format!("anggota{}", id)),
        cover_file: String::new(),
        status,
        date_requested: at("2025-08-01 09:00:00"),
        date_approved: None,
        date_borrowed: None,
        date_due: None,
        date_returned: None,
        date_lost: None,
        date_rejected: None,
        date_canceled: None,
        fine_total: Rupiah::ZERO,
        book_price: Rupiah::new(75_000),
        fine_per_day: None,
    }
}

pub fn member(id: i64, username: &str, role: Role) -> Member {
    Member {
        id: UserId::new(id),
        fullname: format!("{} Lengkap", username),
        username: username.to_string(),
        email: format!("{}@libra.id", username),
        role,
        profile_picture: String::new(),
    }
}

pub fn history_item(id: i64, book_id: i64, title: &str) -> EbookHistoryItem {
    EbookHistoryItem {
        id: HistoryId::new(id),
        book_id: BookId::new(book_id),
        title: title.to_string(),
        cover_file: String::new(),
        last_page: 12,
        date_last_read: Some(at("2025-08-17 20:15:00")),
    }
}

// ============================================================================
// HTTP スタブサーバー
// ============================================================================

/// ルーターを 127.0.0.1 の空きポートで起動し、ベースURLを返す
pub async fn spawn_backend(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router.layer(tower_http::trace::TraceLayer::new_for_http());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
