use crate::domain::{
    BookId, BorrowId, BorrowRequest, HistoryId, StatusUpdate, UserId,
    catalog::{Book, BookUpdate, CatalogFilter, NewBook, Recommendation},
    member::{Member, RoleUpdate},
    reading::{EbookHistoryItem, ProgressUpdate, ReadingProgress},
};
use async_trait::async_trait;
use thiserror::Error;

/// バックエンド呼び出しの失敗
///
/// どの失敗も呼び出し側では同じように扱う（記録して通知し、状態は変えない）。
/// 401 だけはログイン画面への遷移に使うため区別する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 通信失敗、または 2xx 以外の応答（本文はそのまま保持）
    #[error("{body}")]
    Transport { status: Option<u16>, body: String },

    /// `success: false` の応答
    #[error("Gagal: {0}")]
    Rejected(String),

    /// HTTP 401（セッション切れ）
    #[error("Sesi berakhir, silakan login kembali")]
    Unauthorized,

    /// 2xx だが本文が期待した形でない
    #[error("Respons tidak valid: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn transport(body: impl Into<String>) -> Self {
        ApiError::Transport {
            status: None,
            body: body.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// バックエンド呼び出しの Result型
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// 更新系エンドポイントの成功応答
///
/// `{success: true, message}` のほか、`{status: "ok"}` や平文の本文も成功として受ける。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ack {
    pub message: Option<String>,
}

impl Ack {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// 表示用メッセージ（なければ既定文）
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
    }
}

/// 図書館バックエンドのポート
///
/// 各画面はこのトレイトだけを通してバックエンドと通信する。
#[async_trait]
pub trait LibraryApi: Send + Sync {
    // --- カタログ ---

    /// GET /books（search, type, category, 繰り返しの genre）
    async fn list_books(&self, filter: &CatalogFilter) -> ApiResult<Vec<Book>>;

    /// POST /add-book（multipart）
    async fn add_book(&self, book: &NewBook) -> ApiResult<Ack>;

    /// POST /books/update（multipart）
    async fn update_book(&self, book: &BookUpdate) -> ApiResult<Ack>;

    /// DELETE /books/{id}
    async fn delete_book(&self, id: BookId) -> ApiResult<Ack>;

    /// GET /api/books/random
    async fn random_books(&self) -> ApiResult<Vec<Recommendation>>;

    // --- ブックマーク ---

    /// GET /api/bookmarks
    async fn list_bookmarks(&self) -> ApiResult<Vec<Book>>;

    /// POST /bookmark
    async fn add_bookmark(&self, book_id: BookId) -> ApiResult<Ack>;

    /// DELETE /bookmark
    async fn remove_bookmark(&self, book_id: BookId) -> ApiResult<Ack>;

    /// GET /bookmark/status?bookId=
    async fn bookmark_status(&self, book_id: BookId) -> ApiResult<bool>;

    // --- 貸出 ---

    /// POST /pinjambuku
    async fn request_borrow(&self, book_id: BookId) -> ApiResult<Ack>;

    /// GET /api/riwayat-pinjam（ログイン中の会員の履歴）
    async fn borrow_history(&self) -> ApiResult<Vec<BorrowRequest>>;

    /// PATCH /api/member/riwayat-pinjam/{id}（会員による取消）
    async fn cancel_borrow(&self, id: BorrowId) -> ApiResult<Ack>;

    /// GET /api/admin/daftar-pinjam/
    async fn borrow_queue(&self) -> ApiResult<Vec<BorrowRequest>>;

    /// PATCH /api/admin/daftar-pinjam/{id}
    async fn update_borrow_status(&self, id: BorrowId, update: &StatusUpdate) -> ApiResult<Ack>;

    // --- 会員管理 ---

    /// GET /api/members（任意の search）
    async fn list_members(&self, search: Option<&str>) -> ApiResult<Vec<Member>>;

    /// PUT /api/members/{id}/role
    async fn update_member_role(&self, id: UserId, update: &RoleUpdate) -> ApiResult<Ack>;

    /// DELETE /api/members/{id}
    async fn delete_member(&self, id: UserId) -> ApiResult<Ack>;

    // --- 電子書籍 ---

    /// GET /api/ebook/history
    async fn ebook_history(&self) -> ApiResult<Vec<EbookHistoryItem>>;

    /// DELETE /api/ebook/history?id=
    async fn delete_ebook_history(&self, id: HistoryId) -> ApiResult<Ack>;

    /// POST /api/ebook/progress
    async fn save_progress(&self, update: &ProgressUpdate) -> ApiResult<Ack>;

    /// GET /api/ebook/progress?bookId=
    async fn reading_progress(&self, book_id: BookId) -> ApiResult<ReadingProgress>;

    // --- セッション ---

    /// GET /api/check-session
    async fn check_session(&self) -> ApiResult<bool>;
}
