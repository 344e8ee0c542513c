use crate::domain::{BookId, BorrowId, FilterError, ReportError, TransitionError};
use crate::ports::library_api::ApiError;
use thiserror::Error;

/// 画面操作のエラー
///
/// 表示文はそのまま利用者への通知に使われる。
#[derive(Debug, Error)]
pub enum PageError {
    /// バックエンド呼び出しの失敗
    #[error(transparent)]
    Api(#[from] ApiError),

    /// 現在の状態では許可されていない操作
    #[error("{0}")]
    Transition(TransitionError),

    /// 絞り込み条件の入力エラー
    #[error("{0}")]
    Filter(FilterError),

    /// 帳票作成のエラー
    #[error("{0}")]
    Report(ReportError),

    /// 書籍が見つからない
    #[error("Buku tidak ditemukan!")]
    BookNotFound(BookId),

    /// 取引が一覧にない
    #[error("Transaksi #{0} tidak ditemukan")]
    BorrowNotFound(BorrowId),

    /// 請求書をまだ発行できない取引
    #[error("Invoice belum tersedia untuk transaksi #{0}")]
    InvoiceUnavailable(BorrowId),

    /// 在庫切れの書籍への貸出申請
    #[error("Maaf, stok buku ini sedang habis.")]
    OutOfStock(BookId),

    /// この書籍の種類では実行できない操作
    #[error("Buku ini tidak dapat {0}")]
    Unsupported(&'static str),

    /// 未知の管理操作
    #[error("Aksi tidak dikenal: {0}")]
    UnknownAction(String),

    /// 役割が空
    #[error("Role tidak boleh kosong")]
    EmptyRole,

    /// ログインが必要な操作
    #[error("Silakan login terlebih dahulu untuk mengakses fitur ini.")]
    LoginRequired,

    /// 文書の描画失敗
    #[error("Gagal membuat dokumen")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PageError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, PageError::Api(ApiError::Unauthorized))
    }
}

impl From<TransitionError> for PageError {
    fn from(err: TransitionError) -> Self {
        PageError::Transition(err)
    }
}

impl From<FilterError> for PageError {
    fn from(err: FilterError) -> Self {
        PageError::Filter(err)
    }
}

impl From<ReportError> for PageError {
    fn from(err: ReportError) -> Self {
        PageError::Report(err)
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, PageError>;
