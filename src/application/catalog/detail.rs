use crate::application::{ActionOutcome, PageContext, PageError, Result, guard, surface};
use crate::domain::catalog::{Audience, Book, BookCard, CatalogFilter};
use crate::domain::{BookId, Rupiah};

const LOGIN_PROMPT: &str = "Silakan login terlebih dahulu untuk mengakses fitur ini.";

/// 書籍詳細の表示用モデル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetailView {
    pub card: BookCard,
    pub type_label: String,
    pub genre: String,
    pub synopsis: String,
    pub location: String,
    /// 電子書籍のみの場合は `None`
    pub stock_line: Option<String>,
    pub can_read: bool,
    pub can_borrow: bool,
    /// 紛失時の弁償額（貸出確認で提示）
    pub replacement_cost: Rupiah,
    pub bookmarked: bool,
}

/// 書籍詳細画面（会員）
pub struct BookDetailPage {
    ctx: PageContext,
    book_id: BookId,
    logged_in: bool,
    book: Option<Book>,
    bookmarked: bool,
}

impl BookDetailPage {
    pub fn new(ctx: PageContext, book_id: BookId, logged_in: bool) -> Self {
        Self {
            ctx,
            book_id,
            logged_in,
            book: None,
            bookmarked: false,
        }
    }

    pub fn book(&self) -> Option<&Book> {
        self.book.as_ref()
    }

    pub fn is_bookmarked(&self) -> bool {
        self.bookmarked
    }

    /// 書籍とブックマーク状態を並行して取得する
    ///
    /// ブックマーク状態の取得失敗は記録のみで、未登録として扱う。
    pub async fn load(&mut self) -> Result<()> {
        let filter = CatalogFilter::default();
        let api = &self.ctx.api;

        let (books, bookmarked) = if self.logged_in {
            let (books, status) =
                futures::join!(api.list_books(&filter), api.bookmark_status(self.book_id));
            let bookmarked = status.unwrap_or_else(|e| {
                tracing::warn!("Bookmark status unavailable for {}: {}", self.book_id, e);
                false
            });
            (books, bookmarked)
        } else {
            (api.list_books(&filter).await, false)
        };

        let books = guard(&self.ctx, books).await?;
        let Some(book) = books.into_iter().find(|b| b.id == self.book_id) else {
            return Err(surface(&self.ctx, PageError::BookNotFound(self.book_id)).await);
        };

        self.book = Some(book);
        self.bookmarked = bookmarked;
        Ok(())
    }

    /// 純粋関数：表示用モデル
    pub fn view(&self) -> Option<BookDetailView> {
        let book = self.book.as_ref()?;
        let or_dash = |s: &str| {
            if s.trim().is_empty() {
                "-".to_string()
            } else {
                s.to_string()
            }
        };

        Some(BookDetailView {
            card: BookCard::render(book, &CatalogFilter::default(), Audience::Member),
            type_label: format!("Tipe: {}", book.book_type),
            genre: or_dash(&book.genre),
            synopsis: if book.description.trim().is_empty() {
                "Tidak ada sinopsis.".to_string()
            } else {
                book.description.clone()
            },
            location: or_dash(&book.location),
            stock_line: book
                .book_type
                .shows_stock()
                .then(|| format!("Stok tersedia: {}", book.stock.max(0))),
            can_read: book.book_type.is_readable(),
            can_borrow: book.book_type.is_borrowable(),
            replacement_cost: book.fine_amount,
            bookmarked: self.bookmarked,
        })
    }

    /// ログインしていなければ案内し、承諾されたらログイン画面へ
    async fn require_login(&self) -> Result<()> {
        if self.logged_in {
            return Ok(());
        }
        if self.ctx.notifier.confirm(LOGIN_PROMPT).await {
            self.ctx.navigator.redirect(&self.ctx.login_url);
        }
        Err(PageError::LoginRequired)
    }

    fn loaded_book(&self) -> Result<&Book> {
        self.book
            .as_ref()
            .ok_or(PageError::BookNotFound(self.book_id))
    }

    /// 貸出申請を送る
    ///
    /// 在庫切れの紙の書籍は送信前に拒否する。成功後は詳細を取得し直す。
    pub async fn borrow(&mut self) -> Result<ActionOutcome> {
        self.require_login().await?;
        let book = self.loaded_book()?.clone();

        if !book.book_type.is_borrowable() {
            return Err(surface(&self.ctx, PageError::Unsupported("dipinjam")).await);
        }
        if !book.is_available() {
            return Err(surface(&self.ctx, PageError::OutOfStock(book.id)).await);
        }

        let prompt = format!(
            "Pinjam buku \"{}\"?\nDenda jika buku hilang: {}",
            book.title, book.fine_amount
        );
        if !self.ctx.notifier.confirm(&prompt).await {
            return Ok(ActionOutcome::Declined);
        }

        let ack = guard(&self.ctx, self.ctx.api.request_borrow(book.id).await).await?;
        tracing::info!("Borrow requested for book {}", book.id);
        self.ctx
            .notifier
            .alert(ack.message_or("Pengajuan peminjaman berhasil dikirim"))
            .await;

        self.load().await?;
        Ok(ActionOutcome::Applied)
    }

    /// ブックマークを切り替える。成功時のみ状態を反転し、新しい状態を返す
    pub async fn toggle_bookmark(&mut self) -> Result<bool> {
        self.require_login().await?;
        let id = self.loaded_book()?.id;

        let result = if self.bookmarked {
            self.ctx.api.remove_bookmark(id).await
        } else {
            self.ctx.api.add_bookmark(id).await
        };
        guard(&self.ctx, result).await?;

        self.bookmarked = !self.bookmarked;
        let message = if self.bookmarked {
            "Buku ditambahkan ke Bookmark."
        } else {
            "Buku dihapus dari Bookmark."
        };
        tracing::info!(book_id = %id, bookmarked = self.bookmarked, "Bookmark toggled");
        self.ctx.notifier.alert(message).await;
        Ok(self.bookmarked)
    }

    /// 閲覧画面への遷移先
    pub async fn read(&self) -> Result<String> {
        self.require_login().await?;
        let book = self.loaded_book()?;
        if !book.book_type.is_readable() {
            return Err(surface(&self.ctx, PageError::Unsupported("dibaca")).await);
        }
        let href = format!("/baca_buku?id={}", book.id);
        self.ctx.navigator.redirect(&href);
        Ok(href)
    }
}
