use crate::application::{ActionOutcome, PageContext, PageError, Result, guard, surface};
use crate::domain::BookId;
use crate::domain::catalog::{Book, BookUpdate, CatalogFilter, NewBook};
use crate::ports::library_api::Ack;

/// 一覧全体から書籍を探す（単体取得のエンドポイントはない）
pub async fn find_book(ctx: &PageContext, id: BookId) -> Result<Book> {
    let books = guard(ctx, ctx.api.list_books(&CatalogFilter::default()).await).await?;
    match books.into_iter().find(|b| b.id == id) {
        Some(book) => Ok(book),
        None => Err(surface(ctx, PageError::BookNotFound(id)).await),
    }
}

/// 書籍を登録する（管理者）
pub async fn add_book(ctx: &PageContext, book: &NewBook) -> Result<Ack> {
    let ack = guard(ctx, ctx.api.add_book(book).await).await?;
    tracing::info!("Book added: {}", book.title);
    ctx.notifier.alert("Buku berhasil ditambahkan!").await;
    Ok(ack)
}

/// 書籍を更新する（管理者）
pub async fn update_book(ctx: &PageContext, update: &BookUpdate) -> Result<Ack> {
    let ack = guard(ctx, ctx.api.update_book(update).await).await?;
    tracing::info!("Book updated: {}", update.id);
    ctx.notifier
        .alert(ack.message_or("Buku berhasil diperbarui"))
        .await;
    Ok(ack)
}

/// 確認のうえ書籍を削除する（管理者）
pub async fn delete_book(ctx: &PageContext, id: BookId) -> Result<ActionOutcome> {
    if !ctx.notifier.confirm("Yakin ingin menghapus buku ini?").await {
        return Ok(ActionOutcome::Declined);
    }
    guard(ctx, ctx.api.delete_book(id).await).await?;
    tracing::info!("Book deleted: {}", id);
    ctx.notifier.alert("Buku berhasil dihapus!").await;
    Ok(ActionOutcome::Applied)
}
