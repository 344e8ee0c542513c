mod bookmarks;
mod ebook;

#[allow(unused_imports)]
pub use bookmarks::BookmarksPage;
#[allow(unused_imports)]
pub use ebook::{EbookHistoryPage, EbookShelfPage, load_progress, save_progress};
