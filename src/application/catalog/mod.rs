mod detail;
mod listing;
mod management;

#[allow(unused_imports)]
pub use detail::{BookDetailPage, BookDetailView};
#[allow(unused_imports)]
pub use listing::CatalogPage;
#[allow(unused_imports)]
pub use management::{add_book, delete_book, find_book, update_book};
