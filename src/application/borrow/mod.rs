mod card;
mod documents;
mod history;
mod queue;

#[allow(unused_imports)]
pub use card::{ActionButton, BorrowCard, DueLine, TimelineLine};
#[allow(unused_imports)]
pub use documents::{RenderedDocument, render_document};
#[allow(unused_imports)]
pub use history::BorrowHistoryPage;
#[allow(unused_imports)]
pub use queue::BorrowQueuePage;
