pub mod document_renderer;
pub mod library_api;
pub mod navigator;
pub mod notifier;

pub use document_renderer::DocumentRenderer;
pub use library_api::{Ack, ApiError, ApiResult, LibraryApi};
pub use navigator::Navigator;
pub use notifier::Notifier;
