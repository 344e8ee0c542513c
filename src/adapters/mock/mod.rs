pub mod navigator;
pub mod notifier;

pub use navigator::Navigator;
pub use notifier::Notifier;
