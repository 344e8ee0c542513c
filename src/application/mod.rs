pub mod admin;
pub mod borrow;
pub mod catalog;
mod errors;
pub mod home;
pub mod outcome;
pub mod reading;

use crate::config::ClientConfig;
use crate::ports::{LibraryApi, Navigator, Notifier};
use std::sync::Arc;

#[allow(unused_imports)]
pub use errors::{PageError, Result};
#[allow(unused_imports)]
pub use outcome::{ActionOutcome, guard, surface};

/// 画面コントローラが共有する依存
#[derive(Clone)]
pub struct PageContext {
    pub api: Arc<dyn LibraryApi>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    /// セッション切れ時の遷移先
    pub login_url: String,
}

impl PageContext {
    pub fn new(
        config: &ClientConfig,
        api: Arc<dyn LibraryApi>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            notifier,
            navigator,
            login_url: config.login_url(),
        }
    }
}
