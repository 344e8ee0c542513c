use crate::ports::notifier::Notifier as NotifierTrait;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock implementation of Notifier
///
/// Records every alert and confirmation prompt.
/// Confirmations are answered from a queue of scripted replies,
/// falling back to the default answer once the queue is empty.
pub struct Notifier {
    alerts: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
    replies: Mutex<VecDeque<bool>>,
    default_reply: bool,
}

impl Notifier {
    /// Notifier that accepts every confirmation
    pub fn new() -> Self {
        Self::with_default_reply(true)
    }

    /// Notifier that declines every confirmation
    pub fn declining() -> Self {
        Self::with_default_reply(false)
    }

    fn with_default_reply(default_reply: bool) -> Self {
        Self {
            alerts: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
            default_reply,
        }
    }

    /// Queue the answer for the next confirmation
    pub fn reply_next(&self, answer: bool) {
        self.replies.lock().unwrap().push_back(answer);
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn last_alert(&self) -> Option<String> {
        self.alerts.lock().unwrap().last().cloned()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotifierTrait for Notifier {
    async fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    async fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.default_reply)
    }
}
