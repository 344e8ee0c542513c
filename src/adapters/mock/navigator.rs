use crate::ports::navigator::Navigator as NavigatorTrait;
use std::sync::Mutex;

/// Mock implementation of Navigator
///
/// Records redirect targets instead of navigating.
pub struct Navigator {
    visited: Mutex<Vec<String>>,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            visited: Mutex::new(Vec::new()),
        }
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    pub fn last_location(&self) -> Option<String> {
        self.visited.lock().unwrap().last().cloned()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigatorTrait for Navigator {
    fn redirect(&self, location: &str) {
        self.visited.lock().unwrap().push(location.to_string());
    }
}
