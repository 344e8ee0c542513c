//! Terminal implementations of the `Notifier` and `Navigator` ports.

use crate::ports::{navigator::Navigator, notifier::Notifier};
use async_trait::async_trait;
use std::io::{BufRead, Write};

/// Prints alerts to stdout and asks for confirmation on stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier {
    assume_yes: bool,
}

impl ConsoleNotifier {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn alert(&self, message: &str) {
        println!("{}", message);
    }

    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            println!("{} [y]", message);
            return true;
        }

        let prompt = message.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            print!("{} [y/N] ", prompt);
            std::io::stdout().flush().ok();
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line).ok();
            line
        })
        .await;

        match answer {
            Ok(line) => matches!(line.trim().to_lowercase().as_str(), "y" | "ya" | "yes"),
            Err(e) => {
                tracing::error!("Reading confirmation failed: {}", e);
                false
            }
        }
    }
}

/// Prints the redirect target; a terminal cannot navigate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn redirect(&self, location: &str) {
        eprintln!("Sesi berakhir. Silakan login kembali: {}", location);
    }
}
