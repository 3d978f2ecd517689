//! Interactive confirmation for destructive actions

use async_trait::async_trait;
use std::io::{self, BufRead, Write};

pub const DELETE_DEVICE_PROMPT: &str = "Are you sure you want to delete this device?";
pub const STOP_SESSION_PROMPT: &str = "Are you sure you want to stop this session?";

/// Asks the user to confirm an action before the panel issues it
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Confirmation already given elsewhere (`--yes`, a dashboard modal)
#[derive(Debug, Clone, Copy, Default)]
pub struct Preconfirmed;

#[async_trait]
impl Confirmer for Preconfirmed {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Asks on the terminal, defaulting to "no"
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirmer;

#[async_trait]
impl Confirmer for StdinConfirmer {
    async fn confirm(&self, prompt: &str) -> bool {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || {
            print!("{} [y/N] ", prompt);
            let _ = io::stdout().flush();
            let mut answer = String::new();
            match io::stdin().lock().read_line(&mut answer) {
                Ok(_) => is_affirmative(&answer),
                Err(_) => false,
            }
        })
        .await
        .unwrap_or(false)
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
