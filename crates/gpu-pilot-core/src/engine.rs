//! Interface boundary to the in-browser inference engine.
//!
//! The engine itself (weight loading, tensor execution, sampling) is an
//! external collaborator. The core hands it a chosen model id plus a
//! progress callback and consumes its completions as a finite, single-pass
//! stream of text deltas.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Initialization progress report: fraction complete plus a status line.
#[derive(Debug, Clone)]
pub struct InitProgress {
    pub progress: f64,
    pub text: String,
}

/// Callback invoked with loading progress while the engine initializes.
pub type ProgressFn<'a> = &'a mut dyn FnMut(InitProgress);

/// A finite, non-restartable stream of incremental text deltas for one
/// completion request. Dropping the stream abandons it; whether the
/// producer releases resources promptly on drop is engine-defined.
pub struct TokenStream {
    inner: Box<dyn Iterator<Item = Result<String>>>,
}

impl TokenStream {
    pub fn new(inner: impl Iterator<Item = Result<String>> + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }
}

impl Iterator for TokenStream {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// The engine contract the selection policy hands its chosen model to.
///
/// A failed [`load`](Self::load) surfaces as
/// [`PilotError::EngineLoad`](crate::PilotError::EngineLoad) and leaves the
/// resolver and ranker untouched; retrying with the same or another
/// candidate is safe.
pub trait ChatEngine {
    fn load(&mut self, model_id: &str, on_progress: ProgressFn<'_>) -> Result<()>;

    fn chat(&mut self, messages: &[ChatMessage]) -> Result<TokenStream>;
}
