use std::future::Future;

use aipdf_core::prompt::CompletionRequest;

use crate::prelude::*;

pub mod openrouter;

pub use openrouter::{OpenRouter, OpenRouterConfig};

/// A language model that turns a prompt into a completion.
///
/// The pipeline only ever needs the raw completion text; providers map their
/// own failure modes onto [`Error::Backend`] and [`Error::NoChoice`].
pub trait AiBackend {
    fn complete(&self, request: &CompletionRequest) -> impl Future<Output = Result<String>> + Send;
}

#[cfg(test)]
pub(crate) mod scripted;
