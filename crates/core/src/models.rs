use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Completion providers a model can be served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BackendKind {
    OpenRouter,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::OpenRouter => "open-router",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Models the pipeline knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Model {
    #[default]
    Mixtral8x7bInstruct,
    Zephyr7b,
    Gpt4Turbo,
}

impl Model {
    pub const ALL: [Model; 3] = [Model::Mixtral8x7bInstruct, Model::Zephyr7b, Model::Gpt4Turbo];

    /// Provider-side model identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Model::Mixtral8x7bInstruct => "mistralai/mixtral-8x7b-instruct",
            Model::Zephyr7b => "huggingfaceh4/zephyr-7b-beta",
            Model::Gpt4Turbo => "openai/gpt-4-1106-preview",
        }
    }

    /// Short name accepted on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Model::Mixtral8x7bInstruct => "mixtral",
            Model::Zephyr7b => "zephyr",
            Model::Gpt4Turbo => "gpt4-turbo",
        }
    }

    pub fn requires_auth(&self) -> bool {
        true
    }

    pub fn supported_backends(&self) -> &'static [BackendKind] {
        &[BackendKind::OpenRouter]
    }

    pub fn supports(&self, backend: BackendKind) -> bool {
        self.supported_backends().contains(&backend)
    }

    /// System message used when a request does not override it.
    pub fn default_system_message(&self) -> &'static str {
        "You're a helpful coding assistant, that helps with repetitive tasks. Only answer the question below, do not add any additional information. Expect output to be processed by a script and not a human. Do not add characters for lists such as '*'"
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown model '{0}' (expected one of: mixtral, zephyr, gpt4-turbo)")]
pub struct ModelParseError(pub String);

impl FromStr for Model {
    type Err = ModelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Model::ALL
            .into_iter()
            .find(|model| model.id() == s || model.name() == s)
            .ok_or_else(|| ModelParseError(s.to_string()))
    }
}
