use std::collections::VecDeque;
use std::sync::Mutex;

use aipdf_core::prompt::CompletionRequest;

use super::AiBackend;
use crate::prelude::*;

/// Replays canned completions in order and records every request it gets.
#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBackend {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            requests: Mutex::default(),
        }
    }

    pub fn failing(error: Error) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([Err(error.into())])),
            requests: Mutex::default(),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl AiBackend for ScriptedBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(eyre!("scripted backend ran out of responses")))
    }
}
