use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use logbook_core::config::ModelConfig;
use logbook_core::errors::{GenerationError, LogbookResult};
use logbook_core::traits::TextGenerator;

/// Canned completion (or failure) that counts calls and keeps prompts.
pub struct CountingGenerator {
    reply: Result<String, String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl CountingGenerator {
    pub fn replying(text: &str) -> Self {
        Self::with_reply(Ok(text.to_string()))
    }

    pub fn failing(reason: &str) -> Self {
        Self::with_reply(Err(reason.to_string()))
    }

    fn with_reply(reply: Result<String, String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().ok().and_then(|p| p.last().cloned())
    }
}

impl TextGenerator for CountingGenerator {
    fn complete(&self, prompt: &str, _model: &ModelConfig) -> LogbookResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.reply.clone().map_err(|reason| {
            GenerationError::RequestFailed { reason }.into()
        })
    }
}
