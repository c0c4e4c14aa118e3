//! In-process provider doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use mythweaver::providers::{CompletionProvider, CompletionRequest, ModerationProvider};
use mythweaver::{MythError, Result};

/// Completion provider that replays a fixed script of replies and records
/// every request it receives.
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with a valid myth.
    pub fn always_valid() -> Self {
        Self::new((0..16).map(|_| Ok(valid_myth_json())).collect())
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(MythError::Internal("script exhausted".into())))
    }
}

/// Moderation provider with a fixed verdict.
pub struct StaticModeration {
    verdict: Result<bool>,
    calls: AtomicUsize,
}

impl StaticModeration {
    pub fn passing() -> Self {
        Self::with(Ok(false))
    }

    pub fn flagging() -> Self {
        Self::with(Ok(true))
    }

    pub fn failing() -> Self {
        Self::with(Err(MythError::Http("connection refused".into())))
    }

    fn with(verdict: Result<bool>) -> Self {
        Self {
            verdict,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModerationProvider for StaticModeration {
    fn name(&self) -> &str {
        "static"
    }

    async fn is_flagged(&self, _text: &str) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.verdict {
            Ok(flagged) => Ok(*flagged),
            Err(e) => Err(MythError::Http(e.to_string())),
        }
    }
}

pub fn valid_myth() -> serde_json::Value {
    json!({
        "title": "The Thief of the Cold Hearth",
        "adapted_story": "When the longhouse was young, a bowl of stew vanished each noon...",
        "choices": [
            {"id": "c1", "label": "Call the Thing", "outcome": "The clan assembles and the thief is named."},
            {"id": "c2", "label": "Set a Snare", "outcome": "A trickster's trap catches more than stew."},
            {"id": "c3", "label": "Share the Pot", "outcome": "Hunger ends where generosity begins."}
        ],
        "meta": {"culture": "norse", "source_motif": "Trickster gods, feast halls"}
    })
}

pub fn valid_myth_json() -> String {
    valid_myth().to_string()
}
