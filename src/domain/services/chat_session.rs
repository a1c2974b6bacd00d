#[cfg(test)]
#[path = "chat_session_test.rs"]
mod tests;

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::watch;

use super::stream_consumer;
use crate::domain::models::ChatError;
use crate::domain::models::ChatSource;
use crate::domain::models::ChatSourceBox;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Role;
use crate::domain::models::SessionState;

pub const CHAT_ERROR_TEXT: &str = "Sorry, there was an error processing your request.";

/// Owns the conversation and drives at most one streamed reply at a time.
///
/// Every transition happens inside a single watch publication, so subscribers
/// never observe a committed reply next to a stale streaming buffer, or an idle
/// session that still has one.
pub struct ChatSession {
    source: ChatSourceBox,
    state: Arc<watch::Sender<SessionState>>,
}

impl ChatSession {
    pub fn new(source: ChatSourceBox) -> ChatSession {
        let (state, _) = watch::channel(SessionState::default());

        return ChatSession {
            source,
            state: Arc::new(state),
        };
    }

    /// Starts streaming a reply to `prompt`. Must be called from within a tokio
    /// runtime.
    ///
    /// Blank prompts, and any prompt sent while a reply is still streaming, are
    /// dropped without touching the session. Returns whether the prompt was
    /// accepted.
    pub fn submit(&self, prompt: &str) -> bool {
        let accepted = self.state.send_if_modified(|state| {
            if state.busy || prompt.trim().is_empty() {
                return false;
            }

            state.history.push(Message::new(Role::User, prompt));
            state.busy = true;
            state.streaming_buffer = None;
            return true;
        });

        if !accepted {
            tracing::debug!(busy = self.state.borrow().busy, "Ignored chat submit");
            return false;
        }

        let source = self.source.clone();
        let state = self.state.clone();
        let prompt = prompt.to_string();
        tokio::spawn(async move {
            stream_reply(source, state, prompt).await;
        });

        return true;
    }

    pub fn current_state(&self) -> SessionState {
        return self.state.borrow().clone();
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        return self.state.subscribe();
    }

    /// Resolves once no reply is streaming.
    pub async fn wait_idle(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        if let Ok(state) = rx.wait_for(|state| return state.is_idle()).await {
            return state.clone();
        }

        return self.current_state();
    }
}

async fn stream_reply(
    source: ChatSourceBox,
    state: Arc<watch::Sender<SessionState>>,
    prompt: String,
) {
    let reply = match receive_reply(source.as_ref(), &state, &prompt).await {
        Ok(text) => {
            tracing::debug!(length = text.len(), "Chat reply completed");
            Message::new(Role::Assistant, &text)
        }
        Err(err) => {
            tracing::error!(error = %err, "Chat request failed");
            Message::new_with_type(Role::Assistant, MessageType::Error, CHAT_ERROR_TEXT)
        }
    };

    state.send_modify(|session| {
        session.history.push(reply);
        session.streaming_buffer = None;
        session.busy = false;
    });
}

async fn receive_reply(
    source: &dyn ChatSource,
    state: &watch::Sender<SessionState>,
    prompt: &str,
) -> Result<String, ChatError> {
    let body = source.open(prompt).await?;
    let mut replies = stream_consumer::consume(body);

    let mut text = String::new();
    while let Some(cumulative) = replies.next().await {
        text = cumulative?;
        state.send_modify(|session| {
            session.streaming_buffer = Some(text.clone());
        });
    }

    return Ok(text);
}
