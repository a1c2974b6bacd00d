use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::channel::mpsc;
use futures::stream;
use futures::StreamExt;

use super::ChatSession;
use super::CHAT_ERROR_TEXT;
use crate::domain::models::ByteStream;
use crate::domain::models::ChatError;
use crate::domain::models::ChatSource;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Role;
use crate::domain::models::SessionState;

/// Hands out queued replies in order and records every prompt it receives.
#[derive(Default)]
struct FakeSource {
    replies: Mutex<VecDeque<Result<ByteStream, ChatError>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeSource {
    fn with_replies(replies: Vec<Result<ByteStream, ChatError>>) -> Arc<FakeSource> {
        return Arc::new(FakeSource {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(vec![]),
        });
    }

    fn prompts(&self) -> Vec<String> {
        return self.prompts.lock().unwrap().clone();
    }
}

#[async_trait]
impl ChatSource for FakeSource {
    #[allow(clippy::implicit_return)]
    async fn open(&self, prompt: &str) -> Result<ByteStream, ChatError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        return self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| return Err(ChatError::Network("no reply queued".to_string())));
    }
}

fn body(chunks: Vec<&'static str>) -> ByteStream {
    return stream::iter(
        chunks
            .into_iter()
            .map(|chunk| return Ok(Bytes::from_static(chunk.as_bytes()))),
    )
    .boxed();
}

fn session_with(source: &Arc<FakeSource>) -> ChatSession {
    return ChatSession::new(source.clone());
}

#[tokio::test]
async fn it_streams_a_reply_into_history() -> Result<()> {
    let (chunks, reply) = mpsc::unbounded::<Result<Bytes, ChatError>>();
    let source = FakeSource::with_replies(vec![Ok(reply.boxed())]);
    let session = session_with(&source);
    let mut rx = session.subscribe();

    assert!(session.submit("Hello"));

    let state = session.current_state();
    assert!(state.busy);
    assert_eq!(state.streaming_buffer, None);
    assert_eq!(state.history, vec![Message::new(Role::User, "Hello")]);

    chunks.unbounded_send(Ok(Bytes::from("Hi"))).unwrap();
    rx.wait_for(|state| return state.streaming_buffer.as_deref() == Some("Hi"))
        .await?;

    chunks.unbounded_send(Ok(Bytes::from(" there"))).unwrap();
    rx.wait_for(|state| return state.streaming_buffer.as_deref() == Some("Hi there"))
        .await?;
    assert!(session.current_state().busy);

    drop(chunks);
    let state = session.wait_idle().await;

    assert_eq!(
        state,
        SessionState {
            history: vec![
                Message::new(Role::User, "Hello"),
                Message::new(Role::Assistant, "Hi there"),
            ],
            streaming_buffer: None,
            busy: false,
        }
    );
    assert_eq!(source.prompts(), vec!["Hello".to_string()]);

    return Ok(());
}

#[tokio::test]
async fn it_ignores_blank_prompts() {
    let source = FakeSource::with_replies(vec![]);
    let session = session_with(&source);

    assert!(!session.submit("   "));
    assert!(!session.submit(""));
    assert!(!session.submit("\n\t"));

    assert_eq!(session.current_state(), SessionState::default());
    tokio::task::yield_now().await;
    assert!(source.prompts().is_empty());
}

#[tokio::test]
async fn it_allows_a_single_request_in_flight() -> Result<()> {
    let (chunks, reply) = mpsc::unbounded::<Result<Bytes, ChatError>>();
    let source = FakeSource::with_replies(vec![Ok(reply.boxed()), Ok(body(vec!["late"]))]);
    let session = session_with(&source);

    assert!(session.submit("a"));
    let accepted_state = session.current_state();
    assert!(!session.submit("a"));
    assert!(!session.submit("b"));
    assert_eq!(session.current_state(), accepted_state);

    chunks.unbounded_send(Ok(Bytes::from("first"))).unwrap();
    drop(chunks);
    let state = session.wait_idle().await;

    assert_eq!(source.prompts(), vec!["a".to_string()]);
    assert_eq!(
        state.history,
        vec![
            Message::new(Role::User, "a"),
            Message::new(Role::Assistant, "first"),
        ]
    );

    return Ok(());
}

#[tokio::test]
async fn it_rejects_submits_while_streaming() -> Result<()> {
    let (chunks, reply) = mpsc::unbounded::<Result<Bytes, ChatError>>();
    let source = FakeSource::with_replies(vec![Ok(reply.boxed())]);
    let session = session_with(&source);
    let mut rx = session.subscribe();

    assert!(session.submit("Hello"));
    chunks.unbounded_send(Ok(Bytes::from("Hi"))).unwrap();
    let streaming = rx
        .wait_for(|state| return state.streaming_buffer.is_some())
        .await?
        .clone();

    assert!(!session.submit("Are you there?"));
    assert_eq!(session.current_state(), streaming);

    drop(chunks);
    session.wait_idle().await;
    assert_eq!(source.prompts().len(), 1);

    return Ok(());
}

#[tokio::test]
async fn it_commits_an_error_on_non_success_status() {
    let source =
        FakeSource::with_replies(vec![Err(ChatError::NonSuccessResponse { status: 500 })]);
    let session = session_with(&source);

    assert!(session.submit("Hello"));
    let state = session.wait_idle().await;

    assert_eq!(state.history.len(), 2);
    let reply = &state.history[1];
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.content, CHAT_ERROR_TEXT);
    assert_eq!(reply.message_type(), MessageType::Error);
    assert_eq!(state.streaming_buffer, None);
    assert!(!state.busy);
}

#[tokio::test]
async fn it_commits_an_error_on_network_failure() {
    let source = FakeSource::with_replies(vec![Err(ChatError::Network(
        "connection refused".to_string(),
    ))]);
    let session = session_with(&source);

    session.submit("Hello");
    let state = session.wait_idle().await;

    assert_eq!(state.history.last().unwrap().content, CHAT_ERROR_TEXT);
    assert_eq!(state.streaming_buffer, None);
}

#[tokio::test]
async fn it_commits_an_error_when_the_stream_breaks() {
    let reply = stream::iter(vec![
        Ok(Bytes::from_static(b"Take two tab")),
        Err(ChatError::StreamRead("connection reset".to_string())),
    ])
    .boxed();
    let source = FakeSource::with_replies(vec![Ok(reply)]);
    let session = session_with(&source);

    session.submit("How much ibuprofen?");
    let state = session.wait_idle().await;

    assert_eq!(state.history.len(), 2);
    assert_eq!(state.history[1].content, CHAT_ERROR_TEXT);
    assert_eq!(state.history[1].message_type(), MessageType::Error);
    assert_eq!(state.streaming_buffer, None);
}

#[tokio::test]
async fn it_commits_an_empty_reply_for_an_empty_body() {
    let source = FakeSource::with_replies(vec![Ok(body(vec![]))]);
    let session = session_with(&source);

    session.submit("Hello");
    let state = session.wait_idle().await;

    assert_eq!(
        state.history,
        vec![
            Message::new(Role::User, "Hello"),
            Message::new(Role::Assistant, ""),
        ]
    );
    assert_eq!(state.history[1].message_type(), MessageType::Normal);
}

#[tokio::test]
async fn it_recovers_after_a_failure() {
    let source = FakeSource::with_replies(vec![
        Err(ChatError::NonSuccessResponse { status: 503 }),
        Ok(body(vec!["Back ", "online"])),
    ]);
    let session = session_with(&source);

    session.submit("first");
    session.wait_idle().await;
    assert!(session.submit("second"));
    let state = session.wait_idle().await;

    let contents = state
        .history
        .iter()
        .map(|message| return (message.role, message.content.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        contents,
        vec![
            (Role::User, "first"),
            (Role::Assistant, CHAT_ERROR_TEXT),
            (Role::User, "second"),
            (Role::Assistant, "Back online"),
        ]
    );
    assert_eq!(source.prompts(), vec!["first".to_string(), "second".to_string()]);
}

#[tokio::test]
async fn it_keeps_prompts_as_typed() {
    let source = FakeSource::with_replies(vec![Ok(body(vec!["ok"]))]);
    let session = session_with(&source);

    session.submit("  line one\nline two ");
    let state = session.wait_idle().await;

    assert_eq!(state.history[0].content, "  line one\nline two ");
    assert_eq!(source.prompts(), vec!["  line one\nline two ".to_string()]);
}

#[tokio::test]
async fn it_publishes_monotonic_buffers() -> Result<()> {
    let (chunks, reply) = mpsc::unbounded::<Result<Bytes, ChatError>>();
    let source = FakeSource::with_replies(vec![Ok(reply.boxed())]);
    let session = session_with(&source);
    let mut rx = session.subscribe();

    session.submit("Count");
    let mut seen: Vec<String> = vec![];
    for word in ["one", " two", " three"] {
        chunks.unbounded_send(Ok(Bytes::from(word))).unwrap();
        let buffer = rx
            .wait_for(|state| {
                return state
                    .streaming_buffer
                    .as_deref()
                    .map(|buffer| return buffer.ends_with(word.trim()))
                    .unwrap_or(false);
            })
            .await?
            .streaming_buffer
            .clone()
            .unwrap_or_default();
        seen.push(buffer);
    }
    drop(chunks);
    session.wait_idle().await;

    assert_eq!(seen, vec!["one", "one two", "one two three"]);

    return Ok(());
}
