//! The AI assistant surface: request/response payloads and the consumer for
//! the streaming chat endpoints.
//!
//! The streaming protocol is line-framed: each `data: ` line carries one JSON
//! record with optional `content`, `done` and `error` fields. A session
//! accumulates `content` fragments until a terminal frame (`done` truthy or
//! `error` present) or until the transport closes.

use async_stream::try_stream;
use bon::Builder;
use futures_util::{StreamExt, stream::BoxStream};
use healthhero_ox_common::CommonRequestError;
use serde::{Deserialize, Serialize};

use crate::error::HealthHeroRequestError;

/// Fixed fallback shown in place of the reply when the transport fails.
///
/// Distinct from the `error`-frame path, which surfaces the server's own
/// message verbatim.
pub const CHAT_UNAVAILABLE_MESSAGE: &str =
    "Sorry, the AI assistant is temporarily unavailable. Please try again later.";

/// One outbound chat turn.
///
/// `user_data` personalizes the answer and is required by the
/// `ai/health/chat` endpoints; the basic endpoints ignore it.
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct ChatRequest {
    #[builder(into)]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<UserHealthData>,
}

impl ChatRequest {
    /// A plain question with no personalization payload
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_data: None,
        }
    }
}

/// Self-reported health profile sent alongside personalized questions.
/// Every field is optional; absent fields are omitted from the wire payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Builder)]
pub struct UserHealthData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_records: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub exercise_contraindications: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_sleep_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_issues: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_schedule: Option<SleepSchedule>,
}

/// Usual bed and wake times, as `HH:MM` strings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Builder)]
pub struct SleepSchedule {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub bedtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub wake_time: Option<String>,
}

/// Envelope returned by the buffered chat endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub code: i64,
    pub data: ChatReplyData,
    pub msg: String,
}

/// The payload inside a [`ChatReply`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReplyData {
    pub response: String,
}

impl ChatReply {
    /// The assistant's answer text
    pub fn response(&self) -> &str {
        &self.data.response
    }
}

/// One decoded record from the streaming protocol
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamFrame {
    /// Text fragment to append
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Truthy on the stream's final frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    /// Application-level failure; ends the stream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StreamFrame {
    /// True for frames after which no further frames may be processed
    pub fn is_terminal(&self) -> bool {
        self.error.is_some() || self.done.unwrap_or(false)
    }
}

/// Sink receiving a streamed reply as it renders.
///
/// `on_update` always gets the full accumulated text, not the delta, since
/// renderers redraw the whole message.
pub trait ChatSink {
    /// Called after each appended fragment with the accumulated text so far
    fn on_update(&mut self, text: &str);

    /// Called once if the session resolves, with the final text
    fn on_complete(&mut self, _text: &str) {}

    /// Called once if the session fails, with display-ready wording
    fn on_error(&mut self, _message: &str) {}
}

/// What applying one frame did to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStep {
    /// Content appended; the accumulated text grew
    Update,
    /// Nothing actionable, or the frame arrived after termination
    Ignored,
    /// Stream completed; the accumulated text is final
    Done,
    /// The server reported a failure with this message
    Failed(String),
}

/// Accumulation state for one in-flight streamed reply.
///
/// Text is append-only until termination, exactly one terminal event can
/// occur, and frames applied after it are ignored. Sessions are not
/// reusable; retrying means issuing a new request.
#[derive(Debug, Default)]
pub struct ChatStreamSession {
    /// Accumulated reply text
    text: String,
    /// Set once a terminal frame has been applied
    terminated: bool,
}

impl ChatStreamSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The text accumulated so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether a terminal frame has been seen
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Consume the session, keeping the accumulated text
    pub fn into_text(self) -> String {
        self.text
    }

    /// Apply one frame, in arrival order.
    ///
    /// `error` wins over everything else; `done` wins over `content`, so a
    /// final frame's fragment (the backend sends an empty one) is not
    /// appended.
    pub fn apply(&mut self, frame: &StreamFrame) -> SessionStep {
        if self.terminated {
            return SessionStep::Ignored;
        }

        if let Some(message) = &frame.error {
            self.terminated = true;
            return SessionStep::Failed(message.clone());
        }

        if frame.done.unwrap_or(false) {
            self.terminated = true;
            return SessionStep::Done;
        }

        if let Some(content) = &frame.content {
            self.text.push_str(content);
            return SessionStep::Update;
        }

        SessionStep::Ignored
    }

    /// Drive a frame stream to completion, reporting through the sink.
    ///
    /// Resolves to the final accumulated text. A transport failure reports
    /// [`CHAT_UNAVAILABLE_MESSAGE`] to the sink and surfaces the underlying
    /// error; an `error` frame reports the server's message verbatim. A
    /// stream that ends without any terminal frame resolves successfully
    /// with whatever accumulated (lenient close).
    pub async fn run<S: ChatSink>(
        frames: BoxStream<'static, Result<StreamFrame, HealthHeroRequestError>>,
        sink: &mut S,
    ) -> Result<String, HealthHeroRequestError> {
        let mut frames = frames;
        let mut session = Self::new();

        while let Some(next) = frames.next().await {
            let frame = match next {
                Ok(frame) => frame,
                Err(error) => {
                    sink.on_error(CHAT_UNAVAILABLE_MESSAGE);
                    return Err(error);
                }
            };

            match session.apply(&frame) {
                SessionStep::Update => sink.on_update(session.text()),
                SessionStep::Ignored => {}
                SessionStep::Done => {
                    sink.on_complete(session.text());
                    return Ok(session.into_text());
                }
                SessionStep::Failed(message) => {
                    sink.on_error(&message);
                    return Err(HealthHeroRequestError::Assistant(message));
                }
            }
        }

        // Lenient close: end of stream with no terminal frame counts as success.
        sink.on_complete(session.text());
        Ok(session.into_text())
    }
}

/// Decode raw frame payloads into [`StreamFrame`]s.
///
/// A payload that fails to parse is logged and skipped; it never ends the
/// session. The stream stops by itself after yielding a terminal frame.
pub(crate) fn frame_stream(
    lines: BoxStream<'static, Result<String, CommonRequestError>>,
) -> BoxStream<'static, Result<StreamFrame, HealthHeroRequestError>> {
    Box::pin(try_stream! {
        let mut lines = lines;

        while let Some(line) = lines.next().await {
            let payload = line?;

            let frame: StreamFrame = match serde_json::from_str(&payload) {
                Ok(frame) => frame,
                Err(error) => {
                    tracing::warn!(%error, %payload, "skipping malformed stream frame");
                    continue;
                }
            };

            let terminal = frame.is_terminal();
            yield frame;
            if terminal {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    /// Sink that records every callback for assertions
    #[derive(Debug, Default)]
    struct RecordingSink {
        updates: Vec<String>,
        completed: Option<String>,
        errors: Vec<String>,
    }

    impl ChatSink for RecordingSink {
        fn on_update(&mut self, text: &str) {
            self.updates.push(text.to_string());
        }

        fn on_complete(&mut self, text: &str) {
            self.completed = Some(text.to_string());
        }

        fn on_error(&mut self, message: &str) {
            self.errors.push(message.to_string());
        }
    }

    fn content(text: &str) -> StreamFrame {
        StreamFrame {
            content: Some(text.to_string()),
            done: Some(false),
            ..StreamFrame::default()
        }
    }

    fn done() -> StreamFrame {
        StreamFrame {
            content: Some(String::new()),
            done: Some(true),
            ..StreamFrame::default()
        }
    }

    fn frames(
        items: Vec<Result<StreamFrame, HealthHeroRequestError>>,
    ) -> BoxStream<'static, Result<StreamFrame, HealthHeroRequestError>> {
        Box::pin(stream::iter(items))
    }

    #[tokio::test]
    async fn accumulates_fragments_and_resolves_on_done() {
        let mut sink = RecordingSink::default();
        let result = ChatStreamSession::run(
            frames(vec![Ok(content("Hel")), Ok(content("lo")), Ok(done())]),
            &mut sink,
        )
        .await
        .expect("session resolves");

        assert_eq!(result, "Hello");
        assert_eq!(sink.updates, vec!["Hel", "Hello"]);
        assert_eq!(sink.completed.as_deref(), Some("Hello"));
        assert!(sink.errors.is_empty());
    }

    #[tokio::test]
    async fn error_frame_fails_with_server_message() {
        let error_frame = StreamFrame {
            error: Some("overloaded".to_string()),
            done: Some(true),
            ..StreamFrame::default()
        };

        let mut sink = RecordingSink::default();
        let result = ChatStreamSession::run(
            frames(vec![Ok(content("Hi")), Ok(error_frame)]),
            &mut sink,
        )
        .await;

        match result {
            Err(HealthHeroRequestError::Assistant(message)) => {
                assert_eq!(message, "overloaded");
            }
            other => panic!("expected assistant error, got {other:?}"),
        }
        // Accumulation froze at the last good fragment and was not resolved.
        assert_eq!(sink.updates, vec!["Hi"]);
        assert!(sink.completed.is_none());
        assert_eq!(sink.errors, vec!["overloaded"]);
    }

    #[tokio::test]
    async fn transport_failure_reports_fixed_fallback() {
        let mut sink = RecordingSink::default();
        let result = ChatStreamSession::run(
            frames(vec![
                Ok(content("Hi")),
                Err(HealthHeroRequestError::UnexpectedResponse("boom".to_string())),
            ]),
            &mut sink,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(sink.updates, vec!["Hi"]);
        assert_eq!(sink.errors, vec![CHAT_UNAVAILABLE_MESSAGE]);
        assert!(sink.completed.is_none());
    }

    #[tokio::test]
    async fn lenient_close_resolves_with_accumulated_text() {
        let mut sink = RecordingSink::default();
        let result = ChatStreamSession::run(frames(vec![Ok(content("ok"))]), &mut sink)
            .await
            .expect("lenient close resolves");

        assert_eq!(result, "ok");
        assert_eq!(sink.completed.as_deref(), Some("ok"));
    }

    #[test]
    fn frames_after_termination_are_ignored() {
        let mut session = ChatStreamSession::new();
        assert_eq!(session.apply(&content("a")), SessionStep::Update);
        assert_eq!(session.apply(&done()), SessionStep::Done);

        assert_eq!(session.apply(&content("b")), SessionStep::Ignored);
        assert_eq!(session.text(), "a");
        assert!(session.is_terminated());
    }

    #[test]
    fn done_wins_over_content_in_the_same_frame() {
        let frame = StreamFrame {
            content: Some("tail".to_string()),
            done: Some(true),
            ..StreamFrame::default()
        };

        let mut session = ChatStreamSession::new();
        assert_eq!(session.apply(&frame), SessionStep::Done);
        assert_eq!(session.text(), "");
    }

    #[test]
    fn error_wins_over_done_and_content() {
        let frame = StreamFrame {
            content: Some("tail".to_string()),
            done: Some(true),
            error: Some("bad".to_string()),
        };

        let mut session = ChatStreamSession::new();
        assert_eq!(session.apply(&frame), SessionStep::Failed("bad".to_string()));
    }

    #[test]
    fn empty_frame_is_ignored_and_keeps_the_session_open() {
        let mut session = ChatStreamSession::new();
        assert_eq!(session.apply(&StreamFrame::default()), SessionStep::Ignored);
        assert!(!session.is_terminated());
        assert_eq!(session.apply(&content("x")), SessionStep::Update);
    }

    #[tokio::test]
    async fn malformed_payloads_are_skipped() {
        let lines: BoxStream<'static, Result<String, CommonRequestError>> =
            Box::pin(stream::iter(vec![
                Ok(r#"{"content":"a","done":false}"#.to_string()),
                Ok("{not json".to_string()),
                Ok(r#"{"content":"b","done":false}"#.to_string()),
                Ok(r#"{"content":"","done":true}"#.to_string()),
            ]));

        let mut sink = RecordingSink::default();
        let result = ChatStreamSession::run(frame_stream(lines), &mut sink)
            .await
            .expect("session resolves despite bad frame");

        assert_eq!(result, "ab");
        assert_eq!(sink.updates, vec!["a", "ab"]);
    }

    #[tokio::test]
    async fn frame_stream_stops_after_a_terminal_frame() {
        let lines: BoxStream<'static, Result<String, CommonRequestError>> =
            Box::pin(stream::iter(vec![
                Ok(r#"{"content":"a","done":false}"#.to_string()),
                Ok(r#"{"content":"","done":true}"#.to_string()),
                Ok(r#"{"content":"never","done":false}"#.to_string()),
            ]));

        let collected: Vec<_> = frame_stream(lines).collect().await;
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn stream_frame_decodes_wire_records() {
        let frame: StreamFrame =
            serde_json::from_str(r#"{"content":"Hi","done":false}"#).expect("decode frame");
        assert_eq!(frame.content.as_deref(), Some("Hi"));
        assert!(!frame.is_terminal());

        let frame: StreamFrame =
            serde_json::from_str(r#"{"error":"overloaded","done":true}"#).expect("decode frame");
        assert!(frame.is_terminal());
    }

    #[test]
    fn chat_request_omits_absent_user_data() {
        let request = ChatRequest::new("How do I sleep better?");
        let json = serde_json::to_value(&request).expect("encode request");
        assert_eq!(json["message"], "How do I sleep better?");
        assert!(json.get("user_data").is_none());

        let personalized = ChatRequest::builder()
            .message("Plan my workouts")
            .user_data(
                UserHealthData::builder()
                    .age(34)
                    .weight(72.5)
                    .sleep_schedule(
                        SleepSchedule::builder().bedtime("23:00").wake_time("07:00").build(),
                    )
                    .build(),
            )
            .build();
        let json = serde_json::to_value(&personalized).expect("encode request");
        assert_eq!(json["user_data"]["age"], 34);
        assert_eq!(json["user_data"]["sleep_schedule"]["bedtime"], "23:00");
        assert!(json["user_data"].get("diet_records").is_none());
    }
}
