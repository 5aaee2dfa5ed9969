//! Chat transcript and streaming-reveal bookkeeping.
//!
//! The assistant reply arrives fully formed; the "stream" is a local
//! word-by-word reveal driven by a timer in the worker. This module owns the
//! transcript state machine: the send guard, the single-active-stream
//! invariant, delta application, and the stop/fail paths. The timing itself
//! ([`REVEAL_INITIAL_DELAY`], [`REVEAL_WORD_INTERVAL`]) is applied by the
//! driver, which makes the state transitions fully testable.

use time::OffsetDateTime;
use uuid::Uuid;

/// Delay before the first revealed word.
pub const REVEAL_INITIAL_DELAY: std::time::Duration = std::time::Duration::from_millis(300);

/// Interval between revealed words.
pub const REVEAL_WORD_INTERVAL: std::time::Duration = std::time::Duration::from_millis(30);

/// Fallback assistant message for a failed send.
pub const APOLOGY: &str = "I'm sorry, I'm having trouble processing your request right now. \
     Please try again later.";

/// Opening assistant message for a fresh transcript.
pub const GREETING: &str = "Hello! I'm your diabetes management assistant. I can help you \
     understand your glucose data, provide lifestyle advice, and answer questions about \
     diabetes care. How can I help you today?";

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message in the transcript.
///
/// Assistant messages are mutated in place while their reveal runs, then
/// frozen; everything else is immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Opaque id, unique within the session.
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub created_at: OffsetDateTime,
    /// Whether a reveal is currently mutating this message.
    pub streaming: bool,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            created_at: OffsetDateTime::now_utc(),
            streaming: false,
        }
    }
}

/// Canned prompts offered as one-key shortcuts above the chat input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickInsight {
    DailySummary,
    TrendAnalysis,
    PatternReview,
    Recommendations,
}

impl QuickInsight {
    /// All shortcuts, in display order.
    pub const ALL: [QuickInsight; 4] = [
        QuickInsight::DailySummary,
        QuickInsight::TrendAnalysis,
        QuickInsight::PatternReview,
        QuickInsight::Recommendations,
    ];

    /// Short label for the shortcut row.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QuickInsight::DailySummary => "Summary",
            QuickInsight::TrendAnalysis => "Trends",
            QuickInsight::PatternReview => "Patterns",
            QuickInsight::Recommendations => "Tips",
        }
    }

    /// The full prompt sent through the normal send path.
    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            QuickInsight::DailySummary => {
                "Please provide me with a daily summary of my glucose data, including key \
                 metrics and any notable patterns from the last 24 hours."
            }
            QuickInsight::TrendAnalysis => {
                "Can you analyze the trends in my glucose data over the past 24 hours? I'd \
                 like to understand any patterns or changes."
            }
            QuickInsight::PatternReview => {
                "Please review my glucose patterns and identify any recurring trends or \
                 unusual readings that I should be aware of."
            }
            QuickInsight::Recommendations => {
                "Based on my recent glucose data, what lifestyle recommendations or \
                 monitoring suggestions can you provide?"
            }
        }
    }
}

/// The append-only session transcript plus streaming bookkeeping.
///
/// Invariants: messages keep insertion order, at most one message is
/// `streaming` at a time, and a send is rejected while another is pending.
#[derive(Debug, Clone)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    pending: bool,
    streaming_id: Option<Uuid>,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatTranscript {
    /// Create a transcript opening with the fixed greeting.
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::new(ChatRole::Assistant, GREETING)],
            pending: false,
            streaming_id: None,
        }
    }

    /// The messages in insertion order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a send is in flight (request or reveal).
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Id of the message currently being revealed, if any.
    #[must_use]
    pub fn streaming_id(&self) -> Option<Uuid> {
        self.streaming_id
    }

    /// Guarded send: appends the user message and marks the transcript
    /// pending, returning the text to post. Blank/whitespace-only input or
    /// an already-pending send is a silent no-op returning `None`.
    pub fn prepare_send(&mut self, text: &str) -> Option<String> {
        if text.trim().is_empty() || self.pending {
            return None;
        }
        self.messages.push(ChatMessage::new(ChatRole::User, text));
        self.pending = true;
        Some(text.to_string())
    }

    /// Start revealing an assistant reply: appends an empty streaming
    /// message under the given id. Rejected (returns `false`) while another
    /// reveal is active.
    pub fn begin_assistant(&mut self, id: Uuid) -> bool {
        if self.streaming_id.is_some() {
            return false;
        }
        let mut message = ChatMessage::new(ChatRole::Assistant, "");
        message.id = id;
        message.streaming = true;
        self.messages.push(message);
        self.streaming_id = Some(id);
        true
    }

    /// Replace the streaming message's content with the next prefix.
    /// Deltas for anything but the active stream are ignored.
    pub fn apply_delta(&mut self, id: Uuid, content: String) -> bool {
        if self.streaming_id != Some(id) {
            return false;
        }
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            message.content = content;
            return true;
        }
        false
    }

    /// Freeze the stream after its last word.
    pub fn finish_stream(&mut self, id: Uuid) {
        if self.streaming_id == Some(id) {
            self.streaming_id = None;
            self.pending = false;
        }
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            message.streaming = false;
        }
    }

    /// Freeze whatever has been revealed so far. Idempotent; safe to call
    /// when nothing is streaming.
    pub fn stop(&mut self) {
        if let Some(id) = self.streaming_id.take()
            && let Some(message) = self.messages.iter_mut().find(|m| m.id == id)
        {
            message.streaming = false;
        }
        self.pending = false;
    }

    /// Record a hard send failure: the apology message replaces the reply.
    pub fn fail(&mut self) {
        self.stop();
        self.messages.push(ChatMessage::new(ChatRole::Assistant, APOLOGY));
    }
}

/// The word schedule for one reveal.
///
/// Splits on whitespace once; the driver asks for successive prefixes on its
/// timer ticks.
#[derive(Debug, Clone)]
pub struct RevealPlan {
    words: Vec<String>,
}

impl RevealPlan {
    /// Split the full reply into its word schedule.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            words: text.split_whitespace().map(String::from).collect(),
        }
    }

    /// Number of reveal steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether there is nothing to reveal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The content after `upto + 1` words have been revealed.
    #[must_use]
    pub fn prefix(&self, upto: usize) -> String {
        let end = (upto + 1).min(self.words.len());
        self.words[..end].join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_opens_with_greeting() {
        let transcript = ChatTranscript::new();
        assert_eq!(transcript.messages().len(), 1);
        assert_eq!(transcript.messages()[0].role, ChatRole::Assistant);
        assert_eq!(transcript.messages()[0].content, GREETING);
        assert!(!transcript.is_pending());
    }

    #[test]
    fn test_blank_send_is_noop() {
        let mut transcript = ChatTranscript::new();
        assert!(transcript.prepare_send("").is_none());
        assert!(transcript.prepare_send("   \t ").is_none());
        assert_eq!(transcript.messages().len(), 1);
        assert!(!transcript.is_pending());
    }

    #[test]
    fn test_send_while_pending_is_noop() {
        let mut transcript = ChatTranscript::new();
        assert!(transcript.prepare_send("first question").is_some());
        assert!(transcript.prepare_send("second question").is_none());
        assert_eq!(transcript.messages().len(), 2);
    }

    #[test]
    fn test_full_stream_lifecycle() {
        let mut transcript = ChatTranscript::new();
        transcript.prepare_send("how am I doing?").unwrap();

        let id = Uuid::new_v4();
        assert!(transcript.begin_assistant(id));
        assert!(transcript.is_pending());

        let plan = RevealPlan::new("You are doing fine");
        for i in 0..plan.len() {
            assert!(transcript.apply_delta(id, plan.prefix(i)));
        }
        transcript.finish_stream(id);

        let last = transcript.messages().last().unwrap();
        assert_eq!(last.content, "You are doing fine");
        assert!(!last.streaming);
        assert!(!transcript.is_pending());
        assert!(transcript.streaming_id().is_none());
    }

    #[test]
    fn test_single_stream_invariant() {
        let mut transcript = ChatTranscript::new();
        transcript.prepare_send("q").unwrap();
        assert!(transcript.begin_assistant(Uuid::new_v4()));
        assert!(!transcript.begin_assistant(Uuid::new_v4()));
        assert_eq!(
            transcript
                .messages()
                .iter()
                .filter(|m| m.streaming)
                .count(),
            1
        );
    }

    #[test]
    fn test_stop_freezes_partial_content() {
        let mut transcript = ChatTranscript::new();
        transcript.prepare_send("q").unwrap();
        let id = Uuid::new_v4();
        transcript.begin_assistant(id);

        let plan = RevealPlan::new("a b c d");
        transcript.apply_delta(id, plan.prefix(1));
        transcript.stop();

        let last = transcript.messages().last().unwrap();
        assert_eq!(last.content, "a b");
        assert!(!last.streaming);
        assert!(!transcript.is_pending());

        // Late deltas from the cancelled reveal are ignored.
        assert!(!transcript.apply_delta(id, plan.prefix(3)));
        assert_eq!(transcript.messages().last().unwrap().content, "a b");
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut transcript = ChatTranscript::new();
        transcript.stop();
        transcript.stop();
        assert!(!transcript.is_pending());

        transcript.prepare_send("q").unwrap();
        let id = Uuid::new_v4();
        transcript.begin_assistant(id);
        transcript.stop();
        transcript.stop();
        assert!(transcript.streaming_id().is_none());
    }

    #[test]
    fn test_fail_appends_apology() {
        let mut transcript = ChatTranscript::new();
        transcript.prepare_send("q").unwrap();
        transcript.fail();

        let last = transcript.messages().last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert_eq!(last.content, APOLOGY);
        assert!(!last.streaming);
        assert!(!transcript.is_pending());

        // The transcript stays usable.
        assert!(transcript.prepare_send("again").is_some());
    }

    #[test]
    fn test_reveal_plan_prefixes() {
        let plan = RevealPlan::new("one  two\n three");
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.prefix(0), "one");
        assert_eq!(plan.prefix(1), "one two");
        assert_eq!(plan.prefix(2), "one two three");
        // Out-of-range clamps to the full text.
        assert_eq!(plan.prefix(10), "one two three");
    }

    #[test]
    fn test_reveal_plan_empty() {
        let plan = RevealPlan::new("   ");
        assert!(plan.is_empty());
        assert_eq!(plan.prefix(0), "");
    }

    #[test]
    fn test_quick_insight_prompts_are_nonempty() {
        for insight in QuickInsight::ALL {
            assert!(!insight.prompt().is_empty());
            assert!(!insight.label().is_empty());
        }
    }
}
