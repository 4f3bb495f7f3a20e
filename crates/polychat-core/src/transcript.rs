//! Per-model conversation transcripts.
//!
//! Each model keeps its own history because each model produces its own
//! answers — the user's prompt is shared, the assistant turns are not.
//! Histories are capped at the configured `max_chat_history` and live only
//! for the duration of a REPL session.

use std::collections::HashMap;

use crate::types::Message;

/// Ordered conversation history for one model.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    /// 0 means unlimited.
    max_messages: usize,
}

impl Transcript {
    /// Create a transcript capped at `max_messages` (0 = unlimited).
    pub fn new(max_messages: usize) -> Self {
        Transcript {
            messages: Vec::new(),
            max_messages,
        }
    }

    /// Append a message, dropping the oldest entries beyond the cap.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        if self.max_messages > 0 && self.messages.len() > self.max_messages {
            let excess = self.messages.len() - self.max_messages;
            self.messages.drain(..excess);
        }
    }

    /// The messages in order, ready to send as context.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Transcripts for all models in a chat session, keyed by model name.
#[derive(Debug, Default)]
pub struct TranscriptSet {
    transcripts: HashMap<String, Transcript>,
    max_messages: usize,
}

impl TranscriptSet {
    /// Create a set whose transcripts are capped at `max_messages`.
    pub fn new(max_messages: usize) -> Self {
        TranscriptSet {
            transcripts: HashMap::new(),
            max_messages,
        }
    }

    /// The transcript for `model`, created empty on first access.
    pub fn get_mut(&mut self, model: &str) -> &mut Transcript {
        let cap = self.max_messages;
        self.transcripts
            .entry(model.to_string())
            .or_insert_with(|| Transcript::new(cap))
    }

    /// Record a user prompt in every listed model's transcript.
    pub fn push_user(&mut self, models: &[String], prompt: &str) {
        for model in models {
            self.get_mut(model).push(Message::user(prompt));
        }
    }

    /// Record one model's assistant reply.
    pub fn push_assistant(&mut self, model: &str, content: &str) {
        self.get_mut(model).push(Message::assistant(content));
    }

    /// Context messages for `model` including the new prompt as the final
    /// user turn. The transcript itself is not modified.
    pub fn context_for(&self, model: &str, prompt: &str) -> Vec<Message> {
        let mut messages = self
            .transcripts
            .get(model)
            .map(|t| t.messages().to_vec())
            .unwrap_or_default();
        messages.push(Message::user(prompt));
        messages
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_order() {
        let mut t = Transcript::new(10);
        t.push(Message::user("q1"));
        t.push(Message::assistant("a1"));
        assert_eq!(t.len(), 2);
        assert_eq!(t.messages()[0].content(), "q1");
        assert_eq!(t.messages()[1].content(), "a1");
    }

    #[test]
    fn cap_drops_oldest() {
        let mut t = Transcript::new(4);
        for i in 0..6 {
            t.push(Message::user(format!("m{i}")));
        }
        assert_eq!(t.len(), 4);
        assert_eq!(t.messages()[0].content(), "m2");
        assert_eq!(t.messages()[3].content(), "m5");
    }

    #[test]
    fn zero_cap_is_unlimited() {
        let mut t = Transcript::new(0);
        for i in 0..50 {
            t.push(Message::user(format!("m{i}")));
        }
        assert_eq!(t.len(), 50);
    }

    #[test]
    fn set_isolates_models() {
        let mut set = TranscriptSet::new(10);
        set.push_assistant("gpt-4o", "four");
        set.push_assistant("claude", "4");
        assert_eq!(set.get_mut("gpt-4o").len(), 1);
        assert_eq!(set.get_mut("claude").len(), 1);
        assert_eq!(set.get_mut("gpt-4o").messages()[0].content(), "four");
    }

    #[test]
    fn push_user_fans_to_all() {
        let mut set = TranscriptSet::new(10);
        let models = vec!["a".to_string(), "b".to_string()];
        set.push_user(&models, "what is 2+2?");
        assert_eq!(set.get_mut("a").len(), 1);
        assert_eq!(set.get_mut("b").len(), 1);
    }

    #[test]
    fn context_appends_prompt_without_mutating() {
        let mut set = TranscriptSet::new(10);
        set.push_user(&["m".to_string()], "first");
        set.push_assistant("m", "reply");

        let ctx = set.context_for("m", "second");
        assert_eq!(ctx.len(), 3);
        assert_eq!(ctx[2], Message::user("second"));
        // Transcript unchanged until the turn completes
        assert_eq!(set.get_mut("m").len(), 2);
    }

    #[test]
    fn context_for_unknown_model_is_just_prompt() {
        let set = TranscriptSet::new(10);
        let ctx = set.context_for("new-model", "hello");
        assert_eq!(ctx, vec![Message::user("hello")]);
    }
}
