//! Conversational session state.
//!
//! [`Session`] owns an append-only message log plus two derived views:
//!
//! - the **chat view**, the subsequence of messages excluding meta-role
//!   entries, built lazily on first request and maintained incrementally
//!   afterwards. It is represented as indices into the canonical log, so
//!   "chat view == messages filtered by role != meta" holds mechanically.
//! - the **last batch**, the slice most recently appended, always the tail
//!   of the log. Transformer stages use it to rewrite the previous stage's
//!   output without touching earlier history.
//!
//! A session lives for exactly one workflow run: created empty, mutated only
//! by [`append`](Session::append) and
//! [`replace_last_messages`](Session::replace_last_messages), then dropped.

use std::fmt;

use bobbin_types::Message;

/// The mutable conversational state of one workflow run.
#[derive(Debug, Default)]
pub struct Session {
    messages: Vec<Message>,
    /// Indices of non-meta messages, present once the chat view was built.
    chat_view: Option<Vec<usize>>,
    /// Length of the most recently appended batch; that batch is always the
    /// tail of `messages`.
    last_batch_len: usize,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the session holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The full message history, in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Append a batch of messages in order.
    ///
    /// The batch becomes the new last batch, even when empty. If the chat
    /// view was already built, non-meta messages are appended to it as well.
    pub fn append(&mut self, batch: Vec<Message>) {
        self.last_batch_len = batch.len();
        for message in batch {
            let index = self.messages.len();
            let meta = message.is_meta();
            self.messages.push(message);
            if let Some(view) = self.chat_view.as_mut()
                && !meta
            {
                view.push(index);
            }
        }
    }

    /// The chat view: every message whose role is not meta.
    ///
    /// Built by filtering the full log on first call, then maintained
    /// incrementally by later appends; never rebuilt.
    pub fn chat_messages(&mut self) -> Vec<Message> {
        let view = self.chat_view.get_or_insert_with(|| {
            self.messages
                .iter()
                .enumerate()
                .filter(|(_, m)| !m.is_meta())
                .map(|(i, _)| i)
                .collect()
        });
        view.iter().map(|&i| self.messages[i].clone()).collect()
    }

    /// The most recently appended batch.
    pub fn last_messages(&self) -> &[Message] {
        let len = self.last_batch_len.min(self.messages.len());
        &self.messages[self.messages.len() - len..]
    }

    /// Substitute `new_messages` for the tail batch of the log.
    ///
    /// Removes `new_messages.len()` entries from the tail -- clamped: if the
    /// session holds fewer messages, the log is cleared entirely -- then
    /// appends the new batch, which becomes the last batch. An empty
    /// `new_messages` performs no structural removal but still updates the
    /// last batch.
    pub fn replace_last_messages(&mut self, new_messages: Vec<Message>) {
        let removed = new_messages.len().min(self.messages.len());
        let kept = self.messages.len() - removed;
        self.messages.truncate(kept);
        if let Some(view) = self.chat_view.as_mut() {
            while view.last().is_some_and(|&i| i >= kept) {
                view.pop();
            }
        }
        self.append(new_messages);
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in &self.messages {
            write!(f, "\n--- \n[{}]\n\n{}", message.role, message.content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(content: &str) -> Message {
        Message::user(content)
    }

    fn contents(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.content.as_str()).collect()
    }

    #[test]
    fn starts_empty() {
        let session = Session::new();
        assert!(session.is_empty());
        assert!(session.last_messages().is_empty());
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut session = Session::new();
        session.append(vec![user("a"), user("b")]);
        session.append(vec![user("c")]);
        assert_eq!(contents(session.messages()), ["a", "b", "c"]);
        assert!(!session.is_empty());
    }

    #[test]
    fn last_batch_reflects_only_the_latest_append() {
        let mut session = Session::new();
        session.append(vec![user("a"), user("b")]);
        session.append(vec![user("c")]);
        assert_eq!(contents(session.last_messages()), ["c"]);

        session.append(vec![]);
        assert!(session.last_messages().is_empty());
    }

    #[test]
    fn chat_view_filters_meta_when_built_late() {
        let mut session = Session::new();
        session.append(vec![user("a"), Message::meta("m"), user("b")]);
        assert_eq!(contents(&session.chat_messages()), ["a", "b"]);
    }

    #[test]
    fn chat_view_stays_consistent_across_later_appends() {
        let mut session = Session::new();
        session.append(vec![user("a")]);
        // Build the view early, then keep appending.
        assert_eq!(contents(&session.chat_messages()), ["a"]);

        session.append(vec![Message::meta("m"), user("b")]);
        session.append(vec![user("c")]);
        assert_eq!(contents(&session.chat_messages()), ["a", "b", "c"]);
        assert_eq!(contents(session.messages()), ["a", "m", "b", "c"]);
    }

    #[test]
    fn chat_view_is_idempotent() {
        let mut session = Session::new();
        session.append(vec![user("a"), Message::meta("m")]);
        let first = session.chat_messages();
        let second = session.chat_messages();
        assert_eq!(first, second);
    }

    #[test]
    fn replace_substitutes_the_tail_batch() {
        let mut session = Session::new();
        session.append(vec![user("a")]);
        session.append(vec![user("b"), user("c")]);

        session.replace_last_messages(vec![user("B"), user("C")]);
        assert_eq!(contents(session.messages()), ["a", "B", "C"]);
        assert_eq!(contents(session.last_messages()), ["B", "C"]);
    }

    #[test]
    fn replace_updates_built_chat_view() {
        let mut session = Session::new();
        session.append(vec![user("a")]);
        session.chat_messages();
        session.append(vec![user("b")]);

        session.replace_last_messages(vec![Message::meta("note")]);
        assert_eq!(contents(&session.chat_messages()), ["a"]);
        assert_eq!(contents(session.messages()), ["a", "note"]);
    }

    #[test]
    fn replace_never_leaks_replaced_entries_into_chat_view() {
        let mut session = Session::new();
        session.append(vec![user("keep")]);
        session.append(vec![user("old")]);
        session.replace_last_messages(vec![user("new")]);
        assert_eq!(contents(&session.chat_messages()), ["keep", "new"]);
    }

    #[test]
    fn replace_clamps_instead_of_underflowing() {
        let mut session = Session::new();
        session.append(vec![user("only")]);

        // Replacement batch longer than the whole log: clear, then append.
        session.replace_last_messages(vec![user("x"), user("y"), user("z")]);
        assert_eq!(contents(session.messages()), ["x", "y", "z"]);
        assert_eq!(contents(session.last_messages()), ["x", "y", "z"]);
    }

    #[test]
    fn replace_clamps_built_chat_view_too() {
        let mut session = Session::new();
        session.append(vec![user("only")]);
        session.chat_messages();

        session.replace_last_messages(vec![user("x"), user("y")]);
        assert_eq!(contents(&session.chat_messages()), ["x", "y"]);
    }

    #[test]
    fn replace_with_empty_batch_still_updates_last_batch() {
        let mut session = Session::new();
        session.append(vec![user("a"), user("b")]);

        session.replace_last_messages(vec![]);
        // No structural removal, but the last batch is now empty.
        assert_eq!(contents(session.messages()), ["a", "b"]);
        assert!(session.last_messages().is_empty());
    }

    #[test]
    fn display_renders_role_separated_blocks() {
        let mut session = Session::new();
        session.append(vec![user("hi")]);
        assert_eq!(session.to_string(), "\n--- \n[user]\n\nhi");
    }
}
