use chrono::{DateTime, Local};
use log::debug;
use thiserror::Error;

use crate::model::{DeliveryStatus, LOCAL_SENDER, MAX_MESSAGE_CHARS, Message, MessageId};

/// What the compose buffer is currently for. Submitting branches on this tag
/// instead of a nullable edit id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeMode {
    Composing,
    Editing(MessageId),
}

/// Validation failures for a submitted message body. The UI suppresses these
/// silently; they exist as values so the guards stay testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("message text is empty")]
    Empty,
    #[error("message text exceeds {MAX_MESSAGE_CHARS} characters")]
    TooLong,
}

/// Outcome of a successful submit. Only `Sent` carries a freshly created
/// message and therefore wants a read-receipt timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
    Sent(MessageId),
    Edited(MessageId),
}

/// Message list for a single opened inbox, oldest first. Created from the
/// hand-off payload and dropped with the screen; nothing is persisted.
pub struct ThreadSession {
    display_name: String,
    messages: Vec<Message>,
    mode: ComposeMode,
    next_id: u64,
}

impl ThreadSession {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            messages: Vec::new(),
            mode: ComposeMode::Composing,
            next_id: 1,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn mode(&self) -> ComposeMode {
        self.mode
    }

    /// Submits the compose buffer. In `Composing` mode a new `Delivered`
    /// message is appended at the tail; the caller is expected to schedule
    /// exactly one deferred `mark_read` for it. In `Editing` mode the target's
    /// text is overwritten in place, leaving its id, timestamps, status and
    /// star untouched, and the edit session ends; edits never schedule a new
    /// receipt. Rejected input changes nothing, including the mode.
    pub fn submit(
        &mut self,
        text: &str,
        now: DateTime<Local>,
    ) -> Result<Submit, ComposeError> {
        if text.trim().is_empty() {
            return Err(ComposeError::Empty);
        }
        if text.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ComposeError::TooLong);
        }

        if let ComposeMode::Editing(id) = self.mode {
            self.mode = ComposeMode::Composing;
            if let Some(message) = self.find_mut(id) {
                message.text = text.to_string();
                debug!("message {:?} edited in place", id);
            } else {
                debug!("edit target {:?} vanished, submit dropped", id);
            }
            return Ok(Submit::Edited(id));
        }

        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message {
            id,
            text: text.to_string(),
            created_at: now,
            starred: false,
            sender: LOCAL_SENDER.to_string(),
            receiver: self.display_name.clone(),
            status: DeliveryStatus::Delivered,
            read_at: None,
        });
        debug!("message {:?} sent", id);
        Ok(Submit::Sent(id))
    }

    /// Deferred-transition body: check-then-set against current membership.
    /// Flips `Delivered` to `Read` and records `read_at`; a deleted or
    /// already-read target is left alone.
    pub fn mark_read(&mut self, id: MessageId, now: DateTime<Local>) {
        match self.find_mut(id) {
            Some(message) if message.status == DeliveryStatus::Delivered => {
                message.status = DeliveryStatus::Read;
                message.read_at = Some(now);
                debug!("message {:?} read", id);
            }
            Some(_) => {}
            None => debug!("read receipt for missing message {:?} discarded", id),
        }
    }

    /// No-op when the id is not present. A pending receipt for the removed
    /// message later falls through `mark_read` harmlessly; an active edit
    /// session targeting it resolves at the next submit.
    pub fn delete(&mut self, id: MessageId) {
        self.messages.retain(|message| message.id != id);
    }

    /// Starts (or retargets) an edit session and returns the text to load
    /// into the compose buffer. The message itself is not touched yet.
    pub fn begin_edit(&mut self, id: MessageId) -> Option<&str> {
        let index = self.messages.iter().position(|message| message.id == id)?;
        self.mode = ComposeMode::Editing(id);
        Some(&self.messages[index].text)
    }

    pub fn toggle_star(&mut self, id: MessageId) {
        if let Some(message) = self.find_mut(id) {
            message.starred = !message.starred;
        }
    }

    fn find_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|message| message.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ThreadSession {
        ThreadSession::new("👬 Friends")
    }

    #[test]
    fn test_send_appends_delivered_at_tail() {
        let mut s = session();
        let now = Local::now();
        s.submit("hi", now).unwrap();
        let Submit::Sent(id) = s.submit("there", now).unwrap() else {
            panic!("expected a send");
        };
        assert_eq!(s.messages().len(), 2);
        let last = s.messages().last().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.text, "there");
        assert_eq!(last.status, DeliveryStatus::Delivered);
        assert_eq!(last.read_at, None);
        assert!(!last.starred);
        assert_eq!(last.sender, LOCAL_SENDER);
        assert_eq!(last.receiver, "👬 Friends");
    }

    #[test]
    fn test_submit_rejects_blank_text() {
        let mut s = session();
        assert_eq!(s.submit("", Local::now()), Err(ComposeError::Empty));
        assert_eq!(s.submit("   ", Local::now()), Err(ComposeError::Empty));
        assert!(s.messages().is_empty());
    }

    #[test]
    fn test_submit_rejects_overlong_text() {
        let mut s = session();
        let at_limit = "a".repeat(MAX_MESSAGE_CHARS);
        let over = "a".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(s.submit(&at_limit, Local::now()).is_ok());
        assert_eq!(s.submit(&over, Local::now()), Err(ComposeError::TooLong));
        assert_eq!(s.messages().len(), 1);
    }

    #[test]
    fn test_limit_counts_chars_not_bytes() {
        let mut s = session();
        let emoji = "🎉".repeat(MAX_MESSAGE_CHARS);
        assert!(emoji.len() > MAX_MESSAGE_CHARS);
        assert!(s.submit(&emoji, Local::now()).is_ok());
    }

    #[test]
    fn test_mark_read_sets_read_at_once() {
        let mut s = session();
        let sent_at = Local::now();
        let Submit::Sent(id) = s.submit("hello", sent_at).unwrap() else {
            panic!("expected a send");
        };
        let read_at = Local::now();
        s.mark_read(id, read_at);
        let msg = &s.messages()[0];
        assert_eq!(msg.status, DeliveryStatus::Read);
        assert_eq!(msg.read_at, Some(read_at));
        assert!(msg.read_at.unwrap() >= msg.created_at);
        // a second firing must not move the timestamp
        s.mark_read(id, Local::now());
        assert_eq!(s.messages()[0].read_at, Some(read_at));
    }

    #[test]
    fn test_mark_read_after_delete_is_discarded() {
        let mut s = session();
        let Submit::Sent(id) = s.submit("gone soon", Local::now()).unwrap() else {
            panic!("expected a send");
        };
        s.delete(id);
        s.mark_read(id, Local::now());
        assert!(s.messages().is_empty());
    }

    #[test]
    fn test_edit_replaces_text_in_place() {
        let mut s = session();
        let now = Local::now();
        let Submit::Sent(id) = s.submit("typo", now).unwrap() else {
            panic!("expected a send");
        };
        let created_at = s.messages()[0].created_at;
        assert_eq!(s.begin_edit(id), Some("typo"));
        assert_eq!(s.mode(), ComposeMode::Editing(id));
        assert_eq!(s.submit("fixed", Local::now()), Ok(Submit::Edited(id)));
        assert_eq!(s.messages().len(), 1);
        let msg = &s.messages()[0];
        assert_eq!(msg.id, id);
        assert_eq!(msg.text, "fixed");
        assert_eq!(msg.created_at, created_at);
        assert_eq!(msg.status, DeliveryStatus::Delivered);
        assert_eq!(s.mode(), ComposeMode::Composing);
    }

    #[test]
    fn test_edit_preserves_read_status_and_star() {
        let mut s = session();
        let Submit::Sent(id) = s.submit("old", Local::now()).unwrap() else {
            panic!("expected a send");
        };
        let read_at = Local::now();
        s.mark_read(id, read_at);
        s.toggle_star(id);
        s.begin_edit(id);
        s.submit("new", Local::now()).unwrap();
        let msg = &s.messages()[0];
        assert_eq!(msg.status, DeliveryStatus::Read);
        assert_eq!(msg.read_at, Some(read_at));
        assert!(msg.starred);
    }

    #[test]
    fn test_begin_edit_retargets_without_saving() {
        let mut s = session();
        let Submit::Sent(a) = s.submit("first", Local::now()).unwrap() else {
            panic!("expected a send");
        };
        let Submit::Sent(b) = s.submit("second", Local::now()).unwrap() else {
            panic!("expected a send");
        };
        s.begin_edit(a);
        s.begin_edit(b);
        s.submit("rewritten", Local::now()).unwrap();
        assert_eq!(s.messages()[0].text, "first");
        assert_eq!(s.messages()[1].text, "rewritten");
    }

    #[test]
    fn test_begin_edit_unknown_id_keeps_mode() {
        let mut s = session();
        assert!(s.begin_edit(MessageId(9)).is_none());
        assert_eq!(s.mode(), ComposeMode::Composing);
    }

    #[test]
    fn test_edit_of_deleted_target_does_not_append() {
        let mut s = session();
        let Submit::Sent(id) = s.submit("doomed", Local::now()).unwrap() else {
            panic!("expected a send");
        };
        s.begin_edit(id);
        s.delete(id);
        assert_eq!(s.submit("orphan", Local::now()), Ok(Submit::Edited(id)));
        assert!(s.messages().is_empty());
        assert_eq!(s.mode(), ComposeMode::Composing);
    }

    #[test]
    fn test_rejected_submit_keeps_edit_session() {
        let mut s = session();
        let Submit::Sent(id) = s.submit("keep", Local::now()).unwrap() else {
            panic!("expected a send");
        };
        s.begin_edit(id);
        assert_eq!(s.submit("  ", Local::now()), Err(ComposeError::Empty));
        assert_eq!(s.mode(), ComposeMode::Editing(id));
        assert_eq!(s.messages()[0].text, "keep");
    }

    #[test]
    fn test_toggle_star_round_trip() {
        let mut s = session();
        let Submit::Sent(id) = s.submit("star me", Local::now()).unwrap() else {
            panic!("expected a send");
        };
        s.toggle_star(id);
        assert!(s.messages()[0].starred);
        s.toggle_star(id);
        assert!(!s.messages()[0].starred);
    }

    #[test]
    fn test_mutations_on_unknown_ids_are_noops() {
        let mut s = session();
        s.submit("solo", Local::now()).unwrap();
        let ghost = MessageId(999);
        s.toggle_star(ghost);
        s.delete(ghost);
        s.mark_read(ghost, Local::now());
        assert_eq!(s.messages().len(), 1);
        assert_eq!(s.messages()[0].text, "solo");
        assert_eq!(s.messages()[0].status, DeliveryStatus::Delivered);
    }

    #[test]
    fn test_delete_keeps_remaining_order() {
        let mut s = session();
        let Submit::Sent(a) = s.submit("a", Local::now()).unwrap() else {
            panic!("expected a send");
        };
        s.submit("b", Local::now()).unwrap();
        s.delete(a);
        let texts: Vec<_> = s.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["b"]);
    }
}
