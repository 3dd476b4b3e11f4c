//! Room message log.
//!
//! Every room message the relay delivers is appended here in arrival order.
//! Entries are never edited, deduplicated or evicted; the log grows for the
//! lifetime of the session.

use chrono::{DateTime, Utc};

/// Shown in place of the log while it is empty.
pub const EMPTY_LOG_PLACEHOLDER: &str = "No messages yet";

/// One received room message.
#[derive(Debug, Clone)]
pub struct RoomMessageEntry {
    sender_id: String,
    text: String,
    received_at: DateTime<Utc>,
}

impl RoomMessageEntry {
    fn new(sender_id: String, text: String) -> Self {
        Self {
            sender_id,
            text,
            received_at: Utc::now(),
        }
    }

    /// Identity of the sender.
    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    /// Message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Local time the entry was appended.
    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Format the entry for display as `sender: text`.
    pub fn format(&self) -> String {
        format!("{}: {}", self.sender_id, self.text)
    }
}

/// Append-only, insertion-ordered log of room messages.
#[derive(Debug, Clone, Default)]
pub struct RoomMessageLog {
    entries: Vec<RoomMessageEntry>,
}

impl RoomMessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a received message and return the new entry.
    pub fn append(
        &mut self,
        sender_id: impl Into<String>,
        text: impl Into<String>,
    ) -> &RoomMessageEntry {
        let index = self.entries.len();
        self.entries
            .push(RoomMessageEntry::new(sender_id.into(), text.into()));
        &self.entries[index]
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[RoomMessageEntry] {
        &self.entries
    }

    /// Iterate entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &RoomMessageEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no message has been received.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display lines for the whole log, or the placeholder when empty.
    pub fn render(&self) -> Vec<String> {
        if self.entries.is_empty() {
            return vec![EMPTY_LOG_PLACEHOLDER.to_string()];
        }
        self.entries
            .iter()
            .map(RoomMessageEntry::format)
            .collect()
    }
}
