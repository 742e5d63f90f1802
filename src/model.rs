use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Glyphs offered by the inbox picker. `select_glyph` ignores anything else.
pub const GLYPH_PALETTE: [&str; 8] = ["💬", "👬", "👨‍👩‍👧", "💼", "🏠", "🎵", "📷", "🚗"];

pub const DEFAULT_GLYPH: &str = "💬";

/// Upper bound on a message body, counted in characters.
pub const MAX_MESSAGE_CHARS: usize = 150;

/// Label used as the sender of every locally composed message.
pub const LOCAL_SENDER: &str = "You";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InboxId(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub(crate) u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxEntry {
    pub id: InboxId,
    pub name: String,
    pub glyph: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Delivered,
    Read,
}

impl DeliveryStatus {
    pub fn label(self) -> &'static str {
        match self {
            DeliveryStatus::Delivered => "Delivered",
            DeliveryStatus::Read => "Read",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub created_at: DateTime<Local>,
    pub starred: bool,
    pub sender: String,
    pub receiver: String,
    pub status: DeliveryStatus,
    /// Set exactly once, when the delivery status flips to `Read`.
    pub read_at: Option<DateTime<Local>>,
}

/// Selection payload handed from the inbox list to a thread view. The thread
/// treats `display_name` as an opaque label and never looks back into the
/// registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadHandoff {
    pub inbox_id: InboxId,
    pub display_name: String,
}
