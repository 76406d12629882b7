use chrono::{DateTime, Utc};

/// Subject used when a message carries no (or an empty) `Subject:` header.
pub const DEFAULT_SUBJECT: &str = "(no subject)";

/// One retrieved message, flattened from a FETCH response block.
///
/// Records are yielded in server order, i.e. ascending sequence number with
/// the oldest message of the window first. Reordering for display is the
/// caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Contents of the `From:` header; empty when the header was absent.
    pub from: String,
    /// Contents of the `To:` header; empty when the header was absent.
    pub to: String,
    /// Contents of the `Subject:` header, or [`DEFAULT_SUBJECT`].
    pub subject: String,
    /// Parsed `Date:` header. Falls back to the time of retrieval when the
    /// header is missing or unparseable; a bad date never drops the message.
    pub date: DateTime<Utc>,
    /// The flattened plain-text body, trimmed.
    pub text: String,
}

impl Message {
    pub(crate) fn new() -> Message {
        Message {
            from: String::new(),
            to: String::new(),
            subject: String::new(),
            date: Utc::now(),
            text: String::new(),
        }
    }
}
