/// Folder-level state derived from the untagged lines of a SELECT response.
///
/// Only the message count matters for windowed retrieval; everything else the
/// server volunteers (flags, RECENT, UIDVALIDITY, ...) is ignored.
#[derive(Debug, Default, Eq, PartialEq)]
pub struct Mailbox {
    /// Total number of messages in the selected folder, taken from the
    /// untagged `* <n> EXISTS` line. Defaults to 0 when the server sends no
    /// such line.
    pub exists: u32,
}

/// The static folder set the webmail UI offers.
///
/// Folder listing is deliberately not negotiated with the server.
pub const DEFAULT_FOLDERS: [&str; 5] = ["INBOX", "Sent", "Drafts", "Trash", "Spam"];
