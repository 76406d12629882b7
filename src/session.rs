use std::cmp::max;
use std::io::{Read, Write};

use log::debug;

use super::client::{validate_str, Client};
use super::error::{Error, Result};
use super::parse::{parse_fetch_response, parse_mailbox};
use super::types::{Mailbox, Message};

/// How many of the most recent messages a retrieval returns at most.
pub const WINDOW_SIZE: u32 = 50;

/// An authenticated IMAP session, obtained from [`Client::login`].
///
/// Drives the remainder of the handshake: SELECT a folder, then FETCH the
/// most recent window of messages. One session serves one retrieval request;
/// dropping it on any path, success or failure, closes the socket.
#[derive(Debug)]
pub struct Session<T: Read + Write> {
    client: Client<T>,
}

impl<T: Read + Write> Session<T> {
    pub(crate) fn new(client: Client<T>) -> Session<T> {
        Session { client }
    }

    /// Selects `folder` and returns its state.
    ///
    /// A completion other than `OK` (e.g. for a nonexistent folder) fails
    /// with [`Error::Folder`] carrying the raw server response. A SELECT
    /// response without an EXISTS line counts as an empty folder.
    pub fn select(&mut self, folder: &str) -> Result<Mailbox> {
        let tx = self.client.send(&format!("SELECT {}", validate_str(folder)?))?;
        if !tx.completed_ok() {
            return Err(Error::Folder(tx.response));
        }
        let mailbox = parse_mailbox(&tx.response);
        debug!("selected {}: {} messages", folder, mailbox.exists);
        Ok(mailbox)
    }

    /// Retrieves the most recent messages (up to [`WINDOW_SIZE`]) in
    /// `folder`, oldest of the window first.
    ///
    /// An empty folder short-circuits to an empty list without issuing a
    /// FETCH command. A rejected FETCH fails with [`Error::Fetch`]; a
    /// malformed message within an accepted response degrades to defaulted
    /// fields rather than failing the batch.
    pub fn fetch_recent(&mut self, folder: &str) -> Result<Vec<Message>> {
        let mailbox = self.select(folder)?;
        if mailbox.exists == 0 {
            return Ok(Vec::new());
        }

        let (start, end) = recent_window(mailbox.exists);
        let tx = self.client.send(&format!(
            "FETCH {}:{} (BODY.PEEK[HEADER.FIELDS (FROM TO SUBJECT DATE)] BODY.PEEK[TEXT])",
            start, end
        ))?;
        if !tx.completed_ok() {
            return Err(Error::Fetch(tx.response));
        }

        let messages = parse_fetch_response(&tx.response);
        debug!("fetched {}:{} from {}: {} messages", start, end, folder, messages.len());
        Ok(messages)
    }

    /// Informs the server that the session is done, then drops the
    /// connection. Purely a courtesy; dropping the session closes the socket
    /// just the same.
    pub fn logout(mut self) -> Result<()> {
        self.client.send("LOGOUT").map(|_| ())
    }
}

/// The 1-based sequence range covering the newest up-to-[`WINDOW_SIZE`]
/// messages of a folder holding `total` messages.
fn recent_window(total: u32) -> (u32, u32) {
    (max(1, total.saturating_sub(WINDOW_SIZE - 1)), total)
}

#[cfg(test)]
impl Session<crate::mock_stream::MockStream> {
    pub(crate) fn written(&self) -> &[u8] {
        self.client.written()
    }
}
