//! A minimal, hand-rolled IMAP retrieval engine.
//!
//! This crate is the mail-protocol core of a webmail backend. It answers one
//! question per request: "what are the most recent messages in this folder?"
//! To do that it opens a TLS connection to the account's IMAP server, logs
//! in, selects the folder, and fetches the newest window of up to
//! [`session::WINDOW_SIZE`] messages, parsed into flat [`Message`] records.
//!
//! It speaks the wire protocol directly rather than through an IMAP library,
//! and deliberately implements nothing beyond that one path: no IDLE, no
//! SEARCH, no MIME structure, no connection reuse. A fresh connection is
//! opened per request and closed when the session is dropped, on every exit
//! path.
//!
//! # Usage
//!
//! ```no_run
//! # fn main() -> Result<(), imap_window::Error> {
//! let client = imap_window::ClientBuilder::new("imap.example.com", 993).connect()?;
//! let mut session = client.login("user@example.com", "password")?;
//!
//! for message in session.fetch_recent("INBOX")? {
//!     println!("{}: {}", message.from, message.subject);
//! }
//!
//! session.logout()?;
//! # Ok(())
//! # }
//! ```

mod parse;
mod types;

pub mod client;
pub mod client_builder;
pub mod error;
pub mod session;

pub use client::Client;
pub use client_builder::ClientBuilder;
pub use error::{Error, Result};
pub use session::Session;
pub use types::*;

#[cfg(test)]
mod mock_stream;
