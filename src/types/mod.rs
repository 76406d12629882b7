//! This module contains the types produced by a retrieval session.

mod mailbox;
mod message;

pub use self::mailbox::{Mailbox, DEFAULT_FOLDERS};
pub use self::message::{Message, DEFAULT_SUBJECT};
