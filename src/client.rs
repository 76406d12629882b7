use std::io::{self, Read, Write};

use bufstream::BufStream;
use log::{debug, trace};

use super::error::{Error, Result, ValidateError};
use super::session::Session;

const LF: u8 = 0x0a;
const TAG_PREFIX: &str = "A";
const INITIAL_TAG: u32 = 0;

macro_rules! quote {
    ($x:expr) => {
        format!("\"{}\"", $x.replace('\\', "\\\\").replace('"', "\\\""))
    };
}

/// Quotes `value` for use as an IMAP command argument, rejecting characters
/// that would let the argument break out of the command line.
pub(crate) fn validate_str(value: &str) -> Result<String> {
    let quoted = quote!(value);
    if quoted.contains('\n') {
        return Err(Error::Validate(ValidateError('\n')));
    }
    if quoted.contains('\r') {
        return Err(Error::Validate(ValidateError('\r')));
    }
    Ok(quoted)
}

/// One request/response unit: the generated tag and the full response text
/// accumulated for it, including the completion line.
#[derive(Debug)]
pub(crate) struct Transaction {
    pub(crate) tag: String,
    pub(crate) response: String,
}

impl Transaction {
    /// Whether the server completed this transaction with `<tag> OK`.
    pub(crate) fn completed_ok(&self) -> bool {
        let needle = format!("{} OK", self.tag);
        self.response.lines().any(|line| line.starts_with(&needle))
    }
}

/// A connected, not yet authenticated IMAP client.
///
/// Wraps the command stream: it generates tags, writes tagged command lines,
/// and accumulates response text until the matching completion line arrives.
/// Exactly one transaction is outstanding at a time. Dropping the client
/// closes the underlying socket.
#[derive(Debug)]
pub struct Client<T: Read + Write> {
    stream: BufStream<T>,
    tag: u32,
}

impl<T: Read + Write> Client<T> {
    /// Creates a new client over the given stream. The server greeting has
    /// not been read yet; see [`Client::read_greeting`].
    pub fn new(stream: T) -> Client<T> {
        Client {
            stream: BufStream::new(stream),
            tag: INITIAL_TAG,
        }
    }

    /// Reads the one-line server greeting.
    ///
    /// The greeting is informational; it is not validated beyond arriving at
    /// all (an immediate EOF is a lost connection).
    pub fn read_greeting(&mut self) -> Result<String> {
        let mut v = Vec::new();
        self.readline(&mut v)?;
        let greeting = String::from_utf8_lossy(&v).into_owned();
        debug!("server greeting: {}", greeting.trim_end());
        Ok(greeting)
    }

    /// Logs in to the IMAP server, consuming the client and yielding an
    /// authenticated [`Session`].
    ///
    /// Any completion other than `OK` fails with [`Error::Auth`] carrying the
    /// raw server response; the connection is closed when the client is
    /// dropped on that path.
    pub fn login(mut self, username: &str, password: &str) -> Result<Session<T>> {
        let tx = self.send(&format!(
            "LOGIN {} {}",
            validate_str(username)?,
            validate_str(password)?
        ))?;
        if !tx.completed_ok() {
            return Err(Error::Auth(tx.response));
        }
        debug!("logged in as {}", username);
        Ok(Session::new(self))
    }

    /// Sends one tagged command and accumulates its response.
    ///
    /// Reads line by line until a line starting with `<tag> OK`, `<tag> NO`,
    /// or `<tag> BAD` is seen; everything read up to and including that line
    /// is the transaction's response text. Status interpretation is the
    /// caller's job.
    pub(crate) fn send(&mut self, command: &str) -> Result<Transaction> {
        let tag = self.next_tag();
        self.write_line(format!("{} {}", tag, command).as_bytes())?;
        let response = self.read_response(&tag)?;
        Ok(Transaction { tag, response })
    }

    fn read_response(&mut self, tag: &str) -> Result<String> {
        let mut data = Vec::new();
        loop {
            let line_start = data.len();
            self.readline(&mut data)?;
            if is_completion(&data[line_start..], tag) {
                return Ok(String::from_utf8_lossy(&data).into_owned());
            }
        }
    }

    fn readline(&mut self, into: &mut Vec<u8>) -> Result<usize> {
        use std::io::BufRead;
        let read = match self.stream.read_until(LF, into) {
            Ok(0) => return Err(Error::ConnectionLost),
            Ok(read) => read,
            Err(ref e)
                if e.kind() == io::ErrorKind::TimedOut
                    || e.kind() == io::ErrorKind::WouldBlock =>
            {
                // the socket's read deadline elapsed
                return Err(Error::Timeout);
            }
            Err(e) => return Err(e.into()),
        };

        let len = into.len();
        trace!("S: {}", String::from_utf8_lossy(&into[len - read..]).trim_end());
        Ok(read)
    }

    fn next_tag(&mut self) -> String {
        self.tag += 1;
        format!("{}{:03}", TAG_PREFIX, self.tag)
    }

    fn write_line(&mut self, buf: &[u8]) -> Result<()> {
        self.stream.write_all(buf)?;
        self.stream.write_all(b"\r\n")?;
        self.stream.flush()?;
        trace!("C: {}", String::from_utf8_lossy(buf));
        Ok(())
    }
}

fn is_completion(line: &[u8], tag: &str) -> bool {
    let line = match std::str::from_utf8(line) {
        Ok(line) => line,
        Err(_) => return false,
    };
    let rest = match line.strip_prefix(tag).and_then(|rest| rest.strip_prefix(' ')) {
        Some(rest) => rest,
        None => return false,
    };
    rest.starts_with("OK") || rest.starts_with("NO") || rest.starts_with("BAD")
}

#[cfg(test)]
impl Client<crate::mock_stream::MockStream> {
    pub(crate) fn written(&self) -> &[u8] {
        &self.stream.get_ref().written_buf
    }
}
