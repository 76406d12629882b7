use std::error::Error as StdError;
use std::fmt;
use std::io::Error as IoError;
use std::net::TcpStream;
use std::result;

use bufstream::IntoInnerError as BufError;
use native_tls::Error as TlsError;
use native_tls::HandshakeError as TlsHandshakeError;

pub type Result<T> = result::Result<T, Error>;

/// A set of errors that can occur while retrieving mail.
///
/// Every handshake-stage rejection (`Auth`, `Folder`, `Fetch`) carries the
/// raw server response text for diagnostics.
#[derive(Debug)]
pub enum Error {
    /// An `io::Error` that occurred while trying to read or write to a network stream.
    Io(IoError),
    /// An error from the `native_tls` library during the TLS handshake.
    TlsHandshake(TlsHandshakeError<TcpStream>),
    /// An error from the `native_tls` library while managing the socket.
    Tls(TlsError),
    /// The server rejected the LOGIN command.
    Auth(String),
    /// The server rejected the SELECT command, e.g. for a nonexistent folder.
    Folder(String),
    /// The server rejected the FETCH command.
    Fetch(String),
    /// No response arrived within the configured read deadline.
    Timeout,
    /// The connection was terminated unexpectedly.
    ConnectionLost,
    /// A command argument contained a character that cannot be sent safely.
    Validate(ValidateError),
}

impl From<IoError> for Error {
    fn from(err: IoError) -> Error {
        Error::Io(err)
    }
}

impl<T> From<BufError<T>> for Error {
    fn from(err: BufError<T>) -> Error {
        Error::Io(err.into())
    }
}

impl From<TlsHandshakeError<TcpStream>> for Error {
    fn from(err: TlsHandshakeError<TcpStream>) -> Error {
        Error::TlsHandshake(err)
    }
}

impl From<TlsError> for Error {
    fn from(err: TlsError) -> Error {
        Error::Tls(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => fmt::Display::fmt(e, f),
            Error::Tls(e) => fmt::Display::fmt(e, f),
            Error::TlsHandshake(e) => fmt::Display::fmt(e, f),
            Error::Auth(resp) => write!(f, "login rejected: {}", resp.trim_end()),
            Error::Folder(resp) => write!(f, "folder select rejected: {}", resp.trim_end()),
            Error::Fetch(resp) => write!(f, "fetch rejected: {}", resp.trim_end()),
            Error::Timeout => f.write_str("timed out waiting for server response"),
            Error::ConnectionLost => f.write_str("connection lost"),
            Error::Validate(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Tls(e) => Some(e),
            Error::TlsHandshake(e) => Some(e),
            _ => None,
        }
    }
}

/// Invalid character found in a command argument.
#[derive(Debug)]
pub struct ValidateError(pub char);

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // print character in debug form because invalid ones are often whitespaces
        write!(f, "invalid character in input: {:?}", self.0)
    }
}

impl StdError for ValidateError {}
