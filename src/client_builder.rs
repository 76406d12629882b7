use std::net::TcpStream;
use std::time::Duration;

use log::{debug, warn};
use native_tls::{TlsConnector, TlsStream};

use crate::client::Client;
use crate::error::Result;

/// Default bound on how long a single read from the server may block.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// A builder for [`Client`] structs: TCP connect, read deadline, TLS
/// handshake, greeting.
///
/// ```no_run
/// # fn main() -> Result<(), imap_window::Error> {
/// let client = imap_window::ClientBuilder::new("imap.example.com", 993).connect()?;
/// let session = client.login("user@example.com", "password")?;
/// # let _ = session;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder<D>
where
    D: AsRef<str>,
{
    domain: D,
    port: u16,
    read_timeout: Option<Duration>,
    accept_invalid_certs: bool,
}

impl<D> ClientBuilder<D>
where
    D: AsRef<str>,
{
    /// Makes a new `ClientBuilder` using the given domain and port
    /// (conventionally 993 for IMAP over TLS).
    pub fn new(domain: D, port: u16) -> Self {
        ClientBuilder {
            domain,
            port,
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
            accept_invalid_certs: false,
        }
    }

    /// Overrides the per-read deadline on the socket. `None` removes the
    /// deadline entirely, reinstating the risk that a stalled server hangs
    /// the request forever.
    pub fn read_timeout(&mut self, timeout: Option<Duration>) -> &mut Self {
        self.read_timeout = timeout;
        self
    }

    /// Skips TLS certificate validation.
    ///
    /// Only for servers with self-signed certificates on closed networks;
    /// validation stays on unless explicitly disabled here.
    pub fn danger_accept_invalid_certs(&mut self, accept: bool) -> &mut Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Establishes the TCP connection, performs the TLS handshake against
    /// the configured domain, and reads the server greeting.
    pub fn connect(&mut self) -> Result<Client<TlsStream<TcpStream>>> {
        let domain = self.domain.as_ref();
        let tcp = TcpStream::connect((domain, self.port))?;
        tcp.set_read_timeout(self.read_timeout)?;

        if self.accept_invalid_certs {
            warn!("TLS certificate validation disabled for {}", domain);
        }
        let connector = TlsConnector::builder()
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()?;
        let tls = TlsConnector::connect(&connector, domain, tcp)?;
        debug!("connected to {}:{}", domain, self.port);

        let mut client = Client::new(tls);
        client.read_greeting()?;
        Ok(client)
    }
}
