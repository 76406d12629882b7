use std::cmp::min;
use std::io::{Error, ErrorKind, Read, Result, Write};

/// A scripted `Read + Write` stream standing in for the TLS socket in tests.
///
/// Reads are served from `read_buf`; everything written is captured in
/// `written_buf` for assertions.
#[derive(Debug)]
pub struct MockStream {
    read_buf: Vec<u8>,
    read_pos: usize,
    pub written_buf: Vec<u8>,
    err_on_read: bool,
    eof_on_read: bool,
    timeout_on_read: bool,
}

impl Default for MockStream {
    fn default() -> Self {
        MockStream {
            read_buf: Vec::new(),
            read_pos: 0,
            written_buf: Vec::new(),
            err_on_read: false,
            eof_on_read: false,
            timeout_on_read: false,
        }
    }
}

impl MockStream {
    pub fn new(read_buf: Vec<u8>) -> MockStream {
        MockStream {
            read_buf,
            ..MockStream::default()
        }
    }

    /// All reads report a closed connection.
    pub fn with_eof(mut self) -> MockStream {
        self.eof_on_read = true;
        self
    }

    /// All reads fail with a generic I/O error.
    pub fn with_err(mut self) -> MockStream {
        self.err_on_read = true;
        self
    }

    /// All reads fail as an elapsed socket read deadline would.
    pub fn with_timeout(mut self) -> MockStream {
        self.timeout_on_read = true;
        self
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.eof_on_read {
            return Ok(0);
        }
        if self.err_on_read {
            return Err(Error::new(ErrorKind::Other, "MockStream error"));
        }
        if self.timeout_on_read {
            return Err(Error::new(ErrorKind::WouldBlock, "MockStream deadline"));
        }
        if self.read_pos >= self.read_buf.len() {
            return Err(Error::new(ErrorKind::UnexpectedEof, "EOF"));
        }
        let len = min(buf.len(), self.read_buf.len() - self.read_pos);
        buf[..len].copy_from_slice(&self.read_buf[self.read_pos..self.read_pos + len]);
        self.read_pos += len;
        Ok(len)
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.written_buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
