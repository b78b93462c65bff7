use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::request::Request;

#[derive(Debug)]
pub enum BodyError {
    /// The peer closed the connection before the declared body was complete.
    UnexpectedEof,
    /// A chunk-size line was not a valid hexadecimal integer.
    InvalidChunkSize,
    /// A chunk payload was not followed by CRLF.
    MissingChunkTerminator,
    /// Transport failure while reading the body.
    Io(std::io::Error),
}

impl From<std::io::Error> for BodyError {
    fn from(e: std::io::Error) -> Self {
        BodyError::Io(e)
    }
}

/// How the request body is delimited on the wire.
///
/// Chunked transfer encoding takes precedence over Content-Length when a
/// request carries both headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// No body header present; the body is empty and no reads are issued.
    Empty,
    /// Exactly this many bytes follow the header block.
    ContentLength(usize),
    /// Hex-size-prefixed chunks terminated by a zero-size chunk.
    Chunked,
}

impl Framing {
    pub fn from_request(req: &Request) -> Self {
        if req.is_chunked() {
            Framing::Chunked
        } else if let Some(n) = req.content_length() {
            Framing::ContentLength(n)
        } else {
            Framing::Empty
        }
    }
}

/// Materializes a request body from a stream plus whatever bytes the header
/// read already pulled past the blank line.
///
/// TCP delivers bytes in arbitrary segments regardless of protocol framing,
/// so both modes count buffered bytes first and issue further reads until the
/// declared boundary is satisfied. The buffer retains read-ahead across chunk
/// boundaries so no byte is lost or consumed twice.
pub struct BodyReader<'a, S> {
    stream: &'a mut S,
    buffer: &'a mut BytesMut,
}

impl<'a, S: AsyncRead + Unpin> BodyReader<'a, S> {
    /// `buffer` holds any bytes already read beyond the header block.
    pub fn new(stream: &'a mut S, buffer: &'a mut BytesMut) -> Self {
        Self { stream, buffer }
    }

    /// Reads the full body for the given framing mode.
    ///
    /// Any violation of the declared framing (short read, bad chunk-size
    /// line, missing terminator) is fatal to the connection; the caller
    /// answers with a 400 and closes.
    pub async fn read_body(&mut self, framing: Framing) -> Result<Vec<u8>, BodyError> {
        match framing {
            Framing::Empty => Ok(Vec::new()),
            Framing::ContentLength(n) => self.read_sized(n).await,
            Framing::Chunked => self.read_chunked().await,
        }
    }

    async fn read_sized(&mut self, length: usize) -> Result<Vec<u8>, BodyError> {
        while self.buffer.len() < length {
            self.fill().await?;
        }
        Ok(self.buffer.split_to(length).to_vec())
    }

    async fn read_chunked(&mut self) -> Result<Vec<u8>, BodyError> {
        let mut body = Vec::new();

        loop {
            let size_line = self.read_line().await?;
            let size = parse_chunk_size(&size_line)?;

            if size == 0 {
                // Trailer lines are discarded; the empty line ends the body.
                loop {
                    let trailer = self.read_line().await?;
                    if trailer.is_empty() {
                        return Ok(body);
                    }
                }
            }

            while self.buffer.len() < size {
                self.fill().await?;
            }
            body.extend_from_slice(&self.buffer.split_to(size));

            self.consume_crlf().await?;
        }
    }

    /// Reads one CRLF-terminated line, returned without the terminator.
    async fn read_line(&mut self) -> Result<String, BodyError> {
        loop {
            if let Some(pos) = self.buffer.windows(2).position(|w| w == b"\r\n") {
                let line = self.buffer.split_to(pos);
                self.buffer.advance(2);
                return String::from_utf8(line.to_vec())
                    .map_err(|_| BodyError::InvalidChunkSize);
            }

            self.fill().await?;
        }
    }

    async fn consume_crlf(&mut self) -> Result<(), BodyError> {
        while self.buffer.len() < 2 {
            self.fill().await?;
        }
        if &self.buffer[..2] != b"\r\n" {
            return Err(BodyError::MissingChunkTerminator);
        }
        self.buffer.advance(2);
        Ok(())
    }

    async fn fill(&mut self) -> Result<(), BodyError> {
        let n = self.stream.read_buf(&mut *self.buffer).await?;
        if n == 0 {
            // EOF before the framing boundary: the body length is ambiguous.
            return Err(BodyError::UnexpectedEof);
        }
        Ok(())
    }
}

fn parse_chunk_size(line: &str) -> Result<usize, BodyError> {
    // Chunk extensions after ';' are ignored.
    let token = line.split(';').next().unwrap_or("").trim();
    usize::from_str_radix(token, 16).map_err(|_| BodyError::InvalidChunkSize)
}
