//! Line-delimited transport over an async reader/writer pair.
//!
//! Each frame is a single line terminated by `\n`. Generic over the
//! reader and writer so tests can drive it with in-memory buffers.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::trace;

use crate::errors::TransportError;

pub struct LineTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Reads the next line, trimmed. `None` means end of input.
    ///
    /// Invalid UTF-8 is replaced rather than rejected so the line still gets a
    /// parse-error reply.
    pub async fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        let mut buffer = Vec::new();
        let bytes_read = self
            .reader
            .read_until(b'\n', &mut buffer)
            .await
            .map_err(TransportError::Read)?;

        if bytes_read == 0 {
            return Ok(None);
        }

        let line = String::from_utf8_lossy(&buffer).trim().to_string();
        trace!(len = line.len(), "read frame");
        Ok(Some(line))
    }

    /// Writes one frame followed by `\n` and flushes.
    pub async fn write_line(&mut self, message: &str) -> Result<(), TransportError> {
        trace!(len = message.len(), "writing frame");

        self.writer
            .write_all(message.as_bytes())
            .await
            .map_err(TransportError::Write)?;
        self.writer
            .write_all(b"\n")
            .await
            .map_err(TransportError::Write)?;
        self.writer.flush().await.map_err(TransportError::Write)
    }
}
