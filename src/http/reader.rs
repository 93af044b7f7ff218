use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Result, ServeError};
use crate::http::buffer::RequestBuffer;

/// Outcome of waiting for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// A full header block of this many bytes is in the buffer.
    Complete(usize),
    /// The peer closed its side of the connection.
    Closed,
}

/// Reads from `stream` into `buffer` until the accumulated bytes end with
/// the header terminator.
///
/// Each read asks for at most `read_chunk` bytes and never more than the
/// buffer can still hold. A full buffer without a terminator is reported as
/// [`ServeError::BufferOverflow`].
pub async fn receive_request<R>(
    stream: &mut R,
    buffer: &mut RequestBuffer,
    read_chunk: usize,
) -> Result<Frame>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = vec![0u8; read_chunk];

    loop {
        let want = read_chunk.min(buffer.remaining());
        if want == 0 {
            return Err(ServeError::BufferOverflow {
                capacity: buffer.capacity(),
            });
        }

        let n = stream.read(&mut chunk[..want]).await?;
        if n == 0 {
            if !buffer.is_empty() {
                tracing::debug!(
                    discarded = buffer.len(),
                    "Peer closed with an incomplete request"
                );
            }
            return Ok(Frame::Closed);
        }

        buffer
            .extend(&chunk[..n])
            .map_err(|capacity| ServeError::BufferOverflow { capacity })?;

        if buffer.ends_with_terminator() {
            return Ok(Frame::Complete(buffer.len()));
        }
    }
}
