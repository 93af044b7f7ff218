use bytes::BytesMut;

/// Marks the end of an HTTP header block.
pub const HEADER_TERMINATOR: &[u8; 4] = b"\r\n\r\n";

/// Fixed-capacity storage for the bytes of one request.
///
/// The last slot of the capacity is never filled, so `len() < capacity()`
/// holds at all times.
#[derive(Debug)]
pub struct RequestBuffer {
    buf: BytesMut,
    capacity: usize,
}

impl RequestBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes that can still be appended.
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(1).saturating_sub(self.buf.len())
    }

    /// Appends `chunk`, refusing it whole if it does not fit.
    pub fn extend(&mut self, chunk: &[u8]) -> Result<(), usize> {
        if chunk.len() > self.remaining() {
            return Err(self.capacity);
        }
        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    /// True when the accumulated bytes end with CR LF CR LF.
    pub fn ends_with_terminator(&self) -> bool {
        self.buf.len() >= HEADER_TERMINATOR.len() && self.buf.ends_with(HEADER_TERMINATOR)
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}
