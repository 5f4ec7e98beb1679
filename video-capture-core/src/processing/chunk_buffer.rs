/// Ordered accumulator for encoded chunks of one recording.
///
/// Arrival order is playback order, so chunks are never reordered or merged
/// until [`ChunkBuffer::take`] concatenates them. Empty chunks are ignored.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    chunks: Vec<Vec<u8>>,
    total_bytes: usize,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk. Returns `false` if it was empty and therefore dropped.
    pub fn push(&mut self, chunk: Vec<u8>) -> bool {
        if chunk.is_empty() {
            return false;
        }
        self.total_bytes += chunk.len();
        self.chunks.push(chunk);
        true
    }

    /// Concatenate every chunk in arrival order and leave the buffer empty.
    pub fn take(&mut self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.total_bytes);
        for chunk in self.chunks.drain(..) {
            data.extend_from_slice(&chunk);
        }
        self.total_bytes = 0;
        data
    }

    /// Discard everything buffered.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.total_bytes = 0;
    }

    /// Number of chunks held.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Total bytes across all chunks.
    pub fn byte_len(&self) -> usize {
        self.total_bytes
    }
}
