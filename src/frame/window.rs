//! Sliding search window over a streamed input.
//!
//! The window keeps at most `history` bytes from previous reads plus the
//! chunk just pushed. A needle no longer than `history` that straddles two
//! reads is therefore always fully inside the window when it is searched.

/// Bounded byte window with an absolute-offset counter and a scan cursor.
#[derive(Debug)]
pub struct SearchWindow {
    buf: Vec<u8>,
    history: usize,
    discarded: u64,
    cursor: usize,
}

impl SearchWindow {
    /// Creates a window that retains `history` bytes between pushes.
    pub fn new(history: usize) -> Self {
        Self {
            buf: Vec::with_capacity(history.saturating_mul(2)),
            history,
            discarded: 0,
            cursor: 0,
        }
    }

    /// Appends freshly read bytes.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Finds the next occurrence of `needle` at or after the scan cursor.
    ///
    /// Returns the index within the window. The cursor does not move on a
    /// hit; call [`skip_match`](Self::skip_match) to search past it. On a
    /// miss the cursor moves to the first position where a match could still
    /// complete once more bytes arrive.
    pub fn find(&mut self, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }

        let hit = self.buf[self.cursor.min(self.buf.len())..]
            .windows(needle.len())
            .position(|w| w == needle)
            .map(|i| self.cursor + i);

        if hit.is_none() {
            let tail = self.buf.len().saturating_sub(needle.len() - 1);
            self.cursor = self.cursor.max(tail);
        }

        hit
    }

    /// Resumes scanning one byte after a rejected match at `index`.
    pub fn skip_match(&mut self, index: usize) {
        self.cursor = index + 1;
    }

    /// Drops everything but the last `history` bytes.
    pub fn trim(&mut self) {
        if self.buf.len() <= self.history {
            return;
        }
        let excess = self.buf.len() - self.history;
        self.buf.drain(..excess);
        self.discarded += excess as u64;
        self.cursor = self.cursor.saturating_sub(excess);
    }

    /// Absolute stream offset of a window index.
    pub fn absolute(&self, index: usize) -> u64 {
        self.discarded + index as u64
    }

    /// Bytes dropped from the front so far.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
