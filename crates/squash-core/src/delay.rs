//! Integer-sample delay line for lookahead.
//!
//! The audio path of a lookahead compressor runs `N` samples behind the
//! detector. [`LookaheadDelay`] provides that offset with a circular buffer
//! whose storage is sized once; changing the delay afterwards never
//! allocates as long as it stays within the reserved capacity.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

/// Circular delay line with a run-time adjustable integer delay.
///
/// # Example
///
/// ```rust
/// use squash_core::LookaheadDelay;
///
/// let mut delay = LookaheadDelay::new();
/// delay.reserve(4);
/// delay.set_delay(2);
///
/// assert_eq!(delay.process(1.0), 0.0);
/// assert_eq!(delay.process(2.0), 0.0);
/// assert_eq!(delay.process(3.0), 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LookaheadDelay {
    buffer: Vec<f32>,
    write_pos: usize,
    delay: usize,
}

impl LookaheadDelay {
    /// Create an empty delay line. Call [`reserve`](Self::reserve) before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the line for delays up to `max_delay` samples and clear it.
    ///
    /// Resizing to the current size reuses the existing storage.
    pub fn reserve(&mut self, max_delay: usize) {
        let len = max_delay + 1;
        if self.buffer.len() != len {
            #[cfg(feature = "tracing")]
            tracing::debug!(from = self.buffer.len(), to = len, "lookahead_delay: resize");
            self.buffer.resize(len, 0.0);
        }
        self.delay = self.delay.min(max_delay);
        self.reset();
    }

    /// Largest delay the current storage supports.
    pub fn max_delay(&self) -> usize {
        self.buffer.len().saturating_sub(1)
    }

    /// Allocated capacity of the underlying buffer, in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Set the delay in samples, clamped to [`max_delay`](Self::max_delay).
    pub fn set_delay(&mut self, delay: usize) {
        debug_assert!(delay <= self.max_delay(), "delay exceeds reserved capacity");
        self.delay = delay.min(self.max_delay());
    }

    /// Current delay in samples.
    pub fn delay(&self) -> usize {
        self.delay
    }

    /// Write one sample and return the sample written `delay` calls ago.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let len = self.buffer.len();
        if len == 0 {
            return input;
        }
        self.buffer[self.write_pos] = input;
        let read_pos = (self.write_pos + len - self.delay) % len;
        let output = self.buffer[read_pos];
        self.write_pos = (self.write_pos + 1) % len;
        output
    }

    /// Zero the stored samples and rewind the write position.
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
