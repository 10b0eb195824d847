//! Running maximum over a sliding window of detector samples.
//!
//! A lookahead limiter must keep its gain reduced for as long as a peak is
//! still travelling through the delay line. Scanning the whole line every
//! sample is `O(N)`; [`PeakWindow`] keeps a monotonic queue instead, giving
//! amortised `O(1)` per sample. The queue never holds more than `window`
//! entries, so once capacity is reserved pushing never allocates.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::collections::VecDeque;

/// Sliding-window maximum of non-negative detector values.
///
/// # Example
///
/// ```rust
/// use squash_core::PeakWindow;
///
/// let mut window = PeakWindow::new();
/// window.set_window(3);
///
/// assert_eq!(window.push(0.5), 0.5);
/// assert_eq!(window.push(0.1), 0.5);
/// assert_eq!(window.push(0.2), 0.5);
/// assert_eq!(window.push(0.0), 0.2); // 0.5 has left the window
/// ```
#[derive(Debug, Clone)]
pub struct PeakWindow {
    /// (sample index, value), values strictly decreasing front to back
    queue: VecDeque<(u64, f32)>,
    window: usize,
    index: u64,
}

impl PeakWindow {
    /// Create a window of length 1 (the maximum is the latest value).
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            window: 1,
            index: 0,
        }
    }

    /// Set the window length in samples (at least 1) and clear the state.
    ///
    /// Only allocates when `window` exceeds the capacity reserved so far.
    pub fn set_window(&mut self, window: usize) {
        self.window = window.max(1);
        self.reset();
        if self.queue.capacity() < self.window {
            #[cfg(feature = "tracing")]
            tracing::debug!(window = self.window, "peak_window: grow");
            self.queue.reserve(self.window);
        }
    }

    /// Current window length in samples.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Reserved queue capacity.
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Push the next detector value and return the maximum over the window.
    #[inline]
    pub fn push(&mut self, value: f32) -> f32 {
        // Expire first so the queue holds at most `window` entries after the push.
        let window = self.window as u64;
        while let Some(&(idx, _)) = self.queue.front() {
            if idx + window <= self.index {
                self.queue.pop_front();
            } else {
                break;
            }
        }
        while let Some(&(_, back)) = self.queue.back() {
            if back <= value {
                self.queue.pop_back();
            } else {
                break;
            }
        }
        self.queue.push_back((self.index, value));
        self.index += 1;

        self.queue.front().map_or(value, |&(_, peak)| peak)
    }

    /// Forget all pushed values.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.index = 0;
    }
}

impl Default for PeakWindow {
    fn default() -> Self {
        Self::new()
    }
}
