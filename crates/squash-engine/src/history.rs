//! Rolling compression history for visualisation.
//!
//! Converts the packet stream of one channel group into time-stamped points,
//! split into segments wherever playback was interrupted, and keeps the last
//! [`MAX_TIME_SECONDS`] of it.

use crate::telemetry::StatisticsPacket;

/// How far back the history reaches, relative to its newest point.
pub const MAX_TIME_SECONDS: f32 = 10.0;

/// One point of the compression history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    /// Seconds since the first packet ever received.
    pub time: f32,
    /// Target compression (dB).
    pub target: f32,
    /// Actual compression (dB).
    pub actual: f32,
}

/// Contiguous run of points without a playback interruption.
pub type Segment = Vec<HistoryPoint>;

/// Time-windowed history of [`StatisticsPacket`]s.
///
/// # Example
///
/// ```rust
/// use squash_engine::{CompressionHistory, StatisticsPacket};
///
/// let mut history = CompressionHistory::new(1000.0);
/// history.push(&[StatisticsPacket {
///     index_of_first_sample: 500,
///     target_compression_db: -6.0,
///     actual_compression_db: -4.0,
/// }]);
/// history.push(&[StatisticsPacket {
///     index_of_first_sample: 1500,
///     target_compression_db: -3.0,
///     actual_compression_db: -3.5,
/// }]);
///
/// let segment = &history.segments()[0];
/// assert_eq!(segment[0].time, 0.0);
/// assert_eq!(segment[1].time, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct CompressionHistory {
    sample_rate: f64,
    begin_new_segment: bool,
    segments: Vec<Segment>,
    first_sample_index: Option<u64>,
}

impl CompressionHistory {
    /// Create an empty history for a stream at `sample_rate`.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            begin_new_segment: true,
            segments: Vec::new(),
            first_sample_index: None,
        }
    }

    /// Append a batch of packets.
    ///
    /// Packets not newer than the last stored point are ignored.
    pub fn push(&mut self, packets: &[StatisticsPacket]) {
        for packet in packets {
            let first = *self
                .first_sample_index
                .get_or_insert(packet.index_of_first_sample);
            let time = self.packet_time(packet.index_of_first_sample, first);
            if self.last_time().is_some_and(|last| time <= last) {
                continue;
            }

            if self.begin_new_segment || self.segments.is_empty() {
                self.segments.push(Segment::new());
                self.begin_new_segment = false;
            }
            if let Some(segment) = self.segments.last_mut() {
                segment.push(HistoryPoint {
                    time,
                    target: packet.target_compression_db,
                    actual: packet.actual_compression_db,
                });
            }
        }
        self.discard_old();
    }

    /// Start a new segment with the next packet, e.g. after playback resumed.
    pub fn begin_new_segment(&mut self) {
        self.begin_new_segment = true;
    }

    /// All retained segments, oldest first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Time of the newest point, if any.
    pub fn last_time(&self) -> Option<f32> {
        self.segments
            .iter()
            .rev()
            .find_map(|segment| segment.last())
            .map(|point| point.time)
    }

    /// Whether no point is retained.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(Vec::is_empty)
    }

    fn packet_time(&self, index: u64, first: u64) -> f32 {
        ((index as f64 - first as f64) / self.sample_rate) as f32
    }

    fn discard_old(&mut self) {
        let Some(newest) = self.last_time() else {
            return;
        };
        let cutoff = newest - MAX_TIME_SECONDS;
        for segment in &mut self.segments {
            let stale = segment.partition_point(|point| point.time < cutoff);
            segment.drain(..stale);
        }
        self.segments.retain(|segment| !segment.is_empty());
    }
}
