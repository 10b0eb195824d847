//! Per-block compression telemetry.
//!
//! Each realtime channel group may carry a [`TelemetrySink`]. After every
//! processed block the group appends one [`StatisticsPacket`]; the consumer
//! (typically a meter on another thread) owns the resulting sequence.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

/// Compression measured for one realtime block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticsPacket {
    /// Stream position of the block's first sample.
    pub index_of_first_sample: u64,
    /// Compression the static curve asks for at the block peak (dB).
    pub target_compression_db: f32,
    /// Smoothed gain reduction actually applied at the block peak (dB).
    pub actual_compression_db: f32,
}

/// Append-only consumer of [`StatisticsPacket`]s.
///
/// `push` runs on the audio thread and must not block.
pub trait TelemetrySink: Send {
    /// Append one packet.
    fn push(&mut self, packet: StatisticsPacket);

    /// Packets this sink had to discard so far.
    fn dropped(&self) -> u64 {
        0
    }
}

impl TelemetrySink for Vec<StatisticsPacket> {
    fn push(&mut self, packet: StatisticsPacket) {
        Vec::push(self, packet);
    }
}

/// Non-blocking sink feeding a bounded channel.
///
/// When the consumer falls behind, packets are dropped and counted rather
/// than stalling the audio thread.
#[derive(Debug)]
pub struct PacketSender {
    tx: Sender<StatisticsPacket>,
    dropped: u64,
}

impl PacketSender {
    /// Create a sender/receiver pair holding at most `capacity` packets.
    pub fn bounded(capacity: usize) -> (Self, Receiver<StatisticsPacket>) {
        let (tx, rx) = bounded(capacity);
        (Self { tx, dropped: 0 }, rx)
    }
}

impl TelemetrySink for PacketSender {
    fn push(&mut self, packet: StatisticsPacket) {
        match self.tx.try_send(packet) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                if self.dropped == 0 {
                    tracing::warn!("telemetry consumer is not keeping up, dropping packets");
                }
                self.dropped += 1;
            }
        }
    }

    fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(index: u64) -> StatisticsPacket {
        StatisticsPacket {
            index_of_first_sample: index,
            target_compression_db: -3.0,
            actual_compression_db: -2.0,
        }
    }

    #[test]
    fn vec_sink_appends_in_order() {
        let mut sink: Vec<StatisticsPacket> = Vec::new();
        TelemetrySink::push(&mut sink, packet(0));
        TelemetrySink::push(&mut sink, packet(512));
        assert_eq!(sink, vec![packet(0), packet(512)]);
        assert_eq!(TelemetrySink::dropped(&sink), 0);
    }

    #[test]
    fn full_channel_drops_and_counts() {
        let (mut sender, rx) = PacketSender::bounded(2);
        for i in 0..5 {
            sender.push(packet(i * 512));
        }
        assert_eq!(sender.dropped(), 3);
        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(received, vec![packet(0), packet(512)]);
    }

    #[test]
    fn disconnected_consumer_never_blocks() {
        let (mut sender, rx) = PacketSender::bounded(4);
        drop(rx);
        sender.push(packet(0));
        assert_eq!(sender.dropped(), 1);
    }
}
