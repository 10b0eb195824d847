//! Outbound lifecycle notifications.
//!
//! Observers such as a metering overlay learn the realtime sample rate from
//! these events instead of polling the instance.

use crossbeam_channel::{Receiver, Sender, unbounded};

/// Stream parameters known once realtime processing starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessingSettings {
    /// Realtime sample rate in Hz.
    pub sample_rate: f64,
}

/// Event published by an [`EffectInstance`](crate::EffectInstance).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InstanceEvent {
    /// Realtime parameters became known (`Some`) or were cleared (`None`).
    ProcessingSettings(Option<ProcessingSettings>),
    /// Playback resumed after a pause; telemetry continuity is broken.
    Resumed,
}

/// Fan-out of [`InstanceEvent`]s to any number of subscribers.
#[derive(Debug, Default)]
pub struct EventPublisher {
    subscribers: Vec<Sender<InstanceEvent>>,
}

impl EventPublisher {
    /// Create a publisher with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&mut self) -> Receiver<InstanceEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Send `event` to every live subscriber, dropping disconnected ones.
    pub fn publish(&mut self, event: InstanceEvent) {
        tracing::debug!(?event, subscribers = self.subscribers.len(), "publishing event");
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    /// Number of subscribers still connected at the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
