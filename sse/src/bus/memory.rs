use super::{Bus, Delivery, Subscription};
use crate::error::Result;
use async_stream::stream;
use async_trait::async_trait;
use dashmap::DashMap;
use log::*;
use tokio::sync::broadcast::{self, error::RecvError};

/// Per-channel buffer size. A subscriber that falls further behind than this skips ahead.
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process bus backed by one `broadcast` channel per channel name.
///
/// Channels are created on first subscribe and pruned once a publish finds no
/// remaining receivers.
pub struct MemoryBus {
    channels: DashMap<String, broadcast::Sender<String>>,
    capacity: usize,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity,
        }
    }

    /// Drops the channel's sender, ending every subscription to it.
    pub fn disconnect(&self, channel: &str) {
        if self.channels.remove(channel).is_some() {
            info!("Disconnected all subscribers from channel {channel}");
        }
    }

    /// Number of live subscriptions to `channel`.
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .get(channel)
            .map_or(0, |sender| sender.receiver_count())
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bus for MemoryBus {
    async fn publish(&self, channel: &str, payload: String) -> Result<()> {
        let delivered = match self.channels.get(channel) {
            // `send` only fails when there are no receivers left.
            Some(sender) => sender.send(payload).unwrap_or(0),
            None => 0,
        };

        if delivered == 0 {
            self.channels
                .remove_if(channel, |_, sender| sender.receiver_count() == 0);
        }

        trace!("Published to channel {channel}, {delivered} receiver(s)");
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> Result<Subscription> {
        let mut receiver = self
            .channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();

        let name = channel.to_string();
        let inbound = stream! {
            yield Delivery::Subscribed { channel: name.clone() };

            loop {
                match receiver.recv().await {
                    Ok(payload) => yield Delivery::Message { channel: name.clone(), payload },
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Subscriber on channel {name} lagged, skipped {skipped} message(s)");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        };

        Ok(Subscription::new(channel, inbound))
    }
}
