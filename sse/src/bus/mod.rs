//! Channel bus adapters.
//!
//! A bus carries raw envelopes between publishers and subscribers on named channels.
//! Each `Subscription` owns its own connection to the bus; nothing is shared between
//! subscriptions, and dropping one releases its connection.

use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::stream::{BoxStream, Stream, StreamExt};
use log::*;
use std::fmt;

pub mod memory;
pub mod redis_bus;

pub use memory::MemoryBus;
pub use redis_bus::RedisBus;

/// One item received on a subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// The bus confirmed the subscription. Control traffic only, carries no data.
    Subscribed { channel: String },
    /// A published payload.
    Message { channel: String, payload: String },
}

#[async_trait]
pub trait Bus: Send + Sync {
    /// Publishes a raw payload to `channel`. Subscribers that are not currently connected
    /// never see it.
    async fn publish(&self, channel: &str, payload: String) -> Result<()>;

    /// Opens a dedicated connection subscribed to exactly `channel`.
    async fn subscribe(&self, channel: &str) -> Result<Subscription>;
}

/// A live subscription to one channel.
pub struct Subscription {
    channel: String,
    inbound: BoxStream<'static, Delivery>,
}

impl Subscription {
    pub fn new(
        channel: impl Into<String>,
        inbound: impl Stream<Item = Delivery> + Send + 'static,
    ) -> Self {
        Self {
            channel: channel.into(),
            inbound: inbound.boxed(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Waits for the next delivery. Fails with `ConnectionClosed` once the bus side of the
    /// connection has gone away.
    pub async fn receive(&mut self) -> Result<Delivery> {
        self.inbound.next().await.ok_or_else(Error::connection_closed)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        debug!("Releasing bus subscription to channel {}", self.channel);
    }
}
