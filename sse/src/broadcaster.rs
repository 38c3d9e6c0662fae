use crate::bus::{Bus, Delivery};
use crate::encoder::encode;
use crate::error::Result;
use crate::message::{Message, Scalar};
use async_stream::stream;
use futures::Stream;
use log::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Channel used when the caller does not name one.
pub const DEFAULT_CHANNEL: &str = "sse";

/// Publishes messages to channels and turns channel subscriptions into streams of
/// encoded SSE frames.
///
/// The broadcaster keeps no per-channel or per-subscriber state; all delivery is done
/// by the bus. Share it between request handlers behind an `Arc`.
pub struct Broadcaster {
    bus: Arc<dyn Bus>,
    ids: IdClock,
}

impl Broadcaster {
    pub fn new(bus: Arc<dyn Bus>) -> Self {
        Self {
            bus,
            ids: IdClock::default(),
        }
    }

    /// Publishes `message` to `channel`.
    ///
    /// Messages without a (truthy) id are stamped with the current wall-clock time in
    /// seconds, strictly increasing across calls on this broadcaster.
    pub async fn publish(&self, channel: &str, message: Message) -> Result<()> {
        let message = match message.id() {
            Some(id) if id.is_truthy() => message,
            _ => message.with_id(self.ids.next()),
        };

        let envelope = message.to_envelope()?;
        self.bus.publish(channel, envelope).await?;

        debug!(
            "Published SSE message id={:?} type={:?} to channel {channel}",
            message.id(),
            message.event_type()
        );
        Ok(())
    }

    /// Subscribes to `channel` and returns the stream of encoded frames published to it
    /// from now on.
    ///
    /// The subscription is open by the time this returns. Bus control traffic is skipped.
    /// The stream ends when the bus closes the connection; an undecodable message is
    /// yielded as an error and ends the stream. Dropping the stream closes the
    /// subscription.
    pub async fn messages(
        &self,
        channel: &str,
    ) -> Result<impl Stream<Item = Result<String>> + Send + 'static> {
        let mut subscription = self.bus.subscribe(channel).await?;
        info!("Opened SSE subscription to channel {channel}");

        Ok(stream! {
            loop {
                match subscription.receive().await {
                    Ok(Delivery::Message { payload, .. }) => match Message::decode(&payload) {
                        Ok(message) => yield Ok(encode(&message)),
                        Err(e) => {
                            error!(
                                "Undecodable message on channel {}: {e}",
                                subscription.channel()
                            );
                            yield Err(e);
                            break;
                        }
                    },
                    Ok(Delivery::Subscribed { channel }) => {
                        trace!("Subscription to channel {channel} confirmed");
                    }
                    Err(e) if e.is_connection_closed() => {
                        info!(
                            "Bus closed subscription to channel {}, ending stream",
                            subscription.channel()
                        );
                        break;
                    }
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
        })
    }
}

/// Source of default event ids: Unix time in seconds with microsecond resolution.
#[derive(Default)]
struct IdClock {
    last_micros: AtomicU64,
}

impl IdClock {
    fn next(&self) -> Scalar {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_micros() as u64)
            .unwrap_or_default();

        // Never hand out the same or an earlier id twice, even if the clock stalls.
        let stamped = match self.last_micros.fetch_update(
            Ordering::SeqCst,
            Ordering::SeqCst,
            |last| Some(now.max(last + 1)),
        ) {
            Ok(last) | Err(last) => now.max(last + 1),
        };

        serde_json::Number::from_f64(stamped as f64 / 1_000_000.0)
            .map(Scalar::Number)
            .unwrap_or_else(|| Scalar::from(stamped))
    }
}
