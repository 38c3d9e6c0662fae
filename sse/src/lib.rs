//! Server-Sent Events (SSE) broadcast infrastructure.
//!
//! Backend processes publish structured messages to named channels; any number of HTTP
//! clients subscribe to a channel and receive those messages as a live stream of SSE
//! frames.
//!
//! # Architecture
//!
//! - **Channel bus**: delivery between publishers and subscribers is done by an external
//!   pub/sub transport (Redis) behind the `Bus` trait. An in-process `MemoryBus` serves
//!   tests and single-process deployments.
//! - **One connection per subscriber**: every call to `Broadcaster::messages` opens its
//!   own bus subscription. Subscribers never share connections or state.
//! - **Ephemeral messages**: the bus only delivers to currently connected subscribers.
//!   Messages published before a subscription was opened are never replayed.
//! - **Stateless broadcaster**: no locks and no per-channel bookkeeping on the hot path.
//!
//! # Message Flow
//!
//! 1. A client connects to the `/sse` endpoint with an optional `channel` parameter
//! 2. The handler calls `Broadcaster::messages(channel)`, which subscribes on the bus
//! 3. A publisher calls `Broadcaster::publish(channel, message)`:
//!    - a default id is stamped when none was given
//!    - the message is serialized into a JSON envelope and published on the bus
//! 4. Each subscription decodes the envelope, encodes it as an SSE frame and yields it
//! 5. When the client disconnects the stream is dropped and its bus connection closed
//!
//! # Example: Publishing an event
//!
//! ```rust,ignore
//! use sse::message::Message;
//!
//! app_state
//!     .broadcaster
//!     .publish(
//!         "deposits",
//!         Message::new(json!({"status": "published"})).with_event_type("edit"),
//!     )
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - `broadcaster`: publish and subscribe API
//! - `bus`: `Bus` trait with Redis and in-memory implementations
//! - `encoder`: SSE wire encoding
//! - `integration`: startup registry for optional integrations
//! - `message`: message model and bus envelope

pub mod broadcaster;
pub mod bus;
pub mod encoder;
pub mod error;
pub mod integration;
pub mod message;

pub use broadcaster::{Broadcaster, DEFAULT_CHANNEL};
pub use error::{Error, ErrorKind};
pub use message::Message;
