//! SSE HTTP handler for the web layer.
//!
//! This module contains only the Axum handlers for SSE endpoints.
//! The broadcast core (Broadcaster, bus adapters, encoder) lives in the `sse` crate,
//! which knows nothing about HTTP.

pub mod handler;
