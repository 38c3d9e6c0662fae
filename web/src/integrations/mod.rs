//! Optional SSE integrations.
//!
//! Each integration contributes extra routes that stream integration-specific channels.
//! The integrations built into this server are listed in `AVAILABLE`; the ones enabled
//! by configuration are registered at startup.
use crate::AppState;
use axum::Router;
use log::*;
use sse::integration::{Factory, Registry};

pub mod deposit;

/// Integrations built into this server.
pub const AVAILABLE: &[(&str, Factory<AppState, Router>)] = &[(deposit::ID, deposit::init)];

/// Registers every integration enabled in the configuration.
///
/// A failing integration is logged and left out; it never prevents the server from
/// starting.
pub fn load(app_state: &AppState) -> Registry<Router> {
    let mut registry = Registry::new();
    let mut entries = Vec::new();

    for id in &app_state.config.integrations {
        match AVAILABLE.iter().find(|(name, _)| name == id) {
            Some(&(name, factory)) => entries.push((name, factory)),
            None => {
                let err = sse::Error::missing_dependency(format!(
                    "no integration named `{id}` is built into this server"
                ));
                error!("Failed to register SSE integration {id}: {err}");
            }
        }
    }

    let failures = registry.load(app_state, entries);
    info!(
        "Registered {} SSE integration(s), {} failed",
        registry.len(),
        failures.len()
    );

    registry
}
