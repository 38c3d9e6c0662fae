use config::Config;
use log::{info, warn};
use sse::bus::{Bus, MemoryBus, RedisBus};
use sse::Broadcaster;
use std::sync::Arc;

pub mod config;
pub mod logging;

/// Builds the bus selected by the configured URL.
pub fn init_bus(config: &Config) -> Result<Arc<dyn Bus>, sse::Error> {
    if config.uses_memory_bus() {
        warn!("Using the in-process memory bus: only subscribers of this process receive messages");
        return Ok(Arc::new(MemoryBus::new()));
    }

    info!("Using the Redis bus");
    Ok(Arc::new(RedisBus::new(config.bus_url())?))
}

pub fn init_broadcaster(config: &Config) -> Result<Arc<Broadcaster>, sse::Error> {
    Ok(Arc::new(Broadcaster::new(init_bus(config)?)))
}

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub broadcaster: Arc<Broadcaster>,
    pub config: Config,
}

impl AppState {
    pub fn new(app_config: Config, broadcaster: &Arc<Broadcaster>) -> Self {
        Self {
            broadcaster: Arc::clone(broadcaster),
            config: app_config,
        }
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        self.broadcaster.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_bus_url_builds_broadcaster() {
        let config = Config::default().set_bus_url("memory://".to_string());
        assert!(init_broadcaster(&config).is_ok());
    }

    #[test]
    fn test_redis_bus_url_is_validated() {
        let config = Config::default().set_bus_url("definitely not a url".to_string());
        let err = init_bus(&config).err().unwrap();
        assert_eq!(err.error_kind, sse::ErrorKind::Transport);
    }

    #[test]
    fn test_app_state_shares_broadcaster() {
        let config = Config::default().set_bus_url("memory://".to_string());
        let broadcaster = init_broadcaster(&config).unwrap();
        let state = AppState::new(config, &broadcaster);
        assert!(std::ptr::eq(state.broadcaster(), broadcaster.as_ref()));
    }
}
