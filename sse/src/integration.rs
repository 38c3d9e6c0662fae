//! Registration of optional integrations.
//!
//! The host application enumerates the integrations it wants at startup as a table of
//! `(id, factory)` pairs. Each factory is invoked with the hosting context and its
//! product is stored under the id. A failing integration is reported and skipped; it
//! never prevents the others or the core service from starting.
use crate::error::{Error, Result};
use log::*;
use std::collections::BTreeMap;

/// Builds an integration from the hosting context.
pub type Factory<C, T> = fn(&C) -> Result<T>;

pub struct Registry<T> {
    integrations: BTreeMap<String, T>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            integrations: BTreeMap::new(),
        }
    }

    /// Builds and stores one integration. Ids are unique: registering an id twice fails
    /// with `DuplicateIntegration` and leaves the first registration in place.
    pub fn register<C, F>(&mut self, id: impl Into<String>, context: &C, factory: F) -> Result<&T>
    where
        F: FnOnce(&C) -> Result<T>,
    {
        let id = id.into();
        if self.integrations.contains_key(&id) {
            return Err(Error::duplicate_integration(id));
        }

        let integration = factory(context)?;
        info!("Registered SSE integration {id}");
        Ok(self.integrations.entry(id).or_insert(integration))
    }

    /// Registers every entry in order. Failures are logged and returned alongside the
    /// id that caused them; successful entries stay registered.
    pub fn load<C, I, S>(&mut self, context: &C, entries: I) -> Vec<(String, Error)>
    where
        I: IntoIterator<Item = (S, Factory<C, T>)>,
        S: Into<String>,
    {
        let mut failures = Vec::new();
        for (id, factory) in entries {
            let id = id.into();
            if let Err(e) = self.register(id.clone(), context, factory) {
                error!("Failed to register SSE integration {id}: {e}");
                failures.push((id, e));
            }
        }
        failures
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.integrations.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.integrations.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.integrations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.integrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.integrations.is_empty()
    }

    /// Consumes the registry, yielding integrations in id order.
    pub fn into_integrations(self) -> impl Iterator<Item = (String, T)> {
        self.integrations.into_iter()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
