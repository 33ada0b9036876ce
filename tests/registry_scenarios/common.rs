//! Shared helpers for the scenario suite.

#![allow(dead_code)]

use keyreg::{Registry, Session};
use std::sync::Arc;

/// A registry administered by `admin`, plus a session per named identity.
pub struct World {
    pub registry: Arc<Registry>,
}

impl World {
    pub fn new() -> Self {
        World {
            registry: Registry::ephemeral("admin"),
        }
    }

    pub fn as_(&self, who: &str) -> Session {
        Session::new(self.registry.clone(), who)
    }

    pub fn admin(&self) -> Session {
        self.as_("admin")
    }
}
