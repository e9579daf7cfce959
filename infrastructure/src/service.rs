//! Wiring helper: a fully assembled scratchpad on the in-memory adapters.

use crate::config::FileConfig;
use crate::notify::BroadcastHub;
use crate::store::InMemorySessionStore;
use std::sync::Arc;
use workpad_application::{AuditSink, Scratchpad};

/// Build a [`Scratchpad`] backed by the in-memory store and broadcast hub.
pub fn in_memory_scratchpad(config: &FileConfig, audit: Arc<dyn AuditSink>) -> Scratchpad {
    let store = Arc::new(InMemorySessionStore::new(config.session_ttl()));
    let hub = Arc::new(BroadcastHub::new(config.notify.channel_capacity));
    Scratchpad::new(store, hub, audit, config.service_config())
}
