//! Shared loader state: completed-load cache, in-flight table and load order.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::watch;

use crate::descriptor::LoadRecord;
use crate::error::LoadError;

/// Value published to waiters of an in-flight load; `None` until it settles.
pub(crate) type Settled = Option<Result<LoadRecord, LoadError>>;

struct InFlight {
    generation: u64,
    rx: watch::Receiver<Settled>,
}

/// Snapshot returned by `ScriptLoader::status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingStatus {
    pub loaded_count: usize,
    pub in_flight_count: usize,
    pub load_order: Vec<String>,
}

/// Completed loads are never evicted; `load_order` only grows.
#[derive(Default)]
pub(crate) struct LoaderState {
    cache: HashMap<String, LoadRecord>,
    /// Cache keys in insertion order.
    cached_urls: Vec<String>,
    in_flight: HashMap<String, InFlight>,
    load_order: Vec<String>,
    next_generation: u64,
}

impl LoaderState {
    pub(crate) fn cached(&self, url: &str) -> Option<LoadRecord> {
        self.cache.get(url).cloned()
    }

    /// Receiver for a load of `url` that is already running.
    pub(crate) fn waiter(&self, url: &str) -> Option<watch::Receiver<Settled>> {
        self.in_flight.get(url).map(|f| f.rx.clone())
    }

    /// Register a new in-flight load; returns its generation and the sender to settle it.
    pub(crate) fn begin(&mut self, url: &str) -> (u64, watch::Sender<Settled>) {
        let generation = self.next_generation;
        self.next_generation += 1;
        let (tx, rx) = watch::channel(None);
        self.in_flight
            .insert(url.to_string(), InFlight { generation, rx });
        (generation, tx)
    }

    /// Record a successful load: cache it, append to the load order, leave in-flight.
    pub(crate) fn complete(&mut self, url: &str, generation: u64, record: LoadRecord) {
        self.load_order.push(record.name.clone());
        self.insert_cached(url, record);
        self.finish(url, generation);
    }

    /// Cache a record for a capability that was already present. Not a completion,
    /// so the load order is left alone.
    pub(crate) fn record_present(&mut self, url: &str, record: LoadRecord) {
        self.insert_cached(url, record);
    }

    /// Drop the in-flight entry for `url` if it still belongs to `generation`.
    pub(crate) fn finish(&mut self, url: &str, generation: u64) {
        if self
            .in_flight
            .get(url)
            .is_some_and(|f| f.generation == generation)
        {
            self.in_flight.remove(url);
        }
    }

    pub(crate) fn clear_in_flight(&mut self) -> usize {
        let n = self.in_flight.len();
        self.in_flight.clear();
        n
    }

    pub(crate) fn has_completed(&self, name: &str) -> bool {
        self.load_order.iter().any(|n| n == name)
    }

    pub(crate) fn cached_records(&self) -> Vec<(String, LoadRecord)> {
        self.cached_urls
            .iter()
            .filter_map(|url| self.cache.get(url).map(|r| (url.clone(), r.clone())))
            .collect()
    }

    pub(crate) fn status(&self) -> LoadingStatus {
        LoadingStatus {
            loaded_count: self.cache.len(),
            in_flight_count: self.in_flight.len(),
            load_order: self.load_order.clone(),
        }
    }

    fn insert_cached(&mut self, url: &str, record: LoadRecord) {
        if self.cache.insert(url.to_string(), record).is_none() {
            self.cached_urls.push(url.to_string());
        }
    }
}
