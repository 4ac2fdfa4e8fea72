#![allow(dead_code)]

use locus_api::{Clock, Handle};
use locus_core::handle::MemoryHandle;
use locus_plugin::{FnDescriptor, HandleProvider, ProviderDescriptor, ProviderError, ProviderInfo};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Clock that only moves when told to.
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }
}

/// Provider accepting identifiers with a given suffix and serving a fixed payload.
pub struct SuffixProvider {
    suffix: &'static str,
    payload: Vec<u8>,
    probes: Arc<AtomicUsize>,
}

impl HandleProvider for SuffixProvider {
    fn can_handle(&self, id: &str) -> Result<bool, ProviderError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        Ok(id.ends_with(self.suffix))
    }

    fn bind(self: Box<Self>, _id: &str) -> Result<Handle, ProviderError> {
        Ok(MemoryHandle::shared(self.payload))
    }
}

pub fn suffix_provider(
    name: &str,
    suffix: &'static str,
    payload: &[u8],
    probes: Arc<AtomicUsize>,
) -> Arc<dyn ProviderDescriptor> {
    let payload = payload.to_vec();
    Arc::new(FnDescriptor::new(ProviderInfo::new(name), move || {
        Ok(Box::new(SuffixProvider {
            suffix,
            payload: payload.clone(),
            probes: probes.clone(),
        }) as Box<dyn HandleProvider>)
    }))
}

/// Provider whose capability probe always fails.
pub struct FailingProbe;

impl HandleProvider for FailingProbe {
    fn can_handle(&self, _id: &str) -> Result<bool, ProviderError> {
        Err("corrupt archive header".into())
    }

    fn bind(self: Box<Self>, _id: &str) -> Result<Handle, ProviderError> {
        unreachable!("bind is never reached after a failed probe")
    }
}

pub fn failing_probe(name: &str) -> Arc<dyn ProviderDescriptor> {
    Arc::new(FnDescriptor::new(ProviderInfo::new(name), || {
        Ok(Box::new(FailingProbe) as Box<dyn HandleProvider>)
    }))
}
