//! Ordered provider registry.
//!
//! Registration order is the probing order: when several providers accept the same
//! identifier, the one registered first wins.

use crate::provider::ProviderDescriptor;
use std::sync::{Arc, PoisonError, RwLock};

/// Source of provider descriptors, in probing order.
pub trait ProviderRegistry: Send + Sync {
    fn providers(&self) -> Vec<Arc<dyn ProviderDescriptor>>;
}

/// Thread-safe in-memory registry that keeps descriptors in insertion order.
#[derive(Default)]
pub struct OrderedProviderRegistry {
    entries: RwLock<Vec<Arc<dyn ProviderDescriptor>>>,
}

impl OrderedProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor to the end of the chain.
    pub fn register(&self, descriptor: Arc<dyn ProviderDescriptor>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.push(descriptor);
    }

    /// Register several descriptors at once, preserving their order.
    pub fn register_batch(
        &self,
        descriptors: impl IntoIterator<Item = Arc<dyn ProviderDescriptor>>,
    ) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.extend(descriptors);
    }

    /// Provider names in probing order.
    pub fn names(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.iter().map(|d| d.info().name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProviderRegistry for OrderedProviderRegistry {
    fn providers(&self) -> Vec<Arc<dyn ProviderDescriptor>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
