//! Location service facade.
//!
//! Owns one identifier table, one listing cache and one resolver. The resolver and
//! the listing cache share no state; `reset` is the only operation spanning both.

use crate::config::LocationConfig;
use crate::error::Result;
use crate::handle::FsHandleFactory;
use crate::ids::{IdMap, IdTarget, IdentifierTable};
use crate::listing::{Listing, ListingCache};
use crate::resolver::{HandleResolver, ResolveOptions};
use locus_api::{Clock, Handle, HandleFactory, SystemClock};
use locus_plugin::{OrderedProviderRegistry, ProviderRegistry};
use std::path::Path;
use std::sync::Arc;

pub struct LocationService {
    ids: Arc<IdentifierTable>,
    listings: ListingCache,
    resolver: HandleResolver,
}

impl Default for LocationService {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LocationService {
    pub fn builder() -> LocationServiceBuilder {
        LocationServiceBuilder::default()
    }

    // -- lifecycle --

    /// Clear the identifier table and the listing cache, restoring the default TTL.
    pub fn reset(&self) {
        self.listings.reset();
        self.ids.clear();
        tracing::debug!("location service reset");
    }

    pub fn apply_config(&self, config: &LocationConfig) {
        self.listings.set_enabled(config.cache_listings);
        self.listings.set_ttl_secs(config.cache_ttl_secs);
    }

    // -- identifier table --

    pub fn ids(&self) -> &IdentifierTable {
        &self.ids
    }

    pub fn set_mapping(&self, id: &str, target: Option<IdTarget>) {
        self.ids.set_mapping(id, target);
    }

    pub fn map_id(&self, id: &str, name: Option<&str>) {
        self.ids.map_id(id, name);
    }

    pub fn map_handle(&self, id: &str, handle: Option<Handle>) {
        self.ids.map_handle(id, handle);
    }

    pub fn mapped_id(&self, id: &str) -> String {
        self.ids.resolve_name(id)
    }

    pub fn mapped_handle(&self, id: &str) -> Option<Handle> {
        self.ids.resolve_handle(id)
    }

    pub fn replace_id_table(&self, table: IdMap) -> IdMap {
        self.ids.replace_table(table)
    }

    // -- resolution --

    pub fn resolve(&self, id: &str) -> Result<Handle> {
        self.resolver.resolve(id)
    }

    pub fn resolve_writable(&self, id: &str, writable: bool) -> Result<Handle> {
        self.resolver.resolve_writable(id, writable)
    }

    pub fn resolve_with(&self, id: &str, options: ResolveOptions) -> Result<Handle> {
        self.resolver.resolve_with(id, options)
    }

    pub fn check_validity(&self, id: &str) -> Result<()> {
        self.resolver.check_validity(id)
    }

    // -- listing cache --

    pub fn listings(&self) -> &ListingCache {
        &self.listings
    }

    pub fn set_cache_listings(&self, enabled: bool) {
        self.listings.set_enabled(enabled);
    }

    pub fn set_cache_ttl_secs(&self, secs: f64) {
        self.listings.set_ttl_secs(secs);
    }

    pub fn clear_listing_cache(&self) {
        self.listings.clear();
    }

    pub fn purge_stale_listings(&self) {
        self.listings.purge_stale();
    }

    pub fn cached_listing(&self, key: &str) -> Option<Listing> {
        self.listings.get(key)
    }

    pub fn put_cached_listing(&self, key: &str, listing: Vec<String>) {
        self.listings.put(key, listing);
    }

    /// Sorted entry names of `dir`, served from the listing cache when possible.
    ///
    /// The cache always holds the full listing; dot-files are filtered afterwards
    /// unless `include_hidden` is set.
    pub fn list_directory(&self, dir: &Path, include_hidden: bool) -> Result<Vec<String>> {
        let key = dir.to_string_lossy();
        let listing = match self.listings.get(&key) {
            Some(listing) => {
                tracing::trace!(dir = %key, "listing cache hit");
                listing
            }
            None => {
                let mut names = Vec::new();
                for entry in std::fs::read_dir(dir)? {
                    names.push(entry?.file_name().to_string_lossy().into_owned());
                }
                names.sort();
                let listing: Listing = names.into();
                self.listings.put(&*key, listing.clone());
                listing
            }
        };

        Ok(listing
            .iter()
            .filter(|name| include_hidden || !name.starts_with('.'))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct LocationServiceBuilder {
    config: LocationConfig,
    registry: Option<Arc<dyn ProviderRegistry>>,
    factory: Option<Arc<dyn HandleFactory>>,
    clock: Option<Arc<dyn Clock>>,
}

impl LocationServiceBuilder {
    pub fn config(mut self, config: LocationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(mut self, registry: Arc<dyn ProviderRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn factory(mut self, factory: Arc<dyn HandleFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> LocationService {
        let ids = Arc::new(IdentifierTable::new());
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(OrderedProviderRegistry::new()));
        let factory = self.factory.unwrap_or_else(|| Arc::new(FsHandleFactory));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let service = LocationService {
            resolver: HandleResolver::new(ids.clone(), registry, factory),
            listings: ListingCache::new(clock),
            ids,
        };
        service.apply_config(&self.config);
        service
    }
}
