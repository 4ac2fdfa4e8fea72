//! Identifier to handle resolution.
//!
//! Lookup order: a handle mapped in the identifier table, then the provider chain
//! (first provider accepting the original identifier wins), then a native handle on
//! the remapped physical name.

use crate::error::{LocusError, Result};
use crate::ids::IdentifierTable;
use locus_api::{AccessMode, Handle, HandleFactory};
use locus_plugin::ProviderRegistry;
use std::sync::Arc;

/// Options for [`HandleResolver::resolve_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub writable: bool,
    pub allow_providers: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            writable: false,
            allow_providers: true,
        }
    }
}

impl ResolveOptions {
    pub fn writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }

    pub fn allow_providers(mut self, allow: bool) -> Self {
        self.allow_providers = allow;
        self
    }
}

pub struct HandleResolver {
    ids: Arc<IdentifierTable>,
    registry: Arc<dyn ProviderRegistry>,
    factory: Arc<dyn HandleFactory>,
}

impl HandleResolver {
    pub fn new(
        ids: Arc<IdentifierTable>,
        registry: Arc<dyn ProviderRegistry>,
        factory: Arc<dyn HandleFactory>,
    ) -> Self {
        Self {
            ids,
            registry,
            factory,
        }
    }

    /// Read-only resolution with the provider chain enabled.
    pub fn resolve(&self, id: &str) -> Result<Handle> {
        self.resolve_with(id, ResolveOptions::default())
    }

    pub fn resolve_writable(&self, id: &str, writable: bool) -> Result<Handle> {
        self.resolve_with(id, ResolveOptions::default().writable(writable))
    }

    pub fn resolve_with(&self, id: &str, options: ResolveOptions) -> Result<Handle> {
        tracing::trace!(id, writable = options.writable, "resolving handle");

        if let Some(handle) = self.ids.resolve_handle(id) {
            tracing::trace!(id, "using mapped handle");
            return Ok(handle);
        }
        tracing::trace!(id, "no handle mapped for this id");
        self.resolve_unmapped(id, options)
    }

    /// Whether `id` can be opened. A mapped handle is valid as is and is left open;
    /// otherwise a handle is resolved and immediately closed.
    pub fn check_validity(&self, id: &str) -> Result<()> {
        if self.ids.resolve_handle(id).is_some() {
            return Ok(());
        }
        // the table is read once: a handle mapped from here on is never the one closed
        let handle = self.resolve_unmapped(id, ResolveOptions::default())?;
        handle.close()?;
        Ok(())
    }

    /// Provider chain, then native open. Never consults the mapped handles.
    fn resolve_unmapped(&self, id: &str, options: ResolveOptions) -> Result<Handle> {
        let physical = self.ids.resolve_name(id);

        if options.allow_providers {
            if let Some(handle) = self.probe_providers(id)? {
                return Ok(handle);
            }
        }

        let mode = AccessMode::from_writable(options.writable);
        tracing::trace!(id, physical = %physical, %mode, "opening native handle");
        let handle = self.factory.open(&physical, mode)?;
        Ok(handle)
    }

    fn probe_providers(&self, id: &str) -> Result<Option<Handle>> {
        for descriptor in self.registry.providers() {
            let name = &descriptor.info().name;
            let provider = descriptor
                .instantiate()
                .map_err(|e| LocusError::provider(name, e))?;
            let accepted = provider
                .can_handle(id)
                .map_err(|e| LocusError::provider(name, e))?;
            if accepted {
                tracing::trace!(id, provider = %name, "provider accepted id");
                let handle = provider
                    .bind(id)
                    .map_err(|e| LocusError::provider(name, e))?;
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }
}
