//! Identifier remapping table.
//!
//! Maps a logical identifier either to another physical name (relocated files) or to
//! an already-open handle (in-memory or externally managed streams). Both variants
//! share one key space: the last write for an id wins, whatever its variant.

use locus_api::Handle;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

/// Value stored under an identifier.
#[derive(Clone)]
pub enum IdTarget {
    /// Redirect to another physical name.
    Name(String),
    /// Serve this handle directly. The table never closes it.
    Handle(Handle),
}

impl fmt::Debug for IdTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdTarget::Name(name) => f.debug_tuple("Name").field(name).finish(),
            IdTarget::Handle(handle) => f
                .debug_tuple("Handle")
                .field(&format_args!("{:p}", Arc::as_ptr(handle)))
                .finish(),
        }
    }
}

impl From<String> for IdTarget {
    fn from(name: String) -> Self {
        IdTarget::Name(name)
    }
}

impl From<&str> for IdTarget {
    fn from(name: &str) -> Self {
        IdTarget::Name(name.to_string())
    }
}

impl From<Handle> for IdTarget {
    fn from(handle: Handle) -> Self {
        IdTarget::Handle(handle)
    }
}

pub type IdMap = HashMap<String, IdTarget>;

/// Thread-safe identifier table.
#[derive(Default)]
pub struct IdentifierTable {
    map: RwLock<IdMap>,
}

impl IdentifierTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `target` under `id`, or remove the entry when `target` is `None`.
    ///
    /// An empty `id` is ignored.
    pub fn set_mapping(&self, id: &str, target: Option<IdTarget>) {
        if id.is_empty() {
            return;
        }
        tracing::debug!(id, target = ?target, "identifier mapping updated");
        let mut map = self.table();
        match target {
            Some(target) => {
                map.insert(id.to_string(), target);
            }
            None => {
                map.remove(id);
            }
        }
    }

    /// Redirect `id` to `name`; `None` removes the mapping.
    pub fn map_id(&self, id: &str, name: Option<&str>) {
        self.set_mapping(id, name.map(IdTarget::from));
    }

    /// Serve `handle` for `id`; `None` removes the mapping.
    pub fn map_handle(&self, id: &str, handle: Option<Handle>) {
        self.set_mapping(id, handle.map(IdTarget::Handle));
    }

    /// The physical name mapped to `id`, or `id` itself.
    pub fn resolve_name(&self, id: &str) -> String {
        match self.read().get(id) {
            Some(IdTarget::Name(name)) => name.clone(),
            _ => id.to_string(),
        }
    }

    /// The handle mapped to `id`, if any.
    pub fn resolve_handle(&self, id: &str) -> Option<Handle> {
        match self.read().get(id) {
            Some(IdTarget::Handle(handle)) => Some(handle.clone()),
            _ => None,
        }
    }

    /// Swap the whole backing map, returning the previous one.
    pub fn replace_table(&self, table: IdMap) -> IdMap {
        std::mem::replace(&mut *self.table(), table)
    }

    /// Live write access to the backing map.
    ///
    /// # Deadlocks
    ///
    /// The guard holds the table lock exclusively. Calling any other method of this
    /// table (`resolve_name`, `len`, `set_mapping`, ...) on the same thread while the
    /// guard is alive deadlocks; drop it first.
    pub fn table(&self) -> RwLockWriteGuard<'_, IdMap> {
        self.map.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn clear(&self) {
        self.table().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, IdMap> {
        self.map.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for IdentifierTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifierTable")
            .field("entries", &self.len())
            .finish()
    }
}
