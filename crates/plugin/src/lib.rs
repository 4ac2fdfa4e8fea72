//! Handle-provider plugin contracts.
//!
//! A provider turns identifiers matching a backend-specific scheme (archives,
//! containers, remote stores) into random-access handles. Providers are reached
//! through descriptors held by a [`ProviderRegistry`]; the resolver probes them in
//! registration order and the first one that accepts an identifier wins.

pub mod provider;
pub mod registry;

pub use provider::{FnDescriptor, HandleProvider, ProviderDescriptor, ProviderError, ProviderInfo};
pub use registry::{OrderedProviderRegistry, ProviderRegistry};
