use locus_api::Handle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error raised by a descriptor or provider. Passed through to callers untouched.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// Metadata describing a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub description: Option<String>,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A single-use provider instance produced by a [`ProviderDescriptor`].
pub trait HandleProvider: Send {
    /// Whether this provider can produce a handle for `id`.
    ///
    /// Probing may touch disk or network (e.g. sniffing an archive header).
    fn can_handle(&self, id: &str) -> Result<bool, ProviderError>;

    /// Bind the provider to `id`, consuming it and yielding the handle.
    fn bind(self: Box<Self>, id: &str) -> Result<Handle, ProviderError>;
}

/// Registered capability that can be instantiated into a [`HandleProvider`].
pub trait ProviderDescriptor: Send + Sync {
    fn info(&self) -> &ProviderInfo;

    fn instantiate(&self) -> Result<Box<dyn HandleProvider>, ProviderError>;
}

/// Descriptor backed by a factory closure.
pub struct FnDescriptor<F> {
    info: ProviderInfo,
    factory: F,
}

impl<F> FnDescriptor<F>
where
    F: Fn() -> Result<Box<dyn HandleProvider>, ProviderError> + Send + Sync,
{
    pub fn new(info: ProviderInfo, factory: F) -> Self {
        Self { info, factory }
    }
}

impl<F> ProviderDescriptor for FnDescriptor<F>
where
    F: Fn() -> Result<Box<dyn HandleProvider>, ProviderError> + Send + Sync,
{
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn instantiate(&self) -> Result<Box<dyn HandleProvider>, ProviderError> {
        (self.factory)()
    }
}

impl<F> fmt::Debug for FnDescriptor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDescriptor")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}
