pub mod config;
pub mod error;
pub mod handle;
pub mod ids;
pub mod listing;
pub mod logging;
pub mod resolver;
pub mod service;

pub use config::LocationConfig;
pub use error::{LocusError, Result};
pub use ids::{IdMap, IdTarget, IdentifierTable};
pub use listing::ListingCache;
pub use resolver::{HandleResolver, ResolveOptions};
pub use service::{LocationService, LocationServiceBuilder};
