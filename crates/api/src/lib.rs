pub mod clock;
pub mod error;
pub mod handle;

pub use clock::{Clock, SystemClock};
pub use error::ApiError;
pub use handle::{AccessMode, ByteOrder, Handle, HandleFactory, RandomAccess};
