//! Random-access handle abstraction.
//!
//! Handles are shared (`Arc`) so that a handle registered under an identifier can be
//! handed out by the resolver while the registration keeps pointing at it. All methods
//! take `&self`; implementations synchronize internally.

use crate::error::ApiError;
use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::Arc;

/// Shared random-access handle.
pub type Handle = Arc<dyn RandomAccess>;

/// Access mode requested when opening a native handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessMode {
    #[default]
    Read,
    ReadWrite,
}

impl AccessMode {
    pub fn from_writable(writable: bool) -> Self {
        if writable {
            AccessMode::ReadWrite
        } else {
            AccessMode::Read
        }
    }

    pub fn is_writable(self) -> bool {
        matches!(self, AccessMode::ReadWrite)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessMode::Read => "r",
            AccessMode::ReadWrite => "rw",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessMode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(AccessMode::Read),
            "rw" => Ok(AccessMode::ReadWrite),
            other => Err(ApiError::InvalidAccessMode(other.to_string())),
        }
    }
}

/// Byte order applied by the typed read methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    #[default]
    BigEndian,
    LittleEndian,
}

impl FromStr for ByteOrder {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "big" | "be" => Ok(ByteOrder::BigEndian),
            "little" | "le" => Ok(ByteOrder::LittleEndian),
            other => Err(ApiError::InvalidByteOrder(other.to_string())),
        }
    }
}

macro_rules! typed_read {
    ($(#[$doc:meta])* $name:ident, $ty:ty) => {
        $(#[$doc])*
        fn $name(&self) -> io::Result<$ty> {
            let mut buf = [0u8; std::mem::size_of::<$ty>()];
            self.read_fully(&mut buf)?;
            Ok(match self.order() {
                ByteOrder::BigEndian => <$ty>::from_be_bytes(buf),
                ByteOrder::LittleEndian => <$ty>::from_le_bytes(buf),
            })
        }
    };
}

/// A seekable, closable byte source (and optionally sink).
pub trait RandomAccess: Send + Sync + fmt::Debug {
    /// Read up to `buf.len()` bytes at the current position. Returns 0 at end of data.
    fn read(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write all of `buf` at the current position.
    fn write(&self, buf: &[u8]) -> io::Result<()>;

    fn seek(&self, pos: u64) -> io::Result<()>;

    fn position(&self) -> io::Result<u64>;

    fn length(&self) -> io::Result<u64>;

    /// Release the underlying resource. Closing twice is not an error.
    fn close(&self) -> io::Result<()>;

    fn is_closed(&self) -> bool;

    fn order(&self) -> ByteOrder;

    fn set_order(&self, order: ByteOrder);

    /// Fill `buf` completely or fail with [`io::ErrorKind::UnexpectedEof`].
    fn read_fully(&self, buf: &mut [u8]) -> io::Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..])? {
                0 => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("needed {} bytes, got {}", buf.len(), filled),
                    ));
                }
                n => filled += n,
            }
        }
        Ok(())
    }

    typed_read!(read_u8, u8);
    typed_read!(read_i8, i8);
    typed_read!(read_u16, u16);
    typed_read!(read_i16, i16);
    typed_read!(read_u32, u32);
    typed_read!(read_i32, i32);
    typed_read!(read_u64, u64);
    typed_read!(read_i64, i64);
    typed_read!(
        /// IEEE 754 single precision in the handle's byte order.
        read_f32,
        f32
    );
    typed_read!(read_f64, f64);
}

/// Opens native handles for physical names.
pub trait HandleFactory: Send + Sync {
    fn open(&self, path: &str, mode: AccessMode) -> io::Result<Handle>;
}
