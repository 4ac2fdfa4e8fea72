//! Native handle implementations.

pub mod file;
pub mod memory;

pub use file::{FileHandle, FsHandleFactory};
pub use memory::MemoryHandle;

use locus_api::ByteOrder;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Byte order shared between threads holding the same handle.
#[derive(Debug, Default)]
pub(crate) struct OrderCell(AtomicBool);

impl OrderCell {
    pub(crate) fn get(&self) -> ByteOrder {
        if self.0.load(Ordering::Acquire) {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        }
    }

    pub(crate) fn set(&self, order: ByteOrder) {
        self.0.store(order == ByteOrder::LittleEndian, Ordering::Release);
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn closed_error(what: &str) -> io::Error {
    io::Error::other(format!("handle is closed: {what}"))
}
