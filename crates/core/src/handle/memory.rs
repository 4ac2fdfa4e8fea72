use super::{OrderCell, closed_error, lock};
use locus_api::{ByteOrder, Handle, RandomAccess};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Upper bound on the buffer size a write may grow to.
pub const MAX_MEMORY_LEN: u64 = 1 << 32;

#[derive(Debug, Default)]
struct Buffer {
    data: Vec<u8>,
    pos: u64,
}

/// Handle over an in-memory byte buffer. Writes past the end grow the buffer.
#[derive(Debug, Default)]
pub struct MemoryHandle {
    buffer: Mutex<Buffer>,
    closed: AtomicBool,
    order: OrderCell,
}

impl MemoryHandle {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            buffer: Mutex::new(Buffer {
                data: data.into(),
                pos: 0,
            }),
            closed: AtomicBool::new(false),
            order: OrderCell::default(),
        }
    }

    /// Wrap `data` directly as a shared [`Handle`].
    pub fn shared(data: impl Into<Vec<u8>>) -> Handle {
        Arc::new(Self::new(data))
    }

    /// Copy of the current contents.
    pub fn contents(&self) -> Vec<u8> {
        lock(&self.buffer).data.clone()
    }

    fn ensure_open(&self) -> io::Result<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(closed_error("memory buffer"))
        } else {
            Ok(())
        }
    }
}

impl RandomAccess for MemoryHandle {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_open()?;
        let mut buffer = lock(&self.buffer);
        let len = buffer.data.len() as u64;
        if buffer.pos >= len {
            return Ok(0);
        }
        let start = buffer.pos as usize;
        let n = buf.len().min(buffer.data.len() - start);
        buf[..n].copy_from_slice(&buffer.data[start..start + n]);
        buffer.pos += n as u64;
        Ok(n)
    }

    fn write(&self, buf: &[u8]) -> io::Result<()> {
        self.ensure_open()?;
        let mut buffer = lock(&self.buffer);
        let end = buffer
            .pos
            .checked_add(buf.len() as u64)
            .filter(|end| *end <= MAX_MEMORY_LEN)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("write at {} exceeds the {MAX_MEMORY_LEN} byte limit", buffer.pos),
                )
            })?;
        // usize can be narrower than MAX_MEMORY_LEN on 32-bit targets
        let (start, end) = match (usize::try_from(buffer.pos), usize::try_from(end)) {
            (Ok(start), Ok(end)) => (start, end),
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "position out of range",
                ));
            }
        };
        if end > buffer.data.len() {
            let additional = end - buffer.data.len();
            buffer
                .data
                .try_reserve(additional)
                .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
            buffer.data.resize(end, 0);
        }
        buffer.data[start..end].copy_from_slice(buf);
        buffer.pos = end as u64;
        Ok(())
    }

    fn seek(&self, pos: u64) -> io::Result<()> {
        self.ensure_open()?;
        lock(&self.buffer).pos = pos;
        Ok(())
    }

    fn position(&self) -> io::Result<u64> {
        self.ensure_open()?;
        Ok(lock(&self.buffer).pos)
    }

    fn length(&self) -> io::Result<u64> {
        self.ensure_open()?;
        Ok(lock(&self.buffer).data.len() as u64)
    }

    fn close(&self) -> io::Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn order(&self) -> ByteOrder {
        self.order.get()
    }

    fn set_order(&self, order: ByteOrder) {
        self.order.set(order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_stops_at_end() {
        let handle = MemoryHandle::new(vec![1, 2, 3]);
        let mut buf = [0u8; 8];
        assert_eq!(handle.read(&mut buf).unwrap(), 3);
        assert_eq!(handle.read(&mut buf).unwrap(), 0);
        assert_eq!(&buf[..3], &[1, 2, 3]);
    }

    #[test]
    fn test_write_past_end_zero_fills() {
        let handle = MemoryHandle::new(vec![9]);
        handle.seek(3).unwrap();
        handle.write(&[7, 7]).unwrap();
        assert_eq!(handle.contents(), vec![9, 0, 0, 7, 7]);
        assert_eq!(handle.position().unwrap(), 5);
    }

    #[test]
    fn test_write_beyond_limit_is_rejected() {
        let handle = MemoryHandle::new(vec![0]);

        handle.seek(u64::MAX - 1).unwrap();
        let err = handle.write(&[1, 2, 3]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        handle.seek(1 << 40).unwrap();
        let err = handle.write(&[1]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        // failed writes leave buffer and position untouched
        assert_eq!(handle.contents(), vec![0]);
        assert_eq!(handle.position().unwrap(), 1 << 40);
    }

    #[test]
    fn test_short_typed_read_is_eof() {
        let handle = MemoryHandle::new(vec![0, 1]);
        let err = handle.read_u32().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_byte_order_switch() {
        let handle = MemoryHandle::new(vec![0x01, 0x02, 0x01, 0x02]);
        assert_eq!(handle.read_u16().unwrap(), 0x0102);
        handle.set_order(ByteOrder::LittleEndian);
        assert_eq!(handle.read_u16().unwrap(), 0x0201);
    }
}
