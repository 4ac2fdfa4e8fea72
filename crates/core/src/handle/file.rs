use super::{OrderCell, closed_error, lock};
use locus_api::{AccessMode, ByteOrder, Handle, HandleFactory, RandomAccess};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Handle over a file on the local filesystem.
#[derive(Debug)]
pub struct FileHandle {
    path: PathBuf,
    mode: AccessMode,
    file: Mutex<Option<File>>,
    order: OrderCell,
}

impl FileHandle {
    /// Open `path`. `Read` requires an existing file; `ReadWrite` creates it if needed.
    pub fn open(path: impl AsRef<Path>, mode: AccessMode) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = match mode {
            AccessMode::Read => File::open(&path)?,
            AccessMode::ReadWrite => OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(&path)?,
        };
        if file.metadata()?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is a directory", path.display()),
            ));
        }

        Ok(Self {
            path,
            mode,
            file: Mutex::new(Some(file)),
            order: OrderCell::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    fn with_file<T>(&self, op: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut guard = lock(&self.file);
        match guard.as_mut() {
            Some(file) => op(file),
            None => Err(closed_error(&self.path.display().to_string())),
        }
    }
}

impl RandomAccess for FileHandle {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.with_file(|file| file.read(buf))
    }

    fn write(&self, buf: &[u8]) -> io::Result<()> {
        if !self.mode.is_writable() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} was opened read-only", self.path.display()),
            ));
        }
        self.with_file(|file| file.write_all(buf))
    }

    fn seek(&self, pos: u64) -> io::Result<()> {
        self.with_file(|file| file.seek(SeekFrom::Start(pos)).map(|_| ()))
    }

    fn position(&self) -> io::Result<u64> {
        self.with_file(|file| file.stream_position())
    }

    fn length(&self) -> io::Result<u64> {
        self.with_file(|file| Ok(file.metadata()?.len()))
    }

    fn close(&self) -> io::Result<()> {
        if let Some(file) = lock(&self.file).take()
            && self.mode.is_writable()
        {
            file.sync_all()?;
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        lock(&self.file).is_none()
    }

    fn order(&self) -> ByteOrder {
        self.order.get()
    }

    fn set_order(&self, order: ByteOrder) {
        self.order.set(order);
    }
}

/// [`HandleFactory`] that opens [`FileHandle`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsHandleFactory;

impl HandleFactory for FsHandleFactory {
    fn open(&self, path: &str, mode: AccessMode) -> io::Result<Handle> {
        Ok(Arc::new(FileHandle::open(path, mode)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_only_requires_existing_file() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.bin");

        let err = FileHandle::open(&missing, AccessMode::Read).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!missing.exists());
    }

    #[test]
    fn test_read_write_creates_and_writes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("new.bin");

        let handle = FileHandle::open(&path, AccessMode::ReadWrite).unwrap();
        handle.write(&[1, 2, 3, 4]).unwrap();
        assert_eq!(handle.length().unwrap(), 4);
        handle.seek(2).unwrap();
        assert_eq!(handle.read_u8().unwrap(), 3);
        handle.close().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ro.bin");
        std::fs::write(&path, b"abc").unwrap();

        let handle = FileHandle::open(&path, AccessMode::Read).unwrap();
        let err = handle.write(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_closed_handle_fails_operations() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("closed.bin");
        std::fs::write(&path, b"abc").unwrap();

        let handle = FileHandle::open(&path, AccessMode::Read).unwrap();
        handle.close().unwrap();
        assert!(handle.is_closed());
        assert!(handle.read_u8().is_err());
        // closing again is fine
        handle.close().unwrap();
    }

    #[test]
    fn test_directory_is_rejected() {
        let temp = TempDir::new().unwrap();
        let err = FileHandle::open(temp.path(), AccessMode::Read).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
