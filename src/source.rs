use std::fs::File;
use std::path::Path;

use crate::error::TailError;

/// Fallback chunk size when the OS page size cannot be queried.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// A seekable, readable byte source of known length.
///
/// Reads are positional: `read_at` never depends on a shared cursor, so a
/// scan only needs `rewind` to hand the source back in its initial state.
pub trait LogSource: Send + Sync {
    fn len(&self) -> u64;
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize, TailError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Restore the read cursor to the start of the source.
    fn rewind(&self) -> Result<(), TailError> {
        Ok(())
    }
}

pub struct RawFileSource {
    file: File,
    len: u64,
    #[cfg(not(unix))]
    lock: std::sync::Mutex<()>,
}

impl RawFileSource {
    pub fn open(path: &Path) -> Result<Self, TailError> {
        let file = File::open(path).map_err(|err| TailError::from_open(path, err))?;
        Self::from_file(file)
    }

    pub fn from_file(file: File) -> Result<Self, TailError> {
        let len = file.metadata()?.len();
        Ok(Self {
            file,
            len,
            #[cfg(not(unix))]
            lock: std::sync::Mutex::new(()),
        })
    }
}

impl LogSource for RawFileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize, TailError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            Ok(self.file.read_at(buf, offset)?)
        }
        #[cfg(not(unix))]
        {
            use std::io::{Read, Seek, SeekFrom};
            let _guard = self
                .lock
                .lock()
                .map_err(|_| TailError::MalformedState("source lock poisoned".to_string()))?;
            let mut f = &self.file;
            f.seek(SeekFrom::Start(offset))?;
            Ok(f.read(buf)?)
        }
    }

    fn rewind(&self) -> Result<(), TailError> {
        use std::io::{Seek, SeekFrom};
        let mut f = &self.file;
        f.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

/// In-memory source, mostly useful for tests and piped input.
pub struct MemorySource {
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl LogSource for MemorySource {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize, TailError> {
        let start = usize::try_from(offset)
            .map_err(|_| TailError::MalformedState(format!("offset {offset} out of range")))?;
        if start >= self.data.len() {
            return Ok(0);
        }
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }
}

/// Rewinds the wrapped source when dropped, whatever the scan outcome.
pub struct RewindGuard<'a> {
    source: &'a dyn LogSource,
}

impl<'a> RewindGuard<'a> {
    pub fn new(source: &'a dyn LogSource) -> Self {
        Self { source }
    }
}

impl Drop for RewindGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.source.rewind() {
            tracing::warn!("failed to rewind source: {err}");
        }
    }
}

/// The OS page size, used as the default chunk size.
pub fn page_size() -> usize {
    #[cfg(unix)]
    {
        let sz = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if sz > 0 {
            return sz as usize;
        }
    }
    DEFAULT_CHUNK_SIZE
}
