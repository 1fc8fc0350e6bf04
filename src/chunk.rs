use crate::error::TailError;
use crate::source::LogSource;

/// One read from the source, in forward byte order.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    pub offset: u64,
    pub bytes: &'a [u8],
    pub is_final: bool,
}

/// Reads fixed-size chunks from the end of a source toward its start.
pub struct ReverseChunkReader<'a> {
    source: &'a dyn LogSource,
    chunk_size: usize,
    /// Length of the prefix not yet read; the next read ends here.
    remaining: u64,
    /// Grown on demand to `min(chunk_size, remaining)`.
    buf: Vec<u8>,
}

impl<'a> ReverseChunkReader<'a> {
    pub fn new(source: &'a dyn LogSource, chunk_size: usize) -> Result<Self, TailError> {
        if chunk_size == 0 {
            return Err(TailError::MalformedState(
                "chunk size must be positive".to_string(),
            ));
        }
        Ok(Self {
            source,
            chunk_size,
            remaining: source.len(),
            buf: Vec::new(),
        })
    }

    /// Offset at which the next read will start.
    pub fn offset(&self) -> u64 {
        self.remaining.saturating_sub(self.chunk_size as u64)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Read the next chunk, or `None` once the start of the source is passed.
    pub fn next(&mut self) -> Result<Option<Chunk<'_>>, TailError> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let len = self.remaining.min(self.chunk_size as u64) as usize;
        let offset = self.remaining - len as u64;
        if self.buf.len() < len {
            self.buf.resize(len, 0);
        }

        let mut read = 0usize;
        while read < len {
            let n = self
                .source
                .read_at(offset + read as u64, &mut self.buf[read..len])?;
            if n == 0 {
                break;
            }
            read += n;
        }

        if read == 0 {
            self.remaining = 0;
            return Ok(None);
        }
        if read < len {
            return Err(TailError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("short read at offset {offset}: wanted {len} bytes, got {read}"),
            )));
        }

        self.remaining = offset;
        Ok(Some(Chunk {
            offset,
            bytes: &self.buf[..len],
            is_final: offset == 0,
        }))
    }
}

/// Number of reads needed to cover `total_len` bytes.
pub fn chunk_count(total_len: u64, chunk_size: u64) -> u64 {
    if chunk_size == 0 {
        return 0;
    }
    total_len.div_ceil(chunk_size)
}
