//! # Tail Module
//!
//! Reverse chunked line scanning. [`TailScanner`] walks a source from its
//! last byte to its first, rebuilds lines from reversed bytes and hands the
//! ones that pass the filter set to a callback, newest first. [`scan`] runs a
//! scanner on a producer thread behind bounded channels.

pub mod stream;

use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use memchr::memrchr;
use tracing::debug;

use crate::chunk::{ReverseChunkReader, chunk_count};
use crate::error::TailError;
use crate::filter::FilterSet;
use crate::line::LineBuffer;
use crate::source::{LogSource, RawFileSource, page_size};

pub use stream::{Canceller, TailStream, scan};

const NEWLINE: u8 = b'\n';

/// Tunables for one scan.
#[derive(Debug, Clone)]
pub struct TailOptions {
    /// Maximum lines to emit; zero or negative means unbounded.
    pub max_lines: i64,
    /// Bytes per read.
    pub chunk_size: usize,
    /// Capacity of the line channel; zero is a rendezvous handoff.
    pub channel_capacity: usize,
}

impl Default for TailOptions {
    fn default() -> Self {
        Self {
            max_lines: 0,
            chunk_size: page_size(),
            channel_capacity: 0,
        }
    }
}

impl TailOptions {
    pub fn with_max_lines(mut self, max_lines: i64) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

/// Convert a requested line count into a limit; `<= 0` is unbounded.
pub fn line_limit(max_lines: i64) -> Option<usize> {
    if max_lines <= 0 {
        None
    } else {
        Some(usize::try_from(max_lines).unwrap_or(usize::MAX))
    }
}

/// A line delivered by the scanner, with the offset of its first byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailLine {
    pub offset: u64,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The start of the source was reached.
    Exhausted,
    /// The requested number of lines was emitted.
    LimitReached,
    /// The consumer asked to stop.
    Stopped,
    /// The cancel flag was raised.
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct ScanStats {
    pub chunks_read: u64,
    pub bytes_read: u64,
    pub lines_emitted: u64,
    pub lines_filtered: u64,
    pub outcome: ScanOutcome,
}

pub struct TailScanner<'a> {
    reader: ReverseChunkReader<'a>,
    filters: &'a FilterSet,
    limit: Option<usize>,
    buffer: LineBuffer,
    cancel_flag: Option<Arc<AtomicBool>>,
    total_bytes: u64,
    /// Set until the first non-newline byte at the end of the file is seen.
    skipping_trailing: bool,
    chunks_read: u64,
    bytes_read: u64,
    lines_emitted: u64,
    lines_filtered: u64,
}

impl<'a> TailScanner<'a> {
    pub fn new(
        source: &'a dyn LogSource,
        filters: &'a FilterSet,
        options: &TailOptions,
    ) -> Result<Self, TailError> {
        Ok(Self {
            reader: ReverseChunkReader::new(source, options.chunk_size)?,
            filters,
            limit: line_limit(options.max_lines),
            buffer: LineBuffer::new(),
            cancel_flag: None,
            total_bytes: source.len(),
            skipping_trailing: true,
            chunks_read: 0,
            bytes_read: 0,
            lines_emitted: 0,
            lines_filtered: 0,
        })
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    /// Scan the source, calling `emit` for every included line, newest first.
    pub fn run<F>(mut self, mut emit: F) -> Result<ScanStats, TailError>
    where
        F: FnMut(TailLine) -> ControlFlow<()>,
    {
        debug!(
            "tail scan start total_bytes={} chunk_size={} chunk_count={} limit={:?} filters={}",
            self.total_bytes,
            self.reader.chunk_size(),
            chunk_count(self.total_bytes, self.reader.chunk_size() as u64),
            self.limit,
            self.filters.len()
        );

        loop {
            if self.cancelled() {
                return Ok(self.finish(ScanOutcome::Cancelled));
            }

            let expected = self.reader.offset();
            let Some(chunk) = self.reader.next()? else {
                break;
            };
            if chunk.offset != expected {
                return Err(TailError::MalformedState(format!(
                    "chunk at offset {} but expected {expected}",
                    chunk.offset
                )));
            }
            self.chunks_read += 1;
            self.bytes_read += chunk.bytes.len() as u64;

            let base = chunk.offset;
            let is_final = chunk.is_final;
            let mut data = chunk.bytes;

            if self.skipping_trailing {
                let keep = data.iter().rposition(|&b| b != NEWLINE).map_or(0, |i| i + 1);
                data = &data[..keep];
                if !data.is_empty() {
                    self.skipping_trailing = false;
                }
            }

            while let Some(nl) = memrchr(NEWLINE, data) {
                self.buffer.push_reversed(base + nl as u64 + 1, &data[nl + 1..]);
                data = &data[..nl];
                if let Some(outcome) = Self::flush_line(
                    &mut self.buffer,
                    self.filters,
                    self.limit,
                    &mut self.lines_emitted,
                    &mut self.lines_filtered,
                    &mut emit,
                ) {
                    return Ok(self.finish(outcome));
                }
            }
            self.buffer.push_reversed(base, data);

            if is_final {
                break;
            }
        }

        if let Some(outcome) = Self::flush_line(
            &mut self.buffer,
            self.filters,
            self.limit,
            &mut self.lines_emitted,
            &mut self.lines_filtered,
            &mut emit,
        ) {
            return Ok(self.finish(outcome));
        }
        Ok(self.finish(ScanOutcome::Exhausted))
    }

    /// Emit the buffered line if it passes the filters, then reset the buffer.
    /// Returns the outcome when the scan has to stop.
    fn flush_line<F>(
        buffer: &mut LineBuffer,
        filters: &FilterSet,
        limit: Option<usize>,
        lines_emitted: &mut u64,
        lines_filtered: &mut u64,
        emit: &mut F,
    ) -> Option<ScanOutcome>
    where
        F: FnMut(TailLine) -> ControlFlow<()>,
    {
        let line = buffer.emit();
        buffer.reset();
        let line = line?;
        if !filters.include(&line.text) {
            *lines_filtered += 1;
            return None;
        }
        *lines_emitted += 1;
        if emit(TailLine {
            offset: line.offset,
            text: line.text,
        })
        .is_break()
        {
            return Some(ScanOutcome::Stopped);
        }
        match limit {
            Some(n) if *lines_emitted >= n as u64 => Some(ScanOutcome::LimitReached),
            _ => None,
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn finish(self, outcome: ScanOutcome) -> ScanStats {
        let stats = ScanStats {
            chunks_read: self.chunks_read,
            bytes_read: self.bytes_read,
            lines_emitted: self.lines_emitted,
            lines_filtered: self.lines_filtered,
            outcome,
        };
        debug!(
            "tail scan done outcome={:?} chunks_read={} bytes_read={} lines_emitted={} lines_filtered={}",
            stats.outcome,
            stats.chunks_read,
            stats.bytes_read,
            stats.lines_emitted,
            stats.lines_filtered
        );
        stats
    }
}

/// Tail `path` and collect the lines, newest first.
pub fn tail_file(
    path: &Path,
    options: &TailOptions,
    filters: Arc<FilterSet>,
) -> Result<Vec<String>, TailError> {
    let source = RawFileSource::open(path)?;
    let stream = scan(source, options, filters);
    let lines: Vec<String> = stream.lines().iter().collect();
    stream.finish()?;
    Ok(lines)
}
