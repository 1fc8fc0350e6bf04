//! Reverse chunked line scanning: read the tail of a text file newest line
//! first, with optional substring filtering and bounded memory.

pub mod chunk;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod forward;
pub mod line;
pub mod listing;
pub mod logging;
pub mod output;
pub mod source;
pub mod tail;

pub use error::TailError;
pub use filter::{FilterSet, LineFilter, MatchAnySubstring, MatchRegex};
pub use source::{LogSource, MemorySource, RawFileSource};
pub use tail::{ScanOutcome, ScanStats, TailOptions, TailStream, scan, tail_file};
