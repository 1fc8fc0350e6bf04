pub mod csv;
pub mod jsonl;
pub mod plain;

use std::io::Write;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Plain,
    Jsonl,
    Csv,
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// One emitted line, tagged with the host that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct TailRecord<'a> {
    pub host: &'a str,
    pub line: &'a str,
}

/// Destination for tailed lines.
pub trait LineSink {
    fn write_line(&mut self, line: &str) -> Result<(), OutputError>;
    fn flush(&mut self) -> Result<(), OutputError>;
}

pub fn build_sink(
    kind: OutputKind,
    host: &str,
    writer: Box<dyn Write + Send>,
) -> Box<dyn LineSink + Send> {
    match kind {
        OutputKind::Plain => Box::new(plain::PlainSink::new(writer)),
        OutputKind::Jsonl => Box::new(jsonl::JsonlSink::new(host, writer)),
        OutputKind::Csv => Box::new(csv::CsvSink::new(host, writer)),
    }
}

/// Best-effort hostname of this machine.
pub fn hostname() -> String {
    #[cfg(unix)]
    {
        let mut buf = [0u8; 256];
        let rc = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) };
        if rc == 0 {
            let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
            if end > 0 {
                return String::from_utf8_lossy(&buf[..end]).into_owned();
            }
        }
    }
    std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string())
}
