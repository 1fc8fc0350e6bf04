use std::io::{BufWriter, Write};

use crate::output::{LineSink, OutputError};

pub struct PlainSink {
    writer: BufWriter<Box<dyn Write + Send>>,
}

impl PlainSink {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }
}

impl LineSink for PlainSink {
    fn write_line(&mut self, line: &str) -> Result<(), OutputError> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}
