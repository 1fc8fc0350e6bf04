use std::io::Write;

use crate::output::{LineSink, OutputError, TailRecord};

pub struct CsvSink {
    host: String,
    writer: csv::Writer<Box<dyn Write + Send>>,
}

impl CsvSink {
    pub fn new(host: &str, writer: Box<dyn Write + Send>) -> Self {
        Self {
            host: host.to_string(),
            writer: csv::Writer::from_writer(writer),
        }
    }
}

impl LineSink for CsvSink {
    fn write_line(&mut self, line: &str) -> Result<(), OutputError> {
        self.writer.serialize(TailRecord {
            host: &self.host,
            line,
        })?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}
