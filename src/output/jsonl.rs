use std::io::{BufWriter, Write};

use crate::output::{LineSink, OutputError, TailRecord};

pub struct JsonlSink {
    host: String,
    writer: BufWriter<Box<dyn Write + Send>>,
}

impl JsonlSink {
    pub fn new(host: &str, writer: Box<dyn Write + Send>) -> Self {
        Self {
            host: host.to_string(),
            writer: BufWriter::new(writer),
        }
    }
}

impl LineSink for JsonlSink {
    fn write_line(&mut self, line: &str) -> Result<(), OutputError> {
        let record = TailRecord {
            host: &self.host,
            line,
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::SharedBuf;

    #[test]
    fn escapes_json_content() {
        let buf = SharedBuf::default();
        let mut sink = JsonlSink::new("h", Box::new(buf.clone()));
        sink.write_line("say \"hi\"\tnow").expect("write");
        sink.flush().expect("flush");
        let value: serde_json::Value =
            serde_json::from_str(buf.contents().trim_end()).expect("json");
        assert_eq!(value["line"], "say \"hi\"\tnow");
        assert_eq!(value["host"], "h");
    }
}
