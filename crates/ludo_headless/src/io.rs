//! Blocking line reader/writer over any buffered input and output.

use std::io::{BufRead, Write};

use crate::protocol::ProtocolError;

/// One protocol line in, one protocol line out.
#[derive(Debug)]
pub struct LineIo<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LineIo<R, W> {
    /// Wrap a reader and a writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Read the next line without its line ending.
    ///
    /// Returns [`ProtocolError::StreamClosed`] at end of input.
    pub fn read_line(&mut self) -> Result<String, ProtocolError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ProtocolError::StreamClosed);
        }
        let line = line.trim_end_matches(['\r', '\n']).to_string();
        tracing::trace!(%line, "Received");
        Ok(line)
    }

    /// Write one line and flush it immediately.
    pub fn write_line(&mut self, line: &str) -> Result<(), ProtocolError> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        tracing::trace!(%line, "Sent");
        Ok(())
    }

    /// Output written so far.
    pub fn writer(&self) -> &W {
        &self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_lines_until_eof() {
        let mut io = LineIo::new("first\r\nsecond\n".as_bytes(), Vec::new());
        assert_eq!(io.read_line().unwrap(), "first");
        assert_eq!(io.read_line().unwrap(), "second");
        assert!(matches!(io.read_line(), Err(ProtocolError::StreamClosed)));
    }

    #[test]
    fn test_blank_line_is_not_eof() {
        let mut io = LineIo::new("\nlast".as_bytes(), Vec::new());
        assert_eq!(io.read_line().unwrap(), "");
        assert_eq!(io.read_line().unwrap(), "last");
    }

    #[test]
    fn test_write_line_appends_newline() {
        let mut io = LineIo::new("".as_bytes(), Vec::new());
        io.write_line("<THROW>").unwrap();
        io.write_line("NA").unwrap();
        assert_eq!(io.writer().as_slice(), b"<THROW>\nNA\n");
    }
}
