use crate::error::{AnalysisError, Result};
use crate::util::open_with_backoff;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

/// Buffered line reader over a JSONL file. Tracks the 1-based number of the
/// last line returned so parse errors can point at it.
pub struct NdjsonReader {
    path: PathBuf,
    rdr: BufReader<File>,
    line_no: u64,
}

impl NdjsonReader {
    pub fn open(path: &Path, buf_bytes: usize) -> Result<Self> {
        let f = open_with_backoff(path, 16, 50).map_err(|e| AnalysisError::file_access(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            rdr: BufReader::with_capacity(buf_bytes.max(8 * 1024), f),
            line_no: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn line_no(&self) -> u64 {
        self.line_no
    }

    /// Read the next line into `buf`, stripping `\r?\n`. Returns the raw byte
    /// count consumed (0 on EOF).
    pub fn read_line(&mut self, buf: &mut String) -> Result<usize> {
        buf.clear();
        let n = self.rdr.read_line(buf).map_err(|e| match e.kind() {
            // Non UTF-8 bytes are a broken record, not a broken file.
            ErrorKind::InvalidData => AnalysisError::record_parse(&self.path, self.line_no + 1, e),
            _ => AnalysisError::file_access(&self.path, e),
        })?;
        if n == 0 {
            return Ok(0);
        }
        self.line_no += 1;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(n)
    }
}
