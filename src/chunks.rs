//! Chunk source: stream a JSONL file as fixed-size batches of typed records.

use crate::config::DEFAULT_READ_BUFFER;
use crate::error::{AnalysisError, Result};
use crate::ndjson::NdjsonReader;
use crate::record::{parse_record, Record};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A batch of consecutive records, in file order.
#[derive(Debug)]
pub struct Chunk {
    /// Zero-based position of this chunk in the file.
    pub index: usize,
    pub records: Vec<Record>,
    /// Raw input bytes this chunk covered (blank lines included).
    pub bytes: u64,
    pub source: Arc<Path>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Describes where and how to chunk; each `chunks()` call re-reads the file
/// from the start.
#[derive(Clone, Debug)]
pub struct ChunkSource {
    path: PathBuf,
    chunk_size: usize,
    read_buffer_bytes: usize,
}

impl ChunkSource {
    pub fn new(path: impl AsRef<Path>, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(AnalysisError::InvalidConfig("chunk size must be positive".into()));
        }
        Ok(Self { path: path.as_ref().to_path_buf(), chunk_size, read_buffer_bytes: DEFAULT_READ_BUFFER })
    }

    pub fn with_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn read_buffer_bytes(&self) -> usize {
        self.read_buffer_bytes
    }

    /// Open the file and start a fresh pass over it.
    pub fn chunks(&self) -> Result<Chunks> {
        let reader = NdjsonReader::open(&self.path, self.read_buffer_bytes)?;
        Ok(Chunks {
            source: Arc::from(self.path.as_path()),
            reader: Some(reader),
            chunk_size: self.chunk_size,
            next_index: 0,
            buf: String::with_capacity(16 * 1024),
        })
    }
}

/// Convenience: `ChunkSource::new(path, chunk_size)?.chunks()`.
pub fn read_chunks(path: impl AsRef<Path>, chunk_size: usize) -> Result<Chunks> {
    ChunkSource::new(path, chunk_size)?.chunks()
}

/// Lazy chunk iterator. Ends after the last chunk or after the first error.
pub struct Chunks {
    source: Arc<Path>,
    reader: Option<NdjsonReader>,
    chunk_size: usize,
    next_index: usize,
    buf: String,
}

impl Chunks {
    fn fill(&mut self) -> Result<Option<Chunk>> {
        let Some(reader) = self.reader.as_mut() else { return Ok(None) };
        let mut records = Vec::with_capacity(self.chunk_size);
        let mut bytes = 0u64;

        while records.len() < self.chunk_size {
            let n = reader.read_line(&mut self.buf)?;
            if n == 0 {
                self.reader = None;
                break;
            }
            bytes += n as u64;
            if self.buf.trim().is_empty() {
                continue;
            }
            let mut rec = parse_record(&self.buf)
                .map_err(|e| AnalysisError::record_parse(reader.path(), reader.line_no(), e))?;
            rec.line = reader.line_no();
            records.push(rec);
        }

        if records.is_empty() {
            return Ok(None);
        }
        let chunk = Chunk { index: self.next_index, records, bytes, source: Arc::clone(&self.source) };
        self.next_index += 1;
        Ok(Some(chunk))
    }
}

impl Iterator for Chunks {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.fill() {
            Ok(chunk) => chunk.map(Ok),
            Err(e) => {
                self.reader = None;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Chunks {}
