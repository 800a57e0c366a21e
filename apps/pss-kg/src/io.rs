//! # Record I/O
//!
//! JSON Lines in, JSON Lines out.
//!
//! Readers are lazy: a line is parsed only when the engine pulls the next
//! record. A line that fails to parse is a malformed record; it surfaces as
//! an `Err` item and the following lines are unaffected. A failing reader is
//! different: its error is yielded once and the stream ends.

use flate2::read::MultiGzDecoder;
use pss_core::{DiagnosticKind, GeneAnnotations, PssError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::Cell;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Lines, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE VALIDATION
// =============================================================================

/// Canonicalize an input path and make sure it names a regular file.
pub fn validate_input_path(path: &Path) -> Result<PathBuf, PssError> {
    let canonical = path.canonicalize().map_err(|e| {
        PssError::Io(format!("Invalid input path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(PssError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

// =============================================================================
// JSON LINES READER
// =============================================================================

/// Lazy iterator of records parsed from JSON Lines.
///
/// Blank lines are ignored. Each item carries either a record or the error
/// for that single line. Invalid UTF-8 counts as a bad line; any other read
/// error ends the stream after it is yielded.
#[derive(Debug)]
pub struct JsonLines<T, R> {
    lines: Lines<R>,
    source: String,
    line_no: usize,
    failed: bool,
    _record: PhantomData<fn() -> T>,
}

impl<T, R: BufRead> JsonLines<T, R> {
    /// Wrap a reader; `source` names it in error messages.
    pub fn new(reader: R, source: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            source: source.into(),
            line_no: 0,
            failed: false,
            _record: PhantomData,
        }
    }
}

impl<T: DeserializeOwned, R: BufRead> Iterator for JsonLines<T, R> {
    type Item = Result<T, PssError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;
            let line = match line {
                Ok(line) => line,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    return Some(Err(PssError::Parse(format!(
                        "{}:{}: {}",
                        self.source, self.line_no, e
                    ))));
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(PssError::Io(format!(
                        "{}:{}: {}",
                        self.source, self.line_no, e
                    ))));
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(serde_json::from_str(&line).map_err(|e| {
                PssError::Parse(format!("{}:{}: {}", self.source, self.line_no, e))
            }));
        }
    }
}

/// Open a JSON Lines file of records.
pub fn read_jsonl<T: DeserializeOwned>(
    path: &Path,
) -> Result<JsonLines<T, BufReader<File>>, PssError> {
    let path = validate_input_path(path)?;
    let file = File::open(&path)
        .map_err(|e| PssError::Io(format!("Cannot open '{}': {}", path.display(), e)))?;
    Ok(JsonLines::new(BufReader::new(file), path.display().to_string()))
}

/// Tracks what was dropped from the input streams of one run.
///
/// Malformed lines are logged and counted. The first read fault is held
/// until `check` hands it back to the caller.
#[derive(Default)]
pub struct InputTally {
    skipped: Cell<usize>,
    fault: Cell<Option<PssError>>,
}

impl InputTally {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass a record through, or take note of why there is none.
    pub fn admit<T>(&self, item: Result<T, PssError>) -> Option<T> {
        match item {
            Ok(record) => Some(record),
            Err(e) if e.kind() == DiagnosticKind::Fatal => {
                tracing::error!("input read failed: {}", e);
                let first = self.fault.take();
                self.fault.set(first.or(Some(e)));
                None
            }
            Err(e) => {
                tracing::warn!(kind = e.kind().as_str(), "skipping input line: {}", e);
                self.skipped.set(self.skipped.get().saturating_add(1));
                None
            }
        }
    }

    /// Number of malformed lines dropped so far.
    pub fn skipped(&self) -> usize {
        self.skipped.get()
    }

    /// Return the first read fault, if any.
    pub fn check(&self) -> Result<(), PssError> {
        match self.fault.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// =============================================================================
// ANNOTATIONS
// =============================================================================

/// Open a text file, transparently decompressing a `.gz` suffix.
///
/// Every member of a multi-member gzip file is read.
fn open_text_reader(path: &Path) -> Result<Box<dyn BufRead>, PssError> {
    let file = File::open(path)
        .map_err(|e| PssError::Io(format!("Cannot open '{}': {}", path.display(), e)))?;
    let gzipped = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if gzipped {
        let decoder = MultiGzDecoder::new(BufReader::new(file));
        Ok(Box::new(BufReader::new(decoder)))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Load the gene annotation table from a TSV or TSV.gz file.
pub fn load_annotations(path: &Path) -> Result<GeneAnnotations, PssError> {
    let path = validate_input_path(path)?;
    GeneAnnotations::from_tsv(open_text_reader(&path)?)
}

// =============================================================================
// JSON LINES WRITER
// =============================================================================

/// Buffered JSON Lines sink.
#[derive(Debug)]
pub struct JsonlWriter<W: Write> {
    out: W,
    written: usize,
}

impl JsonlWriter<BufWriter<File>> {
    /// Create (or truncate) a file for writing.
    pub fn create(path: &Path) -> Result<Self, PssError> {
        let file = File::create(path)
            .map_err(|e| PssError::Io(format!("Cannot create '{}': {}", path.display(), e)))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonlWriter<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    /// Append one record as a single line.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<(), PssError> {
        serde_json::to_writer(&mut self.out, record)
            .map_err(|e| PssError::Parse(format!("Cannot serialize record: {}", e)))?;
        self.out.write_all(b"\n")?;
        self.written = self.written.saturating_add(1);
        Ok(())
    }

    /// Number of records written.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> Result<W, PssError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

// =============================================================================
// TESTS
// =============================================================================
