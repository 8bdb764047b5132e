//! # Response Source Reading
//!
//! File: cli/src/responder/source.rs
//!
//! ## Overview
//!
//! Opens a response source and yields its lines as 7-bit ASCII text. Both
//! loaders sit on top of this module, so the rules for what counts as a line
//! and what counts as a read failure live in one place:
//!
//! - Lines end at `\n`; a trailing `\r` is stripped.
//! - A line containing any byte outside 7-bit ASCII is a read failure.
//! - A missing file is `SourceNotFound`; any other open or read failure is
//!   `SourceRead`.
//!
//! After the first failure the iterator is exhausted. Lines yielded before it
//! stay valid, which is what lets the loaders keep partial results.
//!
use crate::core::error::ResponderError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A reported, non-fatal loader condition and the source it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadIssue {
    /// The source being loaded when the condition was found.
    pub origin: PathBuf,
    /// What went wrong.
    pub error: ResponderError,
}

impl std::fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error {
            // These messages already name the source.
            ResponderError::SourceNotFound { .. } | ResponderError::SourceRead { .. } => {
                write!(f, "{}", self.error)
            }
            _ => write!(f, "{}: {}", self.origin.display(), self.error),
        }
    }
}

/// A loaded structure together with every issue reported while loading it.
#[derive(Debug)]
pub struct Loaded<T> {
    pub value: T,
    pub issues: Vec<LoadIssue>,
}

impl<T> Loaded<T> {
    /// Returns `true` if loading finished without reporting anything.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Iterator over the numbered ASCII lines of a source.
///
/// Yields `(line_number, text)` with 1-based line numbers.
pub struct SourceLines<R> {
    reader: R,
    origin: PathBuf,
    line: usize,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> SourceLines<R> {
    /// Wraps an already-open reader. `origin` is only used in diagnostics.
    pub fn new(reader: R, origin: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            origin: origin.into(),
            line: 0,
            buf: Vec::new(),
            done: false,
        }
    }

    /// The source these lines are read from.
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    fn read_failure(&mut self, reason: String) -> ResponderError {
        self.done = true;
        ResponderError::SourceRead {
            path: self.origin.clone(),
            line: self.line,
            reason,
        }
    }
}

impl<R: BufRead> Iterator for SourceLines<R> {
    type Item = Result<(usize, String), ResponderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line += 1;
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                if !self.buf.is_ascii() {
                    return Some(Err(self.read_failure("line is not 7-bit ASCII".to_string())));
                }
                let text = String::from_utf8_lossy(&self.buf).into_owned();
                trace!("{}:{}: {:?}", self.origin.display(), self.line, text);
                Some(Ok((self.line, text)))
            }
            Err(e) => {
                self.line += 1;
                Some(Err(self.read_failure(e.to_string())))
            }
        }
    }
}

/// Opens the source at `path` for line-by-line reading.
///
/// # Errors
///
/// `SourceNotFound` when the file does not exist, `SourceRead` when it exists
/// but cannot be opened.
pub fn open(path: &Path) -> Result<SourceLines<BufReader<File>>, ResponderError> {
    match File::open(path) {
        Ok(file) => {
            debug!("Opened response source {}", path.display());
            Ok(SourceLines::new(BufReader::new(file), path))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ResponderError::SourceNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(ResponderError::SourceRead {
            path: path.to_path_buf(),
            line: 0,
            reason: format!("could not open: {}", e),
        }),
    }
}

/// Feeds every line of `lines` to `on_line` and returns the read failure that
/// stopped it early, if any.
pub(crate) fn drive<R: BufRead>(
    lines: SourceLines<R>,
    mut on_line: impl FnMut(usize, &str),
) -> Option<ResponderError> {
    for item in lines {
        match item {
            Ok((number, text)) => on_line(number, &text),
            Err(e) => return Some(e),
        }
    }
    None
}
