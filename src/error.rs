//! Error types shared by the sampling and duration passes.

use std::path::{Path, PathBuf};

/// Errors raised while windowing tables or building the duration profile.
#[derive(Debug)]
pub enum Error {
    /// A required column is absent from the table schema.
    MissingColumn { column: String },
    /// A cell that must be numeric is empty or holds text.
    NonNumericValue {
        column: String,
        row: usize,
        value: String,
    },
    /// The half window size must be positive.
    InvalidWindowSize(usize),
    /// Padding was requested from zero source rows.
    EmptySequence,
    /// Unpadded windows in one batch have different lengths.
    InconsistentWindowLength {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
    /// A column does not match the table's row count.
    LengthMismatch { expected: usize, actual: usize },
    /// The batch had no unpadded window to average.
    NoUnpaddedWindows,
    FileNotFound(PathBuf),
    FileExists(PathBuf),
    NotADirectory(PathBuf),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Csv { path: PathBuf, message: String },
    /// Any of the above, tagged with the file being processed.
    InFile { path: PathBuf, source: Box<Error> },
}

impl Error {
    /// Attach the offending file to an error. Already-tagged errors are kept as is.
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            Error::InFile { .. } => self,
            other => Error::InFile {
                path: path.to_path_buf(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, with any file tags removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::InFile { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingColumn { column } => write!(f, "missing column `{column}`"),
            Error::NonNumericValue { column, row, value } => {
                write!(f, "column `{column}` row {row}: `{value}` is not numeric")
            }
            Error::InvalidWindowSize(size) => {
                write!(f, "invalid window size {size}: must be positive")
            }
            Error::EmptySequence => write!(f, "cannot pad an empty sequence"),
            Error::InconsistentWindowLength {
                path,
                expected,
                actual,
            } => write!(
                f,
                "unpadded window {} has {actual} rows, expected {expected}",
                path.display()
            ),
            Error::LengthMismatch { expected, actual } => {
                write!(f, "length mismatch: table has {expected} rows, column has {actual}")
            }
            Error::NoUnpaddedWindows => {
                write!(f, "no unpadded window found, cannot build a duration profile")
            }
            Error::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            Error::FileExists(path) => write!(f, "file `{}` already exists", path.display()),
            Error::NotADirectory(path) => write!(f, "not a directory: {}", path.display()),
            Error::Io { path, source } => write!(f, "IO error on {}: {source}", path.display()),
            Error::Csv { path, message } => {
                write!(f, "CSV error in {}: {message}", path.display())
            }
            Error::InFile { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::InFile { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
