use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading the index CSV. Nothing has been written when one of these is returned.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8 (first bad byte at offset {offset})")]
    NotUtf8 { path: PathBuf, offset: usize },

    #[error("{path} is empty")]
    Empty { path: PathBuf },

    #[error("malformed CSV in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    /// Rows must carry exactly TOPIC, BK#, PG#, COMMENTS.
    #[error("{path}, line {line}: expected 4 fields (TOPIC, BK#, PG#, COMMENTS), found {found}")]
    FieldCount {
        path: PathBuf,
        line: u64,
        found: usize,
    },
}

/// Failures while producing the .docx.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("{path} already exists (use --force to overwrite)")]
    Exists { path: PathBuf },

    #[error("cannot create output in {dir}: {source}")]
    Create {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot package {path}: {source}")]
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot move finished document to {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

pub type Result<T> = std::result::Result<T, Error>;
