//! The crate error type.
//!
//! Expressions the engine rejects are not errors: they are reported as
//! [`Diagnostic`](crate::Diagnostic)s next to an otherwise complete
//! document.  An `Error` means no document could be produced.

use std::io;

use thiserror::Error;

/// Fatal pipeline failures.
#[derive(Debug, Error)]
pub enum Error {
    /// The source document was empty.
    #[error("invalid document: the source text is empty")]
    InvalidInput,

    /// The typesetting engine could not be loaded or started.
    #[error("typesetting engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The external document converter failed.
    #[error("document converter failed: {0}")]
    Converter(String),

    /// I/O while talking to an external process.
    #[error(transparent)]
    Io(#[from] io::Error),
}
