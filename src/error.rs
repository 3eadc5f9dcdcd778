use std::io;

use thiserror::Error;

/// Failures while writing the post collection back to disk.
///
/// Reading never produces one of these: a missing or unparseable file is
/// read as an empty collection.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not write posts file: {0}")]
    Io(#[from] io::Error),
    #[error("could not replace posts file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A submitted body that could not be read as form fields at all.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("could not read request body: {0}")]
    Body(#[from] io::Error),
    #[error("JSON body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("invalid JSON body: {0}")]
    Json(#[from] rustc_serialize::json::ParserError),
    #[error("JSON body must be an object")]
    NotAnObject,
}
