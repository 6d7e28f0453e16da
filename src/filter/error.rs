use thiserror::Error;

use crate::error::FieldErrors;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid list parameters: {0:?}")]
    InvalidParams(FieldErrors),

    #[error("Unsupported sort column: {0}")]
    UnsupportedSortColumn(String),

    #[error("Listing '{listing}' refers to unknown column '{column}'")]
    UnknownColumn { listing: &'static str, column: String },
}
