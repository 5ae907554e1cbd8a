//! Error taxonomy for the request/render pipeline.
//!
//! Validation failures never leave the client; transport and payload
//! failures replace the whole results view; render failures are isolated
//! to the one chart they affect.

use thiserror::Error;

/// A submission was rejected before any network call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error("unsupported file type: .{0} (accepted: .xls, .xlsx, .csv)")]
    UnsupportedExtension(String),
    #[error("file has no extension: {0}")]
    MissingExtension(String),
    #[error("cannot read file: {0}")]
    UnreadableFile(String),
}

/// The request itself failed, or the server answered with an error payload.
///
/// `Payload` covers the HTTP-200-but-first-element-has-`error` case: the
/// call succeeded at the transport level yet the whole batch is unusable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Payload(String),
}

/// One chart's payload parsed but could not produce a visual.
///
/// Never fails sibling charts in the same result set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("chart data is not valid JSON: {0}")]
    MalformedData(String),
    #[error("pie chart requires values and labels")]
    MissingPieData,
    #[error("chart description carries no renderable payload")]
    NoPayload,
}
