//! # gslink-core
//!
//! Shared vocabulary for gslink, the companion process that answers a game's
//! requests over a pair of directories.
//!
//! - **Ids**: [`RequestId`], the file stem correlating a request with its response
//! - **Requests**: [`Request`] closed enum over `ping` and the GrooveStats actions
//! - **Envelope parsing**: [`parse_request`] / [`parse_envelope`] classify raw JSON
//! - **Errors**: [`EnvelopeError`] via `thiserror`
//! - **Logging**: `tracing` subscriber setup and test capture helpers

#![deny(unsafe_code)]

pub mod envelope;
pub mod errors;
pub mod ids;
pub mod logging;
pub mod request;

pub use envelope::{parse_envelope, parse_request};
pub use errors::EnvelopeError;
pub use ids::RequestId;
pub use request::{
    Action, NewSessionRequest, PingRequest, PlayerScoresRequest, Request, SubmitScoreRequest,
};
