//! Automatic replies to product reviews.
//!
//! A review is gated on sentiment (rating first, classifier only for ambiguous
//! ratings), negative reviews are grounded on the nearest FAQ entry from a flat L2
//! index, and a chat model writes the reply. Any failure along the way degrades to
//! a canned, rating-keyed message, so [`responder::Responder::respond`] always
//! answers.

pub mod chat;
pub mod config;
pub mod embedding;
pub mod errors;
pub mod index;
pub mod ingest;
pub mod responder;
pub mod sentiment;
pub mod transformers;
pub mod types;

pub use crate::config::Config;
pub use crate::errors::ResponderError;
pub use crate::responder::Responder;
pub use crate::types::{Response, ResponseMode, Review};
