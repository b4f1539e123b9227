//! Error handling for keyforge
//!
//! A single error enum covers the request-time taxonomy (validation,
//! not-found, conflict, not-a-member, publish) plus the ambient failure
//! sources (store, crypto, serialization, HTTP).

mod helpers;
mod response;
mod types;


pub use response::{ErrorDetail, ErrorResponse};
pub use types::{KeyforgeError, Result};
