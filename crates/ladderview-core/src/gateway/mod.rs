//! Remote data gateway contract.
//!
//! The transport is supplied by the host; this module defines what the
//! freshness controller expects back from it and how raw responses are
//! classified into [`FetchOutcome`]s.

pub mod errors;
pub mod traits;
pub mod types;

pub use errors::GatewayError;
pub use traits::PlayerGateway;
pub use types::{Credentials, FetchOutcome, GatewayResponse};
