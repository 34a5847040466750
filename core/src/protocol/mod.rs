//! Public interface
//!
//! - `config.rs`: ProtocolConfig builder and the normative constants
//! - `error.rs`: PutError

mod config;
mod error;

pub use config::{ProtocolConfig, CONTACT_PEERS_AWAIT_MS, PUT_RETRIES};
pub use error::PutError;
