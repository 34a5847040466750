//! Data model
//!
//! Identifiers, storage keys, versioned content, and the user locations
//! list. Everything here is plain data; network behavior lives in
//! `crate::network`.

pub mod content;
pub mod id;
pub mod keys;
pub mod locations;

pub use content::NetworkContent;
pub use id::{Id, PeerId};
pub use keys::{version_range, StorageKey};
pub use locations::{LocationEntry, Locations};
