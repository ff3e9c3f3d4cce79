//! Durable per-device key/value storage
//!
//! Backends store opaque strings; [`PrefixedStore`] layers key prefixing and
//! expiring JSON values on top, and [`resolve_user_id`] uses it to keep one
//! user id per device across sessions.

pub mod backend;
pub mod errors;
pub mod prefixed;
pub mod user_id;

pub use backend::{DeviceStore, FileStore, MemoryStore};
pub use errors::StorageError;
pub use prefixed::{PrefixedStore, StoredValue};
pub use user_id::resolve_user_id;
