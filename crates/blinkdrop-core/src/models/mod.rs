//! Domain models

pub mod access_code;
pub mod object;

pub use access_code::AccessCode;
pub use object::{restore_base64, ObjectMetadata, ObjectSummary, StoredObject};
