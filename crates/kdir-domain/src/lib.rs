#![deny(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod kind;
pub mod metadata;
pub mod names;
pub mod object;

pub use kind::{ObjectKind, UnknownKind};
pub use metadata::{Metadata, LAST_APPLIED_ANNOTATION};
pub use names::{validate_key, validate_segment, NameError};
pub use object::{DataMap, DataObject, ObjectRef};
