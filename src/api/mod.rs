//! Purpose: Define the stable public Rust API boundary for schemite.
//! Exports: Core types and operations needed by bindings and CLI.
//! Role: Public, additive-only surface; hides internal engine modules.
//! Invariants: This module is the only public path to engine primitives.

pub use crate::core::doc::{DOC_FORMAT, MAX_DOC_LEN};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::object::{DataObject, Record, Value};
pub use crate::core::rep::Representation;
pub use crate::core::schema::{Kind, MAX_SCHEMA_DEPTH, Schema, Template};
