//! Purpose: Shared library crate behind the `schemite` CLI and C bindings.
//! Exports: `core` (schema, objects, documents, errors), `api` (stable Rust
//! surface), `abi` (C-callable surface).
//! Role: Internal library backing the binary and the cdylib.
//! Invariants: Treat the Rust API as internal until a dedicated library release.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod abi;
pub mod api;
pub mod core;
