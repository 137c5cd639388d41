//! Table primitives shared by every variant shape.
//!
//! # Submodules
//!
//! - [`decode`][]: segmented byte -> codepoint tables
//! - [`encode`][]: two-level codepoint -> byte index with on-demand segments
//! - [`overrides`][]: `.nr` / `.c2b` non-roundtrip layer
//! - [`composite`][]: PUA reverse table and composite-character table

pub mod composite;
pub mod decode;
pub mod encode;
pub mod overrides;
