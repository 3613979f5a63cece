//! Hashtag marker engine.
//!
//! # Responsibility
//! - Extract, classify and canonicalize markers embedded in notes text.
//!
//! # Invariants
//! - Everything in this module is pure: no I/O, no shared mutable state.
//! - No function here fails; malformed input yields a defined output.

pub mod classify;
pub mod extract;
pub mod normalize;
