//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls and tag rewrites into use-case level APIs.
//! - Keep the CLI and other callers decoupled from storage details.

pub mod delegate_directory;
pub mod sync_coordinator;
