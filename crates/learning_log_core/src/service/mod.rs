//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into request-level journal operations.
//! - Keep the web layer decoupled from storage details.

pub mod journal_service;
