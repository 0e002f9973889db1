//! Core use-case services.
//!
//! # Responsibility
//! - Turn caller requests into full load-modify-save cycles over storage.
//! - Keep CLI callers decoupled from persistence details.

pub mod catalog_service;
