//! Core types for the book catalog analyzer.
//!
//! Holds the normalized [`models::BookRecord`], the shared error type, the
//! publication-year extractor, text formatting helpers and CLI settings.

pub mod date_parsing;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
