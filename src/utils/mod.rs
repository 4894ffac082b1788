//! Utility modules for seafood scoring
//!
//! Contains shared functionality used across the resolver and the scorers:
//! - Normalization: Canonical name and method-key forms
//! - Vernacular: Locale-aware display names

pub mod normalization;
pub mod vernacular;

// Re-export commonly used types
pub use normalization::{normalize_name, normalize_method_key, is_supplied, supplied};
pub use vernacular::{Locale, display_name};
