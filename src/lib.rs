//! docverifier - Checks docstrings against the code they document
//!
//! This library compares the facts an extractor reports about each function
//! (signature, returns, raises, side effects) with what its docstring claims,
//! and renders the disagreements as editor-style diagnostics with fixes.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod docstring;
pub mod editor;
pub mod error;
pub mod facts;
pub mod normalize;

/// Re-export commonly used types
pub use analysis::{Analyzer, FunctionReport, Mismatch, Verifier};
pub use config::VerifierConfig;
pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticEmitter, Severity};
pub use docstring::{DocDescriptor, DocstringStyle, StyleSetting};
pub use editor::{DocstringEditor, Fix};
pub use error::Error;
pub use facts::{CodeFacts, ExtractionReport};
pub use normalize::{normalize, types_match};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "docverifier";
