//! Diagnostic system for the Tern resolver.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Secondary labels and notes (related code)
//!
//! # Error Guarantees
//!
//! `ErrorGuaranteed` is type-level proof that at least one error was
//! emitted. The resolver never fails with a `Result`; it logs into a
//! [`DiagnosticQueue`] and callers gate later stages on
//! [`DiagnosticQueue::has_errors`].

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{type_mismatch, undeclared_symbol, Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
