//! Resolver configuration.

use tern_diagnostic::DiagnosticConfig;

/// Default nesting depth before expressions are rejected as too deep.
pub const MAX_NESTING_DEPTH: u32 = 1024;

/// Configuration for a resolution run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Report a missing `@EntryPoint` function.
    pub require_entry_point: bool,
    /// Warn about expression statements whose value is discarded.
    pub warn_unused_expressions: bool,
    /// Maximum expression and statement nesting depth (0 = unbounded).
    pub max_nesting_depth: u32,
    /// Error limit and filtering for the diagnostic queue.
    pub diagnostics: DiagnosticConfig,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        ResolverOptions {
            require_entry_point: false,
            warn_unused_expressions: true,
            max_nesting_depth: MAX_NESTING_DEPTH,
            diagnostics: DiagnosticConfig::default(),
        }
    }
}

impl ResolverOptions {
    #[must_use]
    pub fn with_entry_point_required(mut self, required: bool) -> Self {
        self.require_entry_point = required;
        self
    }

    #[must_use]
    pub fn with_unused_expression_warnings(mut self, warn: bool) -> Self {
        self.warn_unused_expressions = warn;
        self
    }

    #[must_use]
    pub fn with_max_nesting_depth(mut self, depth: u32) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}
