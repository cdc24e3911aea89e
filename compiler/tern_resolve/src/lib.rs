//! Tern resolver - name resolution and type checking for Tern programs.
//!
//! Takes a parsed [`NodeArena`](tern_ir::NodeArena) rooted at a `Program`
//! node and annotates every node with its resolved type and symbol:
//! - declarations become [`Symbol`](tern_types::Symbol)s in lexical scopes
//! - symbols are initialized lazily, with cycle detection
//! - inherited members are merged and overrides checked
//! - expressions are typed, with implicit conversions made explicit
//! - operator overloads, string concatenation and `**` are rewritten into calls
//! - default constructors and enum `toString` methods are synthesized
//!
//! # Usage
//!
//! ```ignore
//! use tern_resolve::{resolve_program, ResolverOptions};
//!
//! let output = resolve_program(&mut nodes, program, &interner, &ResolverOptions::default());
//! if output.diagnostics.has_errors().is_some() {
//!     // report and stop
//! }
//! ```

mod fold;
mod names;
mod options;
mod prelude;
mod resolver;

#[cfg(test)]
mod integration_tests;

use std::sync::Once;

pub use fold::{constant_of, ConstantFolder, DefaultConstantFolder, FoldContext};
pub use options::{ResolverOptions, MAX_NESTING_DEPTH};
pub use resolver::{resolve_program, resolve_program_with_folder, ResolveOutput};

static TRACING_INIT: Once = Once::new();

/// Install a hierarchical tracing subscriber.
///
/// Only active when `RUST_LOG` is set, e.g.
/// `RUST_LOG=tern_resolve=trace`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;
        use tracing_subscriber::EnvFilter;

        let _ = tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(
                tracing_tree::HierarchicalLayer::new(2)
                    .with_targets(true)
                    .with_indent_lines(true),
            )
            .try_init();
    });
}
