//! Built-in surface of the Mica runtime.
//!
//! [`bootstrap`] fills a [`Registry`](mica_dispatch::Registry) with the types,
//! operators and reflection functions scripts expect:
//!
//! - POD numerics (`double`, `float`, `int`, `size_t`, `char`, `int64_t`)
//!   with constructors, assignment, compound assignment and conversions
//! - `PODObject` operators for mixed numeric operands
//! - function, value and `Type_Info` reflection
//! - `Dynamic_Object` attribute access and cloning
//! - exceptions (`exception`, `runtime_error`, `dispatch_error`), `throw`
//! - `bind`, `call_exists`, `print_string`, `println_string`
//!
//! Everything goes through the same `Registry::add` a host uses, so a host
//! can extend or shadow any of it afterwards.

use std::sync::Once;

mod bootstrap;
mod config;
mod dynamic_objects;
mod exceptions;
mod native;
mod operators;
pub mod pod_types;
mod print_handler;
mod reflection;

pub use bootstrap::{bootstrap, bootstrap_with};
pub use config::{BootstrapConfig, BootstrapConfigBuilder};
pub use dynamic_objects::CLONE_SOURCE;
pub use exceptions::{throw, Exception, RuntimeError};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};

static TRACING_INIT: Once = Once::new();

/// Install a hierarchical tracing subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset, or after the first call.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let tree = tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true);
            // A host may already have installed a global subscriber.
            let _ = tracing_subscriber::registry()
                .with(EnvFilter::from_default_env())
                .with(tree)
                .try_init();
        }
    });
}
