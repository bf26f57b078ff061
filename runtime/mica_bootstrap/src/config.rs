//! Bootstrap configuration.

use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Options for [`bootstrap_with`](crate::bootstrap_with).
///
/// The default prints to stdout and defines `Dynamic_Object::clone` through
/// the evaluator when one is attached.
#[derive(Clone, Debug)]
pub struct BootstrapConfig {
    print_handler: SharedPrintHandler,
    script_clone: bool,
}

impl BootstrapConfig {
    pub fn builder() -> BootstrapConfigBuilder {
        BootstrapConfigBuilder::default()
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Whether `Dynamic_Object::clone` is defined by evaluating a snippet.
    pub fn script_clone(&self) -> bool {
        self.script_clone
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`BootstrapConfig`].
#[derive(Default)]
pub struct BootstrapConfigBuilder {
    print_handler: Option<SharedPrintHandler>,
    native_clone: bool,
}

impl BootstrapConfigBuilder {
    /// Destination of `print_string` and `println_string`.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Register the native `Dynamic_Object` clone even when an evaluator is
    /// attached.
    #[must_use]
    pub fn native_clone(mut self) -> Self {
        self.native_clone = true;
        self
    }

    pub fn build(self) -> BootstrapConfig {
        BootstrapConfig {
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            script_clone: !self.native_clone,
        }
    }
}
