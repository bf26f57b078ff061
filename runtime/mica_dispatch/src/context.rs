//! Per-call dispatch state: base-class table, limits and nesting depth.

use mica_value::{DispatchError, DispatchResult};

use crate::conversions::SharedConversions;

/// Nested calls allowed before dispatch gives up.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Tunable bounds on dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchLimits {
    pub max_call_depth: usize,
}

impl Default for DispatchLimits {
    fn default() -> Self {
        DispatchLimits {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// State threaded through every call.
///
/// A context is cheap to clone; the conversion table is shared with the
/// registry that produced it.
#[derive(Clone, Debug, Default)]
pub struct DispatchContext {
    conversions: SharedConversions,
    limits: DispatchLimits,
    depth: usize,
}

impl DispatchContext {
    pub fn new(conversions: SharedConversions, limits: DispatchLimits) -> Self {
        DispatchContext {
            conversions,
            limits,
            depth: 0,
        }
    }

    #[inline]
    pub fn conversions(&self) -> &SharedConversions {
        &self.conversions
    }

    #[inline]
    pub fn limits(&self) -> DispatchLimits {
        self.limits
    }

    /// Number of calls currently active on this chain.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Context for a call one level deeper.
    pub(crate) fn nested(&self) -> DispatchResult<Self> {
        if self.depth >= self.limits.max_call_depth {
            return Err(DispatchError::CallDepthExceeded {
                limit: self.limits.max_call_depth,
            });
        }
        Ok(DispatchContext {
            conversions: self.conversions.clone(),
            limits: self.limits,
            depth: self.depth + 1,
        })
    }
}
