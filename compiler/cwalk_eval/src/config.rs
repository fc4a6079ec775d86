//! Evaluation policy.

/// Call depth allowed when nothing else is configured.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Knobs of one interpreter instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Maximum number of simultaneously active invocations, `main` included.
    ///
    /// Exceeding it is a `StackOverflow` error. `None` means unlimited, in
    /// which case runaway recursion ends when the process runs out of memory.
    pub max_call_depth: Option<usize>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
        }
    }
}

impl EvalConfig {
    /// No call depth limit.
    pub fn unbounded() -> Self {
        EvalConfig {
            max_call_depth: None,
        }
    }

    #[must_use]
    pub fn with_max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = depth;
        self
    }
}
