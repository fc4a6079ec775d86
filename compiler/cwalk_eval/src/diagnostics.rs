//! Execution counters for tracing runs.

use std::fmt;

/// Counts of work done by one interpreter, maintained on every run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalStats {
    pub expressions: u64,
    pub statements: u64,
    pub user_calls: u64,
    pub builtin_calls: u64,
    /// Deepest call stack observed, `main` counted as depth 1.
    pub max_depth: usize,
}

impl EvalStats {
    #[inline]
    pub fn count_expression(&mut self) {
        self.expressions = self.expressions.wrapping_add(1);
    }

    #[inline]
    pub fn count_statement(&mut self) {
        self.statements = self.statements.wrapping_add(1);
    }

    #[inline]
    pub fn count_user_call(&mut self) {
        self.user_calls = self.user_calls.wrapping_add(1);
    }

    #[inline]
    pub fn count_builtin_call(&mut self) {
        self.builtin_calls = self.builtin_calls.wrapping_add(1);
    }

    #[inline]
    pub fn record_depth(&mut self, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
    }
}

impl fmt::Display for EvalStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "expressions evaluated: {}", self.expressions)?;
        writeln!(f, "statements executed:   {}", self.statements)?;
        writeln!(f, "user calls:            {}", self.user_calls)?;
        writeln!(f, "builtin calls:         {}", self.builtin_calls)?;
        write!(f, "max call depth:        {}", self.max_depth)
    }
}
