//! Metrics for todo service operations.

use metrics::{counter, gauge, histogram};
use std::time::Instant;

pub const OPERATIONS_TOTAL: &str = "todo_operations_total";
pub const OPERATION_DURATION_SECONDS: &str = "todo_operation_duration_seconds";
pub const TODOS_TOTAL: &str = "todos_total";

/// Todo metrics recorder
pub struct TodoMetrics;

impl TodoMetrics {
    /// Start timing an operation such as `"create"` or `"list"`.
    pub fn start(operation: &'static str) -> OperationTimer {
        OperationTimer {
            operation,
            started: Instant::now(),
        }
    }

    /// Record the counts returned by a stats query
    pub fn set_counts(completed: u64, incomplete: u64) {
        gauge!(TODOS_TOTAL, "completed" => "true").set(completed as f64);
        gauge!(TODOS_TOTAL, "completed" => "false").set(incomplete as f64);
    }
}

/// Timer for one in-flight operation.
#[must_use = "an operation timer records nothing until finished"]
pub struct OperationTimer {
    operation: &'static str,
    started: Instant,
}

impl OperationTimer {
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Record the outcome: `"ok"` or the error kind, e.g. `"NOT_FOUND"`.
    pub fn finish(self, outcome: &'static str) {
        let elapsed = self.started.elapsed();

        counter!(OPERATIONS_TOTAL, "operation" => self.operation, "outcome" => outcome)
            .increment(1);
        histogram!(OPERATION_DURATION_SECONDS, "operation" => self.operation)
            .record(elapsed.as_secs_f64());

        tracing::debug!(
            operation = self.operation,
            outcome = outcome,
            duration_ms = elapsed.as_millis() as u64,
            "Todo operation finished"
        );
    }
}
