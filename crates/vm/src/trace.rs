//! Execution traces.
//!
//! A [`Tracer`] sees one [`StepRecord`] before each instruction is charged
//! and executed, and an [`AbortRecord`] if the context aborts. Records
//! serialize to camelCase JSON.

use serde::Serialize;

/// State of the context just before one instruction runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub pc: usize,
    pub op: &'static str,
    /// Gas remaining before this step is charged.
    pub gas: u64,
    pub gas_cost: u64,
    /// Return stack depth before the step.
    pub depth: usize,
    /// Data stack, bottom first, as `0x`-prefixed hex.
    pub stack: Vec<String>,
    /// Return stack, bottom first.
    pub return_stack: Vec<usize>,
}

/// Why and where a context aborted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbortRecord {
    pub pc: usize,
    pub op: &'static str,
    pub error: String,
}

/// Receives execution events.
pub trait Tracer {
    /// Whether step records should be built at all.
    fn enabled(&self) -> bool {
        true
    }

    fn step(&mut self, record: StepRecord);

    fn abort(&mut self, _record: AbortRecord) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn enabled(&self) -> bool {
        false
    }

    fn step(&mut self, _record: StepRecord) {}
}

/// Collects every record in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TraceLog {
    pub steps: Vec<StepRecord>,
    pub abort: Option<AbortRecord>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of `gas_cost` over all recorded steps.
    pub fn total_cost(&self) -> u64 {
        self.steps.iter().map(|s| s.gas_cost).sum()
    }

    /// Deepest return stack seen at any step.
    pub fn max_return_depth(&self) -> usize {
        self.steps
            .iter()
            .map(|s| s.depth)
            .max()
            .unwrap_or(0)
    }

    /// Program counters of every step, in order.
    pub fn pcs(&self) -> Vec<usize> {
        self.steps.iter().map(|s| s.pc).collect()
    }

    /// Mnemonics of every step, in order.
    pub fn ops(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.op).collect()
    }
}

impl Tracer for TraceLog {
    fn step(&mut self, record: StepRecord) {
        self.steps.push(record);
    }

    fn abort(&mut self, record: AbortRecord) {
        self.abort = Some(record);
    }
}

impl<T: Tracer + ?Sized> Tracer for &mut T {
    fn enabled(&self) -> bool {
        (**self).enabled()
    }

    fn step(&mut self, record: StepRecord) {
        (**self).step(record)
    }

    fn abort(&mut self, record: AbortRecord) {
        (**self).abort(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(pc: usize, op: &'static str, cost: u64, rs: Vec<usize>) -> StepRecord {
        StepRecord {
            pc,
            op,
            gas: 100,
            gas_cost: cost,
            depth: rs.len(),
            stack: vec![],
            return_stack: rs,
        }
    }

    #[test]
    fn trace_log_summaries() {
        let mut log = TraceLog::new();
        log.step(step(0, "PUSH1", 3, vec![]));
        log.step(step(2, "JUMPSUB", 8, vec![]));
        log.step(step(4, "BEGINSUB", 1, vec![3]));
        assert_eq!(log.total_cost(), 12);
        assert_eq!(log.max_return_depth(), 1);
        assert_eq!(log.pcs(), vec![0, 2, 4]);
        assert_eq!(log.ops(), vec!["PUSH1", "JUMPSUB", "BEGINSUB"]);
    }

    #[test]
    fn noop_tracer_is_disabled() {
        assert!(!NoopTracer.enabled());
        assert!(TraceLog::new().enabled());
    }
}
