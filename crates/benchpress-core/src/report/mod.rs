pub mod console;
pub mod json;

use serde::Serialize;

/// Per-configuration tallies returned by an engine run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub config: String,
    /// Instances freshly executed to success this run.
    pub executed: u64,
    /// Instances skipped because a completion marker already existed.
    pub resumed: u64,
    /// Instances preempted by an earlier timeout of the same identity.
    pub propagated: u64,
    pub timeouts: u64,
    pub data_errors: u64,
}

impl RunReport {
    pub fn new(config: &str) -> Self {
        Self {
            config: config.to_owned(),
            executed: 0,
            resumed: 0,
            propagated: 0,
            timeouts: 0,
            data_errors: 0,
        }
    }

    /// Instances submitted to the connection this run.
    pub fn attempted(&self) -> u64 {
        self.executed + self.timeouts + self.data_errors
    }
}
