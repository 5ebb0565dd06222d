use serde::Serialize;

/// The outcome of a single scenario step.
#[derive(Clone, Debug, Serialize)]
pub struct StepReport {
    /// Short label of the step, e.g. `deploy AuctionNFT`.
    pub label: String,
    /// Human-readable outcome: a deployed address, a decoded return value.
    pub detail: String,
    /// Gas used by the step's transaction, if it executed one.
    pub gas_used: Option<u64>,
    /// Decoded event logs emitted during the step.
    pub logs: Vec<String>,
}

/// The full record of a scenario run, one entry per step in execution
/// order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ScenarioReport {
    /// The executed steps.
    pub steps: Vec<StepReport>,
}

impl ScenarioReport {
    /// Total gas used across all steps.
    pub fn total_gas(&self) -> u64 {
        self.steps.iter().filter_map(|step| step.gas_used).sum()
    }
}
