//! Derived KPI record.

use serde::{Deserialize, Serialize};

/// Dashboard KPIs derived from the event log and the revenue ledger.
///
/// Computed fresh on every call to the aggregator; never persisted and never
/// cached across mutations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiRecord {
    pub active_projects: u64,
    pub total_projects: u64,
    pub completed_projects: u64,
    pub total_revenue: f64,
    pub avg_rating: f64,
    /// Completed over total, as a percentage; 0 when there are no projects.
    pub success_rate: f64,
}
