//! The KPI fold.

use pulse_core::{KpiRecord, Notification, PulseResult};
use pulse_events::EventLog;
use pulse_ledger::RevenueLedger;
use tracing::debug;

/// Discriminator: a partner accepted an offer, opening a project.
pub const EVENT_OFFER_ACCEPTED: &str = "offer_accepted";
/// Discriminator: a project was removed, which the model counts as completed.
pub const EVENT_PROJECT_REMOVED: &str = "project_removed";
/// Discriminator: a deliverable was submitted, optionally carrying a rating.
pub const EVENT_DELIVERABLE_SUBMITTED: &str = "deliverable_submitted";

/// Scan the full event log and derive the dashboard KPIs.
///
/// Events without a string `payload.event` field, or with an unknown tag,
/// are skipped silently - malformed payloads are never fatal. Ratings are
/// taken from `payload.rating` on deliverable events and only counted when
/// finite and > 0.
pub fn compute_stats(log: &EventLog, ledger: &RevenueLedger) -> PulseResult<KpiRecord> {
    let events = log.list()?;
    let total_revenue = ledger.total()?;

    let mut accepted: u64 = 0;
    let mut removed: u64 = 0;
    let mut ratings: Vec<f64> = Vec::new();

    for event in &events {
        match discriminator(event) {
            Some(EVENT_OFFER_ACCEPTED) => accepted += 1,
            Some(EVENT_PROJECT_REMOVED) => removed += 1,
            Some(EVENT_DELIVERABLE_SUBMITTED) => {
                if let Some(rating) = rating(event) {
                    ratings.push(rating);
                }
            }
            Some(tag) => debug!(%tag, "unknown stat discriminator, skipping"),
            None => {}
        }
    }

    let completed_projects = removed;
    let active_projects = accepted.saturating_sub(removed);
    let total_projects = active_projects + completed_projects;

    let avg_rating = if ratings.is_empty() {
        0.0
    } else {
        ratings.iter().sum::<f64>() / ratings.len() as f64
    };
    let success_rate = if total_projects == 0 {
        0.0
    } else {
        completed_projects as f64 / total_projects as f64 * 100.0
    };

    Ok(KpiRecord {
        active_projects,
        total_projects,
        completed_projects,
        total_revenue,
        avg_rating,
        success_rate,
    })
}

fn discriminator(event: &Notification) -> Option<&str> {
    event.payload.as_ref()?.get("event")?.as_str()
}

fn rating(event: &Notification) -> Option<f64> {
    let rating = event.payload.as_ref()?.get("rating")?.as_f64()?;
    (rating.is_finite() && rating > 0.0).then_some(rating)
}
