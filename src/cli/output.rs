//! Output formatting for CLI commands

use serde::Serialize;

use crate::facts::EnvironmentFacts;
use crate::notification::RunOutcome;

/// Pretty JSON for `--json` output
pub fn format_output<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

/// Human readable facts table
pub fn format_facts(facts: &EnvironmentFacts) -> String {
    [
        format!("registry reboot pending: {}", facts.registry_reboot_pending),
        format!("service reboot pending:  {}", facts.service_reboot_pending),
        format!("uptime (days):           {}", facts.uptime_days),
        format!("running build:           {}", facts.running_build_number),
        format!("deadlines within 24h:    {}", facts.recent_or_upcoming_deadline_count),
    ]
    .join("\n")
}

pub fn format_outcome(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Presented(scenario) => format!("Notification shown ({})", scenario),
        RunOutcome::Suppressed => "Nothing to notify".to_string(),
        RunOutcome::PresentFailed { scenario, error } => {
            format!("Could not show notification ({}): {}", scenario, error)
        }
    }
}
