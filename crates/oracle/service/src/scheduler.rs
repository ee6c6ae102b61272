//! Cron trigger for the compliance sync

use chrono::{DateTime, Utc};
use cron::Schedule;
use oracle_types::OracleError;
use oracle_workflows::ComplianceSyncWorkflow;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

/// Fires one compliance sync per schedule tick. Ticks never overlap: a
/// run that outlasts its interval delays the next tick instead.
#[derive(Debug, Clone)]
pub struct CronTrigger {
    expression: String,
    schedule: Schedule,
}

impl CronTrigger {
    /// Six-field expression with seconds, e.g. `0 */5 * * * *`.
    pub fn parse(expression: &str) -> Result<Self, OracleError> {
        let schedule = Schedule::from_str(expression).map_err(|e| {
            OracleError::Config(format!("compliance.schedule '{expression}': {e}"))
        })?;
        Ok(Self {
            expression: expression.to_string(),
            schedule,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn next_after(&self, after: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(after).next()
    }

    /// Run until `shutdown` flips.
    pub async fn run(self, workflow: Arc<ComplianceSyncWorkflow>, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(schedule = %self.expression, "Cron trigger started");

        loop {
            let now = Utc::now();
            let Some(next) = self.next_after(&now) else {
                tracing::warn!(schedule = %self.expression, "Schedule has no upcoming ticks");
                return;
            };
            let wait = (next - now).to_std().unwrap_or_default();

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = shutdown.changed() => {
                    tracing::info!("Cron trigger stopped");
                    return;
                }
            }

            let outcome = workflow.run().await;
            tracing::info!(
                tick = %next.to_rfc3339(),
                status = %outcome.status_line(),
                "Compliance sync tick complete"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_schedule_fires_every_five_minutes() {
        let trigger = CronTrigger::parse("0 */5 * * * *").unwrap();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 1, 30).unwrap();

        let first = trigger.next_after(&start).unwrap();
        assert_eq!(first, Utc.with_ymd_and_hms(2024, 3, 1, 12, 5, 0).unwrap());
        let second = trigger.next_after(&first).unwrap();
        assert_eq!(second, Utc.with_ymd_and_hms(2024, 3, 1, 12, 10, 0).unwrap());
    }

    #[test]
    fn invalid_expression_is_a_config_error() {
        let err = CronTrigger::parse("every five minutes").unwrap_err();
        assert_eq!(err.kind(), "config_error");
    }
}
