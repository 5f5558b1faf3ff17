//! The sequential reconciliation loop: resolve each configuration entry and
//! upsert it against the provider, collecting per-entry outcomes.

use crate::{
    context::RunContext,
    models::{AlarmSpec, EntryOutcome, ReconciliationReport},
    provider::AlarmProvider,
    resolver::{AlarmResolver, ResolverError},
};

/// Reconciles configured alarms against a monitoring provider.
pub struct Reconciler<P> {
    provider: P,
}

impl<P: AlarmProvider> Reconciler<P> {
    /// Creates a reconciler over the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Runs one reconciliation pass over the entries, strictly in order.
    ///
    /// Resolution errors are fatal and abort the run. Provider call failures
    /// are logged and recorded; the batch continues with the next entry.
    pub async fn run(
        &self,
        context: &RunContext,
        entries: &[(String, AlarmSpec)],
    ) -> Result<ReconciliationReport, ResolverError> {
        let resolver = AlarmResolver::new(context);
        let mut report = ReconciliationReport::default();

        for (key, spec) in entries {
            let alarm = resolver.resolve(key, spec)?;
            tracing::info!(entry = %key, alarm = %alarm.name, "Alarm name resolved");

            let error = match self.provider.put_alarm(&alarm).await {
                Ok(()) => {
                    tracing::info!(alarm = %alarm.name, "Alarm created");
                    None
                }
                Err(e) => {
                    tracing::error!(alarm = %alarm.name, error = %e, "Failed to create alarm");
                    Some(e.to_string())
                }
            };
            report.outcomes.push(EntryOutcome {
                entry: key.clone(),
                alarm_name: alarm.name,
                error,
            });
        }

        Ok(report)
    }
}
