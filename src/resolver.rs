//! Resolution of raw configuration entries into complete alarm definitions.
//!
//! Applies the defaulting rules: CLI overrides for namespace and notification
//! targets, an inert fallback target when an entry configures none, and the
//! composite alarm name derived from prefix, metric and dimension values.

use thiserror::Error;

use crate::{
    context::RunContext,
    models::{AlarmSpec, ResolvedAlarm},
};

/// Account/topic pair that no SNS deliverable can exist under. Used to keep
/// alarms inert when no notification target is configured.
const NO_OP_TOPIC_ACCOUNT: &str = "000000000000:no-op";

/// Errors that can occur while resolving an alarm entry.
///
/// Both variants are fatal: the run stops at the first unresolvable entry.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Neither the CLI nor the entry supplied a metric namespace.
    #[error(
        "Namespace of metric to create alarm for undefined for entry {entry:?}. \
         Use --namespace or set the Namespace key in the configuration"
    )]
    MissingNamespace {
        /// The entry's key in the configuration document.
        entry: String,
    },

    /// The entry has no `Dimensions` key.
    #[error("Unable to find Dimensions key for alarm entry {entry:?}")]
    MissingDimensions {
        /// The entry's key in the configuration document.
        entry: String,
    },
}

/// Resolves configuration entries against an immutable [`RunContext`].
pub struct AlarmResolver<'a> {
    context: &'a RunContext,
}

impl<'a> AlarmResolver<'a> {
    /// Creates a resolver for the given run context.
    pub fn new(context: &'a RunContext) -> Self {
        Self { context }
    }

    /// Resolves one configuration entry into a complete alarm definition.
    pub fn resolve(&self, entry: &str, spec: &AlarmSpec) -> Result<ResolvedAlarm, ResolverError> {
        let namespace = self
            .context
            .namespace
            .clone()
            .or_else(|| spec.namespace.clone())
            .ok_or_else(|| ResolverError::MissingNamespace { entry: entry.to_string() })?;

        let actions = match (&self.context.topic, &spec.alarm_actions) {
            (Some(topic), _) => {
                tracing::info!(topic = %topic, entry, "Using override topic");
                vec![topic.clone()]
            }
            (None, Some(actions)) => actions.clone(),
            (None, None) => vec![no_op_topic(&self.context.region)],
        };

        let dimensions = spec
            .dimensions
            .clone()
            .ok_or_else(|| ResolverError::MissingDimensions { entry: entry.to_string() })?;

        let name = alarm_name(
            &self.context.alarm_prefix,
            &spec.metric_name,
            dimensions.iter().map(|d| d.value.as_str()),
        );

        Ok(ResolvedAlarm {
            name,
            description: spec.description.clone(),
            actions,
            metric_name: spec.metric_name.clone(),
            namespace,
            dimensions,
            threshold: spec.threshold,
            statistic: spec.statistic,
            comparison_operator: spec.comparison_operator,
        })
    }
}

/// Builds the composite alarm name: prefix, metric name and every dimension
/// value in order, joined with dots.
fn alarm_name<'v>(prefix: &str, metric_name: &str, values: impl Iterator<Item = &'v str>) -> String {
    let mut name = format!("{}.{}", prefix, metric_name);
    for value in values {
        name.push('.');
        name.push_str(value);
    }
    name
}

/// Constructs a syntactically valid but undeliverable SNS topic ARN, so that
/// alarms without configured targets are created inert.
fn no_op_topic(region: &str) -> String {
    format!("arn:aws:sns:{}:{}", region, NO_OP_TOPIC_ACCOUNT)
}
