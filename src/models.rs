//! Data structures for alarm configuration entries and resolved alarm
//! definitions.

use serde::{Deserialize, Serialize};

/// A name/value pair narrowing a metric to a specific resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// The dimension name (e.g., `InstanceId`).
    #[serde(rename = "Name")]
    pub name: String,
    /// The dimension value (e.g., `i-0fc52a4ca4d81b5b4`).
    #[serde(rename = "Value")]
    pub value: String,
}

/// The statistic applied to the metric over each evaluation period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statistic {
    /// Arithmetic mean of the datapoints.
    Average,
    /// Sum of the datapoints.
    Sum,
    /// Lowest datapoint value.
    Minimum,
    /// Highest datapoint value.
    Maximum,
    /// Number of datapoints.
    SampleCount,
}

/// How the metric statistic is compared against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// Alarm when statistic >= threshold.
    GreaterThanOrEqualToThreshold,
    /// Alarm when statistic > threshold.
    GreaterThanThreshold,
    /// Alarm when statistic < threshold.
    LessThanThreshold,
    /// Alarm when statistic <= threshold.
    LessThanOrEqualToThreshold,
}

/// One alarm entry as it appears in the configuration document.
///
/// `namespace`, `alarm_actions` and `dimensions` are optional at parse time;
/// their presence requirements are enforced during resolution, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmSpec {
    /// Name of the metric the alarm watches.
    #[serde(rename = "MetricName")]
    pub metric_name: String,

    /// Metric namespace. Optional when the CLI supplies a global override.
    #[serde(rename = "Namespace", default)]
    pub namespace: Option<String>,

    /// Human-readable description attached to the alarm.
    #[serde(rename = "AlarmDescription")]
    pub description: String,

    /// Notification target identifiers (SNS topic ARNs), in order.
    #[serde(rename = "AlarmActions", default)]
    pub alarm_actions: Option<Vec<String>>,

    /// The threshold the statistic is compared against.
    #[serde(rename = "Threshold")]
    pub threshold: f64,

    /// The statistic applied to the metric.
    #[serde(rename = "Statistic")]
    pub statistic: Statistic,

    /// The comparison against the threshold.
    #[serde(rename = "ComparisonOperator")]
    pub comparison_operator: ComparisonOperator,

    /// Dimensions identifying the resource. Required for resolution.
    #[serde(rename = "Dimensions", default)]
    pub dimensions: Option<Vec<Dimension>>,
}

/// Evaluation period applied to every alarm, in seconds.
pub const PERIOD_SECONDS: i32 = 300;

/// Number of periods the threshold must be breached before alarming.
pub const EVALUATION_PERIODS: i32 = 1;

/// A fully-defaulted alarm definition, ready for one provider upsert call.
///
/// The same action list is wired to the OK, ALARM and INSUFFICIENT_DATA
/// transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAlarm {
    /// Composite alarm name: `prefix.metricName.dimValue1.dimValue2...`.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Notification targets for all three state transitions.
    pub actions: Vec<String>,
    /// Name of the metric the alarm watches.
    pub metric_name: String,
    /// Resolved metric namespace.
    pub namespace: String,
    /// Dimensions identifying the resource, in configuration order.
    pub dimensions: Vec<Dimension>,
    /// The threshold the statistic is compared against.
    pub threshold: f64,
    /// The statistic applied to the metric.
    pub statistic: Statistic,
    /// The comparison against the threshold.
    pub comparison_operator: ComparisonOperator,
}

/// Outcome of a single entry's upsert attempt.
#[derive(Debug, Clone)]
pub struct EntryOutcome {
    /// The entry's key in the configuration document.
    pub entry: String,
    /// The composite alarm name the entry resolved to.
    pub alarm_name: String,
    /// Error display when the provider call failed, `None` on success.
    pub error: Option<String>,
}

impl EntryOutcome {
    /// Whether the provider call for this entry succeeded.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-entry outcomes of one reconciliation run, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationReport {
    /// One outcome per configuration entry.
    pub outcomes: Vec<EntryOutcome>,
}

impl ReconciliationReport {
    /// Whether every entry in the run succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(EntryOutcome::succeeded)
    }

    /// Number of entries whose provider call failed.
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }
}
