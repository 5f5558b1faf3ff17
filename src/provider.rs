//! The provider seam: a trait for the "put alarm" upsert operation and its
//! CloudWatch implementation.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudwatch::types::{
    ComparisonOperator as CwComparisonOperator, Dimension as CwDimension,
    Statistic as CwStatistic,
};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::models::{
    ComparisonOperator, Dimension, ResolvedAlarm, Statistic, EVALUATION_PERIODS, PERIOD_SECONDS,
};

/// Errors that can occur during a provider upsert call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The alarm definition could not be converted into a valid request.
    #[error("Invalid alarm definition: {0}")]
    Build(#[from] aws_sdk_cloudwatch::error::BuildError),

    /// The PutMetricAlarm call failed (any non-success provider response).
    #[error("PutMetricAlarm call failed: {0}")]
    PutAlarm(#[from] aws_sdk_cloudwatch::Error),
}

/// A monitoring provider that can upsert alarm definitions.
///
/// The operation is idempotent on the provider side: an existing alarm with
/// the same name is overwritten, so repeated runs converge.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AlarmProvider: Send + Sync {
    /// Creates the alarm, or updates it if one with the same name exists.
    async fn put_alarm(&self, alarm: &ResolvedAlarm) -> Result<(), ProviderError>;
}

/// [`AlarmProvider`] backed by the AWS CloudWatch API.
pub struct CloudWatchProvider {
    client: aws_sdk_cloudwatch::Client,
}

impl CloudWatchProvider {
    /// Creates a provider for the given region, with credentials from the
    /// default AWS credential chain.
    pub async fn new(region: &str) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self { client: aws_sdk_cloudwatch::Client::new(&sdk_config) }
    }
}

#[async_trait]
impl AlarmProvider for CloudWatchProvider {
    async fn put_alarm(&self, alarm: &ResolvedAlarm) -> Result<(), ProviderError> {
        // The same target list is wired to all three state transitions.
        self.client
            .put_metric_alarm()
            .alarm_name(&alarm.name)
            .alarm_description(&alarm.description)
            .set_ok_actions(Some(alarm.actions.clone()))
            .set_alarm_actions(Some(alarm.actions.clone()))
            .set_insufficient_data_actions(Some(alarm.actions.clone()))
            .actions_enabled(true)
            .metric_name(&alarm.metric_name)
            .namespace(&alarm.namespace)
            .set_dimensions(Some(to_sdk_dimensions(&alarm.dimensions)?))
            .period(PERIOD_SECONDS)
            .evaluation_periods(EVALUATION_PERIODS)
            .threshold(alarm.threshold)
            .statistic(CwStatistic::from(alarm.statistic))
            .comparison_operator(CwComparisonOperator::from(alarm.comparison_operator))
            .send()
            .await
            .map_err(aws_sdk_cloudwatch::Error::from)?;
        Ok(())
    }
}

fn to_sdk_dimensions(
    dimensions: &[Dimension],
) -> Result<Vec<CwDimension>, aws_sdk_cloudwatch::error::BuildError> {
    Ok(dimensions
        .iter()
        .map(|d| CwDimension::builder().name(&d.name).value(&d.value).build())
        .collect())
}

impl From<Statistic> for CwStatistic {
    fn from(statistic: Statistic) -> Self {
        match statistic {
            Statistic::Average => CwStatistic::Average,
            Statistic::Sum => CwStatistic::Sum,
            Statistic::Minimum => CwStatistic::Minimum,
            Statistic::Maximum => CwStatistic::Maximum,
            Statistic::SampleCount => CwStatistic::SampleCount,
        }
    }
}

impl From<ComparisonOperator> for CwComparisonOperator {
    fn from(operator: ComparisonOperator) -> Self {
        match operator {
            ComparisonOperator::GreaterThanOrEqualToThreshold => {
                CwComparisonOperator::GreaterThanOrEqualToThreshold
            }
            ComparisonOperator::GreaterThanThreshold => {
                CwComparisonOperator::GreaterThanThreshold
            }
            ComparisonOperator::LessThanThreshold => CwComparisonOperator::LessThanThreshold,
            ComparisonOperator::LessThanOrEqualToThreshold => {
                CwComparisonOperator::LessThanOrEqualToThreshold
            }
        }
    }
}
