//! Integration tests for the full load-resolve-upsert pipeline.

use std::{
    fs::File,
    io::Write,
    sync::{Arc, Mutex},
};

use alarm_reconciler::{
    context::RunContext,
    http_client::{create_retryable_http_client, HttpRetryConfig},
    loader::{ConfigLoader, ConfigSource},
    models::ResolvedAlarm,
    provider::{AlarmProvider, ProviderError},
    reconciler::Reconciler,
};
use async_trait::async_trait;
use tempfile::TempDir;

/// Records every upsert it receives; fails entries whose alarm name contains
/// any of the configured markers.
#[derive(Clone, Default)]
struct RecordingProvider {
    calls: Arc<Mutex<Vec<ResolvedAlarm>>>,
    fail_markers: Vec<String>,
}

#[async_trait]
impl AlarmProvider for RecordingProvider {
    async fn put_alarm(&self, alarm: &ResolvedAlarm) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push(alarm.clone());
        if self.fail_markers.iter().any(|m| alarm.name.contains(m)) {
            // The one provider error constructible without an AWS response.
            return Err(ProviderError::Build(
                aws_sdk_cloudwatch::error::BuildError::missing_field(
                    "name",
                    "name was not specified but it is required when building Dimension",
                ),
            ));
        }
        Ok(())
    }
}

const CONFIG: &str = r#"
cpu-high:
  MetricName: CPUUtilization
  Namespace: AWS/EC2
  AlarmDescription: High CPU
  AlarmActions:
    - arn:aws:sns:eu-west-1:123456789012:ops
  Threshold: 80
  Statistic: Average
  ComparisonOperator: GreaterThanThreshold
  Dimensions:
    - Name: InstanceId
      Value: i-1234
disk-reads:
  MetricName: DiskReadOps
  AlarmDescription: Disk read spike
  Threshold: 1000
  Statistic: Sum
  ComparisonOperator: GreaterThanOrEqualToThreshold
  Dimensions:
    - Name: InstanceId
      Value: i-1234
"#;

fn write_config(dir: &TempDir) -> ConfigSource {
    let path = dir.path().join("alarms.yml");
    let mut file = File::create(&path).unwrap();
    write!(file, "{}", CONFIG).unwrap();
    ConfigSource::File(path)
}

async fn load_entries(source: ConfigSource) -> Vec<(String, alarm_reconciler::models::AlarmSpec)> {
    let client = create_retryable_http_client(&HttpRetryConfig::default()).unwrap();
    ConfigLoader::new(source, client).load().await.unwrap()
}

fn context() -> RunContext {
    RunContext {
        alarm_prefix: "com.ft.up.test".into(),
        namespace: None,
        topic: None,
        region: "eu-west-1".into(),
    }
}

#[tokio::test]
async fn test_reconciles_all_entries_in_document_order() {
    let dir = TempDir::new().unwrap();
    let entries = load_entries(write_config(&dir)).await;

    let provider = RecordingProvider::default();
    let calls = Arc::clone(&provider.calls);
    let ctx = RunContext { namespace: Some("com.ft.override".into()), ..context() };
    let report = Reconciler::new(provider).run(&ctx, &entries).await.unwrap();

    assert!(report.all_succeeded());

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].name, "com.ft.up.test.CPUUtilization.i-1234");
    assert_eq!(calls[1].name, "com.ft.up.test.DiskReadOps.i-1234");
    // CLI namespace override applies to every entry, including those with
    // their own Namespace key.
    assert!(calls.iter().all(|c| c.namespace == "com.ft.override"));
    // Entry without AlarmActions gets the inert fallback topic.
    assert_eq!(calls[1].actions, vec!["arn:aws:sns:eu-west-1:000000000000:no-op".to_string()]);
}

#[tokio::test]
async fn test_topic_override_replaces_all_action_lists() {
    let dir = TempDir::new().unwrap();
    let entries = load_entries(write_config(&dir)).await;

    let provider = RecordingProvider::default();
    let calls = Arc::clone(&provider.calls);
    let topic = "arn:aws:sns:eu-west-1:027104099916:SemanticMetadata";
    let ctx = RunContext { topic: Some(topic.into()), ..context() };
    let report = Reconciler::new(provider).run(&ctx, &entries).await.unwrap();

    assert!(report.all_succeeded());
    let calls = calls.lock().unwrap();
    assert!(calls.iter().all(|c| c.actions == vec![topic.to_string()]));
}

#[tokio::test]
async fn test_failed_entry_is_reported_and_batch_continues() {
    let dir = TempDir::new().unwrap();
    let entries = load_entries(write_config(&dir)).await;

    let provider = RecordingProvider {
        fail_markers: vec!["CPUUtilization".into()],
        ..Default::default()
    };
    let calls = Arc::clone(&provider.calls);
    let report = Reconciler::new(provider).run(&context(), &entries).await.unwrap();

    // The second entry was still attempted after the first failed.
    assert_eq!(calls.lock().unwrap().len(), 2);
    assert!(!report.all_succeeded());
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.outcomes[0].entry, "cpu-high");
    assert!(!report.outcomes[0].succeeded());
    assert!(report.outcomes[1].succeeded());
}
