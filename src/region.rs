//! AWS region discovery: CLI value when given, otherwise the EC2 instance
//! metadata service.

use reqwest_middleware::ClientWithMiddleware;
use thiserror::Error;

/// Instance-metadata endpoint exposing this instance's availability zone.
const AVAILABILITY_ZONE_URL: &str =
    "http://169.254.169.254/latest/meta-data/placement/availability-zone/";

/// Errors that can occur during region discovery.
#[derive(Debug, Error)]
pub enum RegionError {
    /// Error while querying the instance metadata service.
    #[error("Failed to query instance metadata: {0}")]
    Metadata(#[from] reqwest_middleware::Error),

    /// The metadata service answered with a non-success status.
    #[error("Instance metadata request failed: HTTP status {0}")]
    MetadataFailed(reqwest::StatusCode),

    /// The availability zone did not contain a region.
    #[error("Could not derive region from availability zone {0:?}")]
    InvalidAvailabilityZone(String),
}

/// Resolves the region to use for the run.
///
/// A CLI-supplied region wins; otherwise the instance's availability zone is
/// fetched from the metadata service and the zone letter stripped.
pub async fn resolve_region(
    cli_region: Option<String>,
    http_client: &ClientWithMiddleware,
) -> Result<String, RegionError> {
    if let Some(region) = cli_region {
        return Ok(region);
    }

    tracing::debug!(url = AVAILABILITY_ZONE_URL, "Looking up region via instance metadata");
    let response = http_client.get(AVAILABILITY_ZONE_URL).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(RegionError::MetadataFailed(status));
    }
    let zone = response.text().await.map_err(reqwest_middleware::Error::from)?;
    region_from_availability_zone(zone.trim())
}

/// Strips the trailing zone letter from an availability zone, e.g.
/// `eu-west-1a` becomes `eu-west-1`.
fn region_from_availability_zone(zone: &str) -> Result<String, RegionError> {
    let region = zone.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    if region.is_empty() || region == zone {
        return Err(RegionError::InvalidAvailabilityZone(zone.to_string()));
    }
    Ok(region.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{create_retryable_http_client, HttpRetryConfig};

    #[test]
    fn test_strips_zone_letter() {
        assert_eq!(region_from_availability_zone("eu-west-1a").unwrap(), "eu-west-1");
        assert_eq!(region_from_availability_zone("us-east-2c").unwrap(), "us-east-2");
    }

    #[test]
    fn test_rejects_zone_without_region() {
        assert!(matches!(
            region_from_availability_zone("abc").unwrap_err(),
            RegionError::InvalidAvailabilityZone(_)
        ));
        assert!(matches!(
            region_from_availability_zone("eu-west-1").unwrap_err(),
            RegionError::InvalidAvailabilityZone(_)
        ));
    }

    #[tokio::test]
    async fn test_cli_region_wins_without_metadata_call() {
        let client = create_retryable_http_client(&HttpRetryConfig::default()).unwrap();
        let region = resolve_region(Some("eu-west-1".into()), &client).await.unwrap();
        assert_eq!(region, "eu-west-1");
    }
}
