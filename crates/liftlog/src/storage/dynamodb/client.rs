//! AWS SDK client setup.

use aws_sdk_dynamodb::Client;

/// AWS client configuration.
#[derive(Debug, Clone)]
pub struct AwsConfig {
    /// Custom endpoint URL (for local DynamoDB).
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: String,
}

impl AwsConfig {
    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({url})"),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

/// Creates a DynamoDB client with the given configuration.
///
/// Credentials come from the SDK's default provider chain.
pub async fn create_client(config: &AwsConfig) -> Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;
    Client::new(&sdk_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_display() {
        let local = AwsConfig {
            endpoint_url: Some("http://localhost:8000".to_string()),
            region: "us-east-1".to_string(),
        };
        let remote = AwsConfig {
            endpoint_url: None,
            region: "eu-west-1".to_string(),
        };

        assert_eq!(local.target_display(), "Local DynamoDB (http://localhost:8000)");
        assert_eq!(remote.target_display(), "AWS DynamoDB (region: eu-west-1)");
    }
}
