//! Simulated account settings

use serde::{Deserialize, Serialize};

pub const DEFAULT_ACCOUNT_ID: &str = "123456789012";
pub const DEFAULT_REGION: &str = "us-west-1";
pub const DEFAULT_SERVICE_NAME: &str = "iam";
pub const DEFAULT_PATH: &str = "/";

const ACCOUNT_ID_ENV: &str = "MOCKIAM_ACCOUNT_ID";
const REGION_ENV: &str = "MOCKIAM_REGION";
const SERVICE_NAME_ENV: &str = "MOCKIAM_SERVICE_NAME";

/// Settings of the single simulated account.
///
/// `region` and `service_name` are what `GetAccessKeyLastUsed` reports;
/// `account_id` and `path` are baked into generated ARNs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct MockIamConfig {
    pub account_id: String,
    pub region: String,
    pub service_name: String,
    pub path: String,
}

impl Default for MockIamConfig {
    fn default() -> Self {
        Self {
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
            region: DEFAULT_REGION.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            path: DEFAULT_PATH.to_string(),
        }
    }
}

impl MockIamConfig {
    /// Defaults overlaid with `MOCKIAM_ACCOUNT_ID`, `MOCKIAM_REGION` and
    /// `MOCKIAM_SERVICE_NAME` when set and non-empty.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(account_id) = read_env(ACCOUNT_ID_ENV) {
            config.account_id = account_id;
        }
        if let Some(region) = read_env(REGION_ENV) {
            config.region = region;
        }
        if let Some(service_name) = read_env(SERVICE_NAME_ENV) {
            config.service_name = service_name;
        }
        log::debug!("Loaded simulator config: {:?}", config);
        config
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    /// ARN for an entity of `resource_type` ("user", "group") named `name`.
    pub(crate) fn arn(&self, resource_type: &str, name: &str) -> String {
        format!(
            "arn:aws:iam::{}:{}{}{}",
            self.account_id, resource_type, self.path, name
        )
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = MockIamConfig::default();
        assert_eq!(config.account_id, "123456789012");
        assert_eq!(config.region, "us-west-1");
        assert_eq!(config.service_name, "iam");
        assert_eq!(config.arn("user", "John"), "arn:aws:iam::123456789012:user/John");
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: MockIamConfig = serde_json::from_str(r#"{"region": "eu-west-1"}"#).unwrap();
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.service_name, "iam");
        assert_eq!(config.path, "/");
    }

    #[test]
    fn test_builder_overrides() {
        let config = MockIamConfig::default()
            .with_account_id("210987654321")
            .with_region("eu-central-1")
            .with_service_name("sts");
        assert_eq!(config.arn("group", "Admins"), "arn:aws:iam::210987654321:group/Admins");
        assert_eq!(config.region, "eu-central-1");
        assert_eq!(config.service_name, "sts");
    }

    #[test]
    #[serial]
    fn test_from_env_overlay() {
        std::env::set_var(REGION_ENV, "ap-south-1");
        std::env::set_var(ACCOUNT_ID_ENV, "  ");
        let config = MockIamConfig::from_env();
        std::env::remove_var(REGION_ENV);
        std::env::remove_var(ACCOUNT_ID_ENV);

        assert_eq!(config.region, "ap-south-1");
        assert_eq!(config.account_id, DEFAULT_ACCOUNT_ID);
        assert_eq!(config.service_name, DEFAULT_SERVICE_NAME);
    }

    #[test]
    #[serial]
    fn test_from_env_without_variables() {
        std::env::remove_var(ACCOUNT_ID_ENV);
        std::env::remove_var(REGION_ENV);
        std::env::remove_var(SERVICE_NAME_ENV);
        assert_eq!(MockIamConfig::from_env(), MockIamConfig::default());
    }
}
