//! Dispatch engine
//!
//! [`MockIam`] owns the repository for one mocking session and routes an
//! operation name to its handler. The repository sits behind a single
//! mutex, so each call validates and mutates without any other call
//! observing a half-applied change.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::client::OperationExecutor;
use crate::config::MockIamConfig;
use crate::error::{ClientError, IamError};
use crate::operations::{Handler, Params, HANDLERS};
use crate::repository::Repository;

fn registry() -> &'static HashMap<&'static str, Handler> {
    static REGISTRY: OnceLock<HashMap<&'static str, Handler>> = OnceLock::new();
    REGISTRY.get_or_init(|| HANDLERS.iter().copied().collect())
}

/// In-memory IAM service for one mocking session.
#[derive(Debug, Default)]
pub struct MockIam {
    config: MockIamConfig,
    repository: Mutex<Repository>,
}

impl MockIam {
    /// A simulator with the default account settings and an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MockIamConfig) -> Self {
        Self {
            config,
            repository: Mutex::new(Repository::new()),
        }
    }

    pub fn config(&self) -> &MockIamConfig {
        &self.config
    }

    /// Run `operation_name` against the repository.
    ///
    /// # Errors
    ///
    /// `NoSuchMethod` when the operation has no handler; otherwise whatever
    /// the handler raises, tagged with `operation_name`.
    pub fn make_api_call(&self, operation_name: &str, params: Params) -> Result<Value, ClientError> {
        let Some(handler) = registry().get(operation_name) else {
            log::warn!("Operation {} is not mocked", operation_name);
            return Err(ClientError::new(operation_name, IamError::OperationNotMocked));
        };

        log::debug!("Dispatching {} with {} parameter(s)", operation_name, params.len());
        let mut repository = self.repository.lock();
        handler(&mut *repository, &self.config, params).map_err(|kind| {
            let err = ClientError::new(operation_name, kind);
            log::debug!("{}", err);
            err
        })
    }

    pub fn is_mocked(operation_name: &str) -> bool {
        registry().contains_key(operation_name)
    }

    /// Names of every mocked operation, in registration order.
    pub fn operation_names() -> impl Iterator<Item = &'static str> {
        HANDLERS.iter().map(|(name, _)| *name)
    }

    #[cfg(test)]
    pub(crate) fn inspect<R>(&self, f: impl FnOnce(&Repository) -> R) -> R {
        f(&*self.repository.lock())
    }

    /// Drop every entity, as if the session had just started.
    pub fn reset(&self) {
        log::info!("Resetting simulated IAM state");
        self.repository.lock().reset();
    }
}

impl OperationExecutor for MockIam {
    fn execute(&self, operation_name: &str, params: Params) -> Result<Value, ClientError> {
        self.make_api_call(operation_name, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    fn params(value: Value) -> Params {
        crate::operations::test_support::params(value)
    }

    #[test]
    fn test_unmocked_operation() {
        let mock = MockIam::new();
        let err = mock
            .make_api_call("CreateGecko", params(json!({"Name": "gecko"})))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NoSuchMethod);
        assert_eq!(
            err.to_string(),
            "An error occurred (NoSuchMethod) when calling the CreateGecko operation: Operation not mocked."
        );
    }

    #[test]
    fn test_operation_name_is_case_sensitive() {
        let mock = MockIam::new();
        assert!(MockIam::is_mocked("CreateUser"));
        assert!(!MockIam::is_mocked("createUser"));
        let err = mock
            .make_api_call("createUser", params(json!({"UserName": "John"})))
            .unwrap_err();
        assert_eq!(err.operation_name(), "createUser");
        mock.inspect(|repo| assert!(repo.is_empty()));
    }

    #[test]
    fn test_errors_carry_dispatched_operation_name() {
        let mock = MockIam::new();
        let err = mock
            .make_api_call("GetUser", params(json!({"UserName": "John"})))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "An error occurred (NoSuchEntity) when calling the GetUser operation: The user with name John cannot be found."
        );
    }

    #[test]
    fn test_every_registered_operation_is_mocked() {
        assert!(MockIam::operation_names().all(MockIam::is_mocked));
        assert_eq!(MockIam::operation_names().count(), registry().len());
    }

    #[test]
    fn test_custom_config_reaches_handlers() {
        let mock = MockIam::with_config(MockIamConfig::default().with_region("eu-west-1"));
        mock.make_api_call("CreateUser", params(json!({"UserName": "John"})))
            .unwrap();
        let key_id = mock
            .make_api_call("CreateAccessKey", params(json!({"UserName": "John"})))
            .unwrap()["AccessKey"]["AccessKeyId"]
            .clone();
        let last_used = mock
            .make_api_call("GetAccessKeyLastUsed", params(json!({"AccessKeyId": key_id})))
            .unwrap();
        assert_eq!(last_used["AccessKeyLastUsed"]["Region"], "eu-west-1");
        assert_eq!(mock.config().region, "eu-west-1");
    }

    #[test]
    fn test_reset() {
        let mock = MockIam::new();
        mock.make_api_call("CreateGroup", params(json!({"GroupName": "Admins"})))
            .unwrap();
        mock.inspect(|repo| assert_eq!(repo.groups().len(), 1));
        mock.reset();
        mock.inspect(|repo| assert!(repo.is_empty()));
    }

    #[test]
    fn test_concurrent_creates_admit_one_user() {
        const THREADS: usize = 8;
        let mock = MockIam::new();

        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    s.spawn(|| mock.make_api_call("CreateUser", params(json!({"UserName": "John"}))))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let created = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(created, 1);
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert_eq!(err.code(), ErrorCode::EntityAlreadyExists);
            assert_eq!(err.message(), "User with name John already exists.");
        }
        mock.inspect(|repo| assert_eq!(repo.users().len(), 1));
    }

    #[test]
    fn test_executor_trait() {
        let mock = MockIam::new();
        let executor: &dyn OperationExecutor = &mock;
        let response = executor
            .execute("CreateUser", params(json!({"UserName": "John"})))
            .unwrap();
        assert_eq!(response["User"]["UserName"], "John");
    }
}
