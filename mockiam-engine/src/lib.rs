//! This crate simulates the AWS IAM control plane in-process so client code
//! can exercise IAM calls in tests without a real account:
//! - Entity repository for users, groups, access keys, login profiles and
//!   group memberships, with referential-integrity checks
//! - One handler per supported operation, routed by operation name
//! - Errors whose code and text match what the real SDK reports
//! - A scoped redirection of an [`IamClient`] to a fresh simulator
//!
//! ```
//! use mockiam_engine::{with_mock_iam, IamClient, MockIam};
//! use std::sync::Arc;
//!
//! let client = IamClient::new(Arc::new(MockIam::new()));
//! with_mock_iam(&client, |client| {
//!     client.create_user("John").unwrap();
//!     let err = client.create_user("John").unwrap_err();
//!     assert_eq!(
//!         err.to_string(),
//!         "An error occurred (EntityAlreadyExists) when calling the CreateUser operation: User with name John already exists."
//!     );
//! });
//! ```

mod client;
mod config;
mod dispatch;
mod error;
mod operations;
mod repository;
mod types;

pub use client::{with_mock_iam, IamClient, MockScope, OperationExecutor};
pub use config::MockIamConfig;
pub use dispatch::MockIam;
pub use error::{ClientError, ErrorCode, IamError, IamResult};
pub use operations::Params;
pub use types::{AccessKey, AccessKeyLastUsed, Group, LoginProfile, StatusType, User};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_group_round_trip() {
        let mock = MockIam::new();
        let params = |value: serde_json::Value| match value {
            serde_json::Value::Object(map) => map,
            _ => Params::new(),
        };

        mock.make_api_call("CreateUser", params(json!({"UserName": "John"})))
            .unwrap();
        mock.make_api_call("CreateGroup", params(json!({"GroupName": "Admins"})))
            .unwrap();
        mock.make_api_call(
            "AddUserToGroup",
            params(json!({"GroupName": "Admins", "UserName": "John"})),
        )
        .unwrap();

        let groups = mock
            .make_api_call("ListGroupsForUser", params(json!({"UserName": "John"})))
            .unwrap();
        assert_eq!(groups["Groups"][0]["GroupName"], "Admins");
    }
}
