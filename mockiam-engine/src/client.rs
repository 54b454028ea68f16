//! SDK-style IAM client and the mocking scope
//!
//! [`IamClient`] never talks to a service directly: every call goes through
//! an [`OperationExecutor`]. The client owns a base executor supplied by
//! the caller and a stack of active scopes. [`IamClient::mock_iam`] pushes
//! a fresh [`MockIam`] and hands back a [`MockScope`] guard. Dropping the
//! guard, including during a panic, removes that scope's entry wherever it
//! sits; calls go to the newest remaining scope, or to the base executor
//! once none is left.

use convert_case::{Case, Casing};
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::MockIamConfig;
use crate::dispatch::MockIam;
use crate::error::ClientError;
use crate::operations::Params;
use crate::types::StatusType;

/// Anything that can answer an IAM operation call.
pub trait OperationExecutor: Send + Sync {
    fn execute(&self, operation_name: &str, params: Params) -> Result<Value, ClientError>;
}

fn params<const N: usize>(pairs: [(&str, Value); N]) -> Params {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

pub struct IamClient {
    base: Arc<dyn OperationExecutor>,
    scopes: RwLock<Vec<(u64, Arc<dyn OperationExecutor>)>>,
    next_scope_id: AtomicU64,
}

impl fmt::Debug for IamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamClient")
            .field("mocked", &self.is_mocked())
            .finish_non_exhaustive()
    }
}

impl IamClient {
    pub fn new(base: Arc<dyn OperationExecutor>) -> Self {
        Self {
            base,
            scopes: RwLock::new(Vec::new()),
            next_scope_id: AtomicU64::new(0),
        }
    }

    /// True while a [`MockScope`] is redirecting this client.
    pub fn is_mocked(&self) -> bool {
        !self.scopes.read().is_empty()
    }

    fn executor(&self) -> Arc<dyn OperationExecutor> {
        self.scopes
            .read()
            .last()
            .map_or_else(|| Arc::clone(&self.base), |(_, executor)| Arc::clone(executor))
    }

    /// Send `operation_name` with `params` to the current executor.
    pub fn call(&self, operation_name: &str, params: Params) -> Result<Value, ClientError> {
        self.executor().execute(operation_name, params)
    }

    /// Call an operation by its SDK method name, e.g. `create_user`.
    pub fn invoke(&self, method_name: &str, params: Params) -> Result<Value, ClientError> {
        self.call(&method_name.to_case(Case::Pascal), params)
    }

    /// Redirect this client to an empty simulator until the guard drops.
    pub fn mock_iam(&self) -> MockScope<'_> {
        self.mock_iam_with_config(MockIamConfig::default())
    }

    pub fn mock_iam_with_config(&self, config: MockIamConfig) -> MockScope<'_> {
        let mock = Arc::new(MockIam::with_config(config));
        let installed: Arc<dyn OperationExecutor> = mock.clone();
        let id = self.next_scope_id.fetch_add(1, Ordering::Relaxed);
        self.scopes.write().push((id, installed));
        log::debug!("Entered IAM mock scope {}", id);
        MockScope {
            client: self,
            mock,
            id,
        }
    }

    pub fn create_user(&self, user_name: &str) -> Result<Value, ClientError> {
        self.call("CreateUser", params([("UserName", json!(user_name))]))
    }

    pub fn get_user(&self, user_name: &str) -> Result<Value, ClientError> {
        self.call("GetUser", params([("UserName", json!(user_name))]))
    }

    pub fn delete_user(&self, user_name: &str) -> Result<Value, ClientError> {
        self.call("DeleteUser", params([("UserName", json!(user_name))]))
    }

    pub fn list_users(&self) -> Result<Value, ClientError> {
        self.call("ListUsers", Params::new())
    }

    pub fn create_group(&self, group_name: &str) -> Result<Value, ClientError> {
        self.call("CreateGroup", params([("GroupName", json!(group_name))]))
    }

    pub fn get_group(&self, group_name: &str) -> Result<Value, ClientError> {
        self.call("GetGroup", params([("GroupName", json!(group_name))]))
    }

    pub fn delete_group(&self, group_name: &str) -> Result<Value, ClientError> {
        self.call("DeleteGroup", params([("GroupName", json!(group_name))]))
    }

    pub fn list_groups(&self) -> Result<Value, ClientError> {
        self.call("ListGroups", Params::new())
    }

    pub fn add_user_to_group(&self, group_name: &str, user_name: &str) -> Result<Value, ClientError> {
        self.call(
            "AddUserToGroup",
            params([("GroupName", json!(group_name)), ("UserName", json!(user_name))]),
        )
    }

    pub fn remove_user_from_group(
        &self,
        group_name: &str,
        user_name: &str,
    ) -> Result<Value, ClientError> {
        self.call(
            "RemoveUserFromGroup",
            params([("GroupName", json!(group_name)), ("UserName", json!(user_name))]),
        )
    }

    pub fn list_groups_for_user(&self, user_name: &str) -> Result<Value, ClientError> {
        self.call("ListGroupsForUser", params([("UserName", json!(user_name))]))
    }

    pub fn create_access_key(&self, user_name: &str) -> Result<Value, ClientError> {
        self.call("CreateAccessKey", params([("UserName", json!(user_name))]))
    }

    pub fn delete_access_key(&self, access_key_id: &str) -> Result<Value, ClientError> {
        self.call("DeleteAccessKey", params([("AccessKeyId", json!(access_key_id))]))
    }

    pub fn list_access_keys(&self, user_name: &str) -> Result<Value, ClientError> {
        self.call("ListAccessKeys", params([("UserName", json!(user_name))]))
    }

    pub fn update_access_key(
        &self,
        access_key_id: &str,
        status: StatusType,
    ) -> Result<Value, ClientError> {
        self.call(
            "UpdateAccessKey",
            params([
                ("AccessKeyId", json!(access_key_id)),
                ("Status", json!(status.to_string())),
            ]),
        )
    }

    pub fn get_access_key_last_used(&self, access_key_id: &str) -> Result<Value, ClientError> {
        self.call(
            "GetAccessKeyLastUsed",
            params([("AccessKeyId", json!(access_key_id))]),
        )
    }

    pub fn create_login_profile(
        &self,
        user_name: &str,
        password: &str,
        password_reset_required: bool,
    ) -> Result<Value, ClientError> {
        self.call(
            "CreateLoginProfile",
            params([
                ("UserName", json!(user_name)),
                ("Password", json!(password)),
                ("PasswordResetRequired", json!(password_reset_required)),
            ]),
        )
    }

    pub fn get_login_profile(&self, user_name: &str) -> Result<Value, ClientError> {
        self.call("GetLoginProfile", params([("UserName", json!(user_name))]))
    }

    /// Only the supplied fields change.
    pub fn update_login_profile(
        &self,
        user_name: &str,
        password: Option<&str>,
        password_reset_required: Option<bool>,
    ) -> Result<Value, ClientError> {
        let mut request = params([("UserName", json!(user_name))]);
        if let Some(password) = password {
            request.insert("Password".to_string(), json!(password));
        }
        if let Some(reset_required) = password_reset_required {
            request.insert("PasswordResetRequired".to_string(), json!(reset_required));
        }
        self.call("UpdateLoginProfile", request)
    }

    pub fn delete_login_profile(&self, user_name: &str) -> Result<Value, ClientError> {
        self.call("DeleteLoginProfile", params([("UserName", json!(user_name))]))
    }
}

/// Guard for one mocking session on an [`IamClient`].
///
/// Scopes nest and may be dropped in any order. The newest live scope
/// serves calls; the client is unmocked once every scope is gone.
pub struct MockScope<'c> {
    client: &'c IamClient,
    mock: Arc<MockIam>,
    id: u64,
}

impl MockScope<'_> {
    /// The simulator serving this scope.
    pub fn mock(&self) -> &MockIam {
        &self.mock
    }
}

impl Drop for MockScope<'_> {
    fn drop(&mut self) {
        self.client.scopes.write().retain(|(id, _)| *id != self.id);
        log::debug!("Left IAM mock scope {}", self.id);
    }
}

/// Run `body` with `client` redirected to a fresh simulator.
pub fn with_mock_iam<R>(client: &IamClient, body: impl FnOnce(&IamClient) -> R) -> R {
    let _scope = client.mock_iam();
    body(client)
}
