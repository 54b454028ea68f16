//! Operation handlers
//!
//! One function per simulated IAM operation. Every handler has the same
//! shape: it decodes its typed input from the parameter mapping, validates
//! preconditions against the [`Repository`], and only then mutates it and
//! builds the response. A handler that returns an error has not touched
//! the repository.

mod access_keys;
mod groups;
mod login_profiles;
mod users;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::MockIamConfig;
use crate::error::{IamError, IamResult};
use crate::repository::Repository;

/// Request parameters keyed by the real API field names.
pub type Params = Map<String, Value>;

/// Uniform handler signature used by the dispatch table.
pub(crate) type Handler = fn(&mut Repository, &MockIamConfig, Params) -> IamResult<Value>;

/// Operation names and their handlers, in the order they are registered.
pub(crate) const HANDLERS: &[(&str, Handler)] = &[
    ("CreateUser", users::create_user),
    ("GetUser", users::get_user),
    ("DeleteUser", users::delete_user),
    ("ListUsers", users::list_users),
    ("ListGroupsForUser", users::list_groups_for_user),
    ("CreateGroup", groups::create_group),
    ("GetGroup", groups::get_group),
    ("DeleteGroup", groups::delete_group),
    ("ListGroups", groups::list_groups),
    ("AddUserToGroup", groups::add_user_to_group),
    ("RemoveUserFromGroup", groups::remove_user_from_group),
    ("CreateAccessKey", access_keys::create_access_key),
    ("DeleteAccessKey", access_keys::delete_access_key),
    ("ListAccessKeys", access_keys::list_access_keys),
    ("UpdateAccessKey", access_keys::update_access_key),
    ("GetAccessKeyLastUsed", access_keys::get_access_key_last_used),
    ("CreateLoginProfile", login_profiles::create_login_profile),
    ("GetLoginProfile", login_profiles::get_login_profile),
    ("UpdateLoginProfile", login_profiles::update_login_profile),
    ("DeleteLoginProfile", login_profiles::delete_login_profile),
];

/// Decode a handler input; unknown keys are ignored.
pub(crate) fn decode<T: DeserializeOwned>(params: Params) -> IamResult<T> {
    serde_json::from_value(Value::Object(params))
        .map_err(|e| IamError::validation(e.to_string()))
}

/// Response body for operations that return nothing but metadata.
pub(crate) fn empty_response() -> Value {
    Value::Object(Map::new())
}
