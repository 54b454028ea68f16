//! Access key operations
//!
//! `UpdateAccessKey` and `DeleteAccessKey` accept an optional `UserName`.
//! When it is supplied the user must exist and own the key; a key owned by
//! somebody else is reported as missing.

use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{decode, empty_response, Params};
use crate::config::MockIamConfig;
use crate::error::{IamError, IamResult};
use crate::repository::{generate_secret, Repository};
use crate::types::{AccessKey, AccessKeyLastUsed, StatusType};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserNameInput {
    user_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AccessKeyIdInput {
    access_key_id: String,
    #[serde(default)]
    user_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UpdateAccessKeyInput {
    access_key_id: String,
    status: String,
    #[serde(default)]
    user_name: Option<String>,
}

/// Resolves `access_key_id`, honouring an optional owner constraint.
fn owned_key<'r>(
    repo: &'r Repository,
    access_key_id: &str,
    user_name: Option<&str>,
) -> IamResult<&'r AccessKey> {
    if let Some(user_name) = user_name {
        repo.users().get(user_name)?;
    }
    let key = repo.access_keys().get(access_key_id)?;
    match user_name {
        Some(owner) if owner != key.user_name => {
            Err(IamError::NoSuchAccessKey(access_key_id.to_string()))
        }
        _ => Ok(key),
    }
}

pub(super) fn create_access_key(
    repo: &mut Repository,
    _config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: UserNameInput = decode(params)?;
    repo.users().get(&input.user_name)?;

    let key = AccessKey {
        access_key_id: repo.unique_access_key_id(),
        user_name: input.user_name,
        status: StatusType::Active,
        create_date: Utc::now(),
        secret_access_key: generate_secret(),
        last_used: None,
    };
    let response = json!({
        "AccessKey": {
            "UserName": &key.user_name,
            "AccessKeyId": &key.access_key_id,
            "Status": key.status,
            "SecretAccessKey": &key.secret_access_key,
            "CreateDate": key.create_date,
        }
    });
    repo.access_keys_mut().insert(key)?;
    Ok(response)
}

pub(super) fn delete_access_key(
    repo: &mut Repository,
    _config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: AccessKeyIdInput = decode(params)?;
    owned_key(repo, &input.access_key_id, input.user_name.as_deref())?;
    repo.access_keys_mut().remove(&input.access_key_id)?;
    Ok(empty_response())
}

pub(super) fn list_access_keys(
    repo: &mut Repository,
    _config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: UserNameInput = decode(params)?;
    let keys = repo.access_keys_for(&input.user_name)?;
    Ok(json!({ "AccessKeyMetadata": keys, "IsTruncated": false }))
}

pub(super) fn update_access_key(
    repo: &mut Repository,
    _config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: UpdateAccessKeyInput = decode(params)?;
    let status: StatusType = input.status.parse()?;
    owned_key(repo, &input.access_key_id, input.user_name.as_deref())?;
    repo.access_keys_mut().get_mut(&input.access_key_id)?.status = status;
    Ok(empty_response())
}

/// Last-used data is filled in on the first query and stays fixed after.
pub(super) fn get_access_key_last_used(
    repo: &mut Repository,
    config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: AccessKeyIdInput = decode(params)?;
    let key = repo.access_keys_mut().get_mut(&input.access_key_id)?;
    let last_used = key
        .last_used
        .get_or_insert_with(|| AccessKeyLastUsed {
            last_used_date: Utc::now(),
            service_name: config.service_name.clone(),
            region: config.region.clone(),
        })
        .clone();
    Ok(json!({ "UserName": &key.user_name, "AccessKeyLastUsed": last_used }))
}
