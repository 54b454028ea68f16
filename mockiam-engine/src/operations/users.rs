use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{decode, empty_response, Params};
use crate::config::MockIamConfig;
use crate::error::IamResult;
use crate::repository::{generate_id, Repository, ENTITY_ID_SUFFIX_LEN, USER_ID_PREFIX};
use crate::types::User;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserNameInput {
    user_name: String,
}

pub(super) fn create_user(
    repo: &mut Repository,
    config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: UserNameInput = decode(params)?;
    let user = User {
        path: config.path.clone(),
        arn: config.arn("user", &input.user_name),
        user_id: generate_id(USER_ID_PREFIX, ENTITY_ID_SUFFIX_LEN),
        user_name: input.user_name,
        create_date: Utc::now(),
    };
    let response = json!({ "User": &user });
    repo.users_mut().insert(user)?;
    Ok(response)
}

pub(super) fn get_user(
    repo: &mut Repository,
    _config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: UserNameInput = decode(params)?;
    let user = repo.users().get(&input.user_name)?;
    Ok(json!({ "User": user }))
}

pub(super) fn delete_user(
    repo: &mut Repository,
    _config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: UserNameInput = decode(params)?;
    repo.delete_user(&input.user_name)?;
    Ok(empty_response())
}

pub(super) fn list_users(
    repo: &mut Repository,
    _config: &MockIamConfig,
    _params: Params,
) -> IamResult<Value> {
    let users: Vec<&User> = repo.users().iter().collect();
    Ok(json!({ "Users": users, "IsTruncated": false }))
}

pub(super) fn list_groups_for_user(
    repo: &mut Repository,
    _config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: UserNameInput = decode(params)?;
    let groups = repo.groups_for_user(&input.user_name)?;
    Ok(json!({ "Groups": groups, "IsTruncated": false }))
}
