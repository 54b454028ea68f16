//! Login profile operations
//!
//! Every operation checks the owning user before the profile itself.

use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{decode, empty_response, Params};
use crate::config::MockIamConfig;
use crate::error::IamResult;
use crate::repository::Repository;
use crate::types::LoginProfile;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserNameInput {
    user_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateLoginProfileInput {
    user_name: String,
    password: String,
    #[serde(default)]
    password_reset_required: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UpdateLoginProfileInput {
    user_name: String,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    password_reset_required: Option<bool>,
}

pub(super) fn create_login_profile(
    repo: &mut Repository,
    _config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: CreateLoginProfileInput = decode(params)?;
    repo.users().get(&input.user_name)?;

    let profile = LoginProfile {
        user_name: input.user_name,
        create_date: Utc::now(),
        password_reset_required: input.password_reset_required,
        password: input.password,
    };
    let response = json!({ "LoginProfile": &profile });
    repo.login_profiles_mut().insert(profile)?;
    Ok(response)
}

pub(super) fn get_login_profile(
    repo: &mut Repository,
    _config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: UserNameInput = decode(params)?;
    repo.users().get(&input.user_name)?;
    let profile = repo.login_profiles().get(&input.user_name)?;
    Ok(json!({ "LoginProfile": profile }))
}

pub(super) fn update_login_profile(
    repo: &mut Repository,
    _config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: UpdateLoginProfileInput = decode(params)?;
    repo.users().get(&input.user_name)?;
    let profile = repo.login_profiles_mut().get_mut(&input.user_name)?;
    if let Some(password) = input.password {
        profile.password = password;
    }
    if let Some(reset_required) = input.password_reset_required {
        profile.password_reset_required = reset_required;
    }
    Ok(empty_response())
}

pub(super) fn delete_login_profile(
    repo: &mut Repository,
    _config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: UserNameInput = decode(params)?;
    repo.users().get(&input.user_name)?;
    repo.login_profiles_mut().remove(&input.user_name)?;
    Ok(empty_response())
}
