use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{decode, empty_response, Params};
use crate::config::MockIamConfig;
use crate::error::IamResult;
use crate::repository::{generate_id, Repository, ENTITY_ID_SUFFIX_LEN, GROUP_ID_PREFIX};
use crate::types::Group;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GroupNameInput {
    group_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MembershipInput {
    group_name: String,
    user_name: String,
}

pub(super) fn create_group(
    repo: &mut Repository,
    config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: GroupNameInput = decode(params)?;
    let group = Group {
        path: config.path.clone(),
        arn: config.arn("group", &input.group_name),
        group_id: generate_id(GROUP_ID_PREFIX, ENTITY_ID_SUFFIX_LEN),
        group_name: input.group_name,
        create_date: Utc::now(),
    };
    let response = json!({ "Group": &group });
    repo.groups_mut().insert(group)?;
    Ok(response)
}

pub(super) fn get_group(
    repo: &mut Repository,
    _config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: GroupNameInput = decode(params)?;
    let group = repo.groups().get(&input.group_name)?;
    let users = repo.members_of(&input.group_name)?;
    Ok(json!({ "Group": group, "Users": users, "IsTruncated": false }))
}

pub(super) fn delete_group(
    repo: &mut Repository,
    _config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: GroupNameInput = decode(params)?;
    repo.delete_group(&input.group_name)?;
    Ok(empty_response())
}

pub(super) fn list_groups(
    repo: &mut Repository,
    _config: &MockIamConfig,
    _params: Params,
) -> IamResult<Value> {
    let groups: Vec<&Group> = repo.groups().iter().collect();
    Ok(json!({ "Groups": groups, "IsTruncated": false }))
}

pub(super) fn add_user_to_group(
    repo: &mut Repository,
    _config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: MembershipInput = decode(params)?;
    repo.add_membership(&input.user_name, &input.group_name)?;
    Ok(empty_response())
}

pub(super) fn remove_user_from_group(
    repo: &mut Repository,
    _config: &MockIamConfig,
    params: Params,
) -> IamResult<Value> {
    let input: MembershipInput = decode(params)?;
    repo.remove_membership(&input.user_name, &input.group_name)?;
    Ok(empty_response())
}
