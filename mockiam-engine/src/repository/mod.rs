//! In-memory IAM state for one mocking scope
//!
//! The repository owns one [`EntityStore`] per entity type plus the
//! user/group membership relation. Relation operations check that both
//! sides exist, user first, before touching anything, so a failed call
//! never leaves a partial mutation behind.

mod ids;
mod store;

pub use ids::{generate_id, ACCESS_KEY_ID_PREFIX, GROUP_ID_PREFIX, USER_ID_PREFIX};
pub(crate) use ids::{generate_secret, ENTITY_ID_SUFFIX_LEN};
pub use store::{Entity, EntityStore};

use crate::error::{IamError, IamResult};
use crate::types::{AccessKey, Group, LoginProfile, User};

/// One user-in-group edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub user_name: String,
    pub group_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct Repository {
    users: EntityStore<User>,
    groups: EntityStore<Group>,
    access_keys: EntityStore<AccessKey>,
    login_profiles: EntityStore<LoginProfile>,
    memberships: Vec<Membership>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &EntityStore<User> {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut EntityStore<User> {
        &mut self.users
    }

    pub fn groups(&self) -> &EntityStore<Group> {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut EntityStore<Group> {
        &mut self.groups
    }

    pub fn access_keys(&self) -> &EntityStore<AccessKey> {
        &self.access_keys
    }

    pub fn access_keys_mut(&mut self) -> &mut EntityStore<AccessKey> {
        &mut self.access_keys
    }

    pub fn login_profiles(&self) -> &EntityStore<LoginProfile> {
        &self.login_profiles
    }

    pub fn login_profiles_mut(&mut self) -> &mut EntityStore<LoginProfile> {
        &mut self.login_profiles
    }

    /// Deletes a user together with everything that hangs off it:
    /// memberships, access keys and the login profile.
    pub fn delete_user(&mut self, user_name: &str) -> IamResult<User> {
        let user = self.users.remove(user_name)?;
        self.memberships.retain(|m| m.user_name != user_name);
        self.access_keys.retain(|key| key.user_name != user_name);
        self.login_profiles.retain(|profile| profile.user_name != user_name);
        Ok(user)
    }

    /// Deletes a group and its memberships. Member users are untouched.
    pub fn delete_group(&mut self, group_name: &str) -> IamResult<Group> {
        let group = self.groups.remove(group_name)?;
        self.memberships.retain(|m| m.group_name != group_name);
        Ok(group)
    }

    /// Records `user_name` as a member of `group_name`. Re-adding an
    /// existing member is a no-op.
    pub fn add_membership(&mut self, user_name: &str, group_name: &str) -> IamResult<()> {
        self.users.get(user_name)?;
        self.groups.get(group_name)?;
        if self.is_member(user_name, group_name) {
            return Ok(());
        }
        self.memberships.push(Membership {
            user_name: user_name.to_string(),
            group_name: group_name.to_string(),
        });
        Ok(())
    }

    pub fn remove_membership(&mut self, user_name: &str, group_name: &str) -> IamResult<()> {
        self.users.get(user_name)?;
        self.groups.get(group_name)?;
        let position = self
            .memberships
            .iter()
            .position(|m| m.user_name == user_name && m.group_name == group_name)
            .ok_or_else(|| IamError::NotGroupMember {
                user: user_name.to_string(),
                group: group_name.to_string(),
            })?;
        self.memberships.remove(position);
        Ok(())
    }

    pub fn is_member(&self, user_name: &str, group_name: &str) -> bool {
        self.memberships
            .iter()
            .any(|m| m.user_name == user_name && m.group_name == group_name)
    }

    /// Groups of an existing user, in the order the memberships were added.
    pub fn groups_for_user(&self, user_name: &str) -> IamResult<Vec<&Group>> {
        self.users.get(user_name)?;
        self.memberships
            .iter()
            .filter(|m| m.user_name == user_name)
            .map(|m| self.groups.get(&m.group_name))
            .collect()
    }

    /// Members of an existing group, in the order they were added.
    pub fn members_of(&self, group_name: &str) -> IamResult<Vec<&User>> {
        self.groups.get(group_name)?;
        self.memberships
            .iter()
            .filter(|m| m.group_name == group_name)
            .map(|m| self.users.get(&m.user_name))
            .collect()
    }

    /// Access keys owned by an existing user, in creation order.
    pub fn access_keys_for(&self, user_name: &str) -> IamResult<Vec<&AccessKey>> {
        self.users.get(user_name)?;
        Ok(self
            .access_keys
            .iter()
            .filter(|key| key.user_name == user_name)
            .collect())
    }

    /// A fresh access key id not yet present in the repository.
    pub fn unique_access_key_id(&self) -> String {
        loop {
            let id = generate_id(ACCESS_KEY_ID_PREFIX, ids::ACCESS_KEY_ID_SUFFIX_LEN);
            if !self.access_keys.contains(&id) {
                return id;
            }
        }
    }

    /// Drops every entity and relation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.groups.is_empty()
            && self.access_keys.is_empty()
            && self.login_profiles.is_empty()
            && self.memberships.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatusType;
    use chrono::Utc;

    fn user(name: &str) -> User {
        User {
            path: "/".into(),
            user_name: name.into(),
            user_id: generate_id(USER_ID_PREFIX, 17),
            arn: format!("arn:aws:iam::123456789012:user/{name}"),
            create_date: Utc::now(),
        }
    }

    fn group(name: &str) -> Group {
        Group {
            path: "/".into(),
            group_name: name.into(),
            group_id: generate_id(GROUP_ID_PREFIX, 17),
            arn: format!("arn:aws:iam::123456789012:group/{name}"),
            create_date: Utc::now(),
        }
    }

    fn access_key(repo: &Repository, user_name: &str) -> AccessKey {
        AccessKey {
            user_name: user_name.into(),
            access_key_id: repo.unique_access_key_id(),
            status: StatusType::Active,
            create_date: Utc::now(),
            secret_access_key: "secret".into(),
            last_used: None,
        }
    }

    fn seeded() -> Repository {
        let mut repo = Repository::new();
        repo.users_mut().insert(user("John")).unwrap();
        repo.groups_mut().insert(group("Admins")).unwrap();
        repo
    }

    #[test]
    fn test_membership_checks_user_before_group() {
        let mut repo = Repository::new();
        assert_eq!(
            repo.add_membership("John", "Admins"),
            Err(IamError::NoSuchUser("John".into()))
        );
        repo.users_mut().insert(user("John")).unwrap();
        assert_eq!(
            repo.add_membership("John", "Admins"),
            Err(IamError::NoSuchGroup("Admins".into()))
        );
    }

    #[test]
    fn test_membership_lifecycle() {
        let mut repo = seeded();
        repo.add_membership("John", "Admins").unwrap();
        repo.add_membership("John", "Admins").unwrap();

        let groups = repo.groups_for_user("John").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group_name, "Admins");

        repo.remove_membership("John", "Admins").unwrap();
        assert!(repo.groups_for_user("John").unwrap().is_empty());
        assert_eq!(
            repo.remove_membership("John", "Admins"),
            Err(IamError::NotGroupMember {
                user: "John".into(),
                group: "Admins".into()
            })
        );
    }

    #[test]
    fn test_groups_for_user_in_membership_order() {
        let mut repo = seeded();
        repo.groups_mut().insert(group("Devs")).unwrap();
        repo.groups_mut().insert(group("Ops")).unwrap();
        repo.add_membership("John", "Ops").unwrap();
        repo.add_membership("John", "Admins").unwrap();

        let names: Vec<&str> = repo
            .groups_for_user("John")
            .unwrap()
            .into_iter()
            .map(|g| g.group_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ops", "Admins"]);
    }

    #[test]
    fn test_delete_group_drops_memberships_only() {
        let mut repo = seeded();
        repo.add_membership("John", "Admins").unwrap();
        repo.delete_group("Admins").unwrap();

        assert!(repo.groups_for_user("John").unwrap().is_empty());
        assert!(repo.users().contains("John"));
        assert_eq!(
            repo.delete_group("Admins"),
            Err(IamError::NoSuchGroup("Admins".into()))
        );
    }

    #[test]
    fn test_delete_user_removes_dependents() {
        let mut repo = seeded();
        repo.add_membership("John", "Admins").unwrap();
        let key = access_key(&repo, "John");
        let key_id = key.access_key_id.clone();
        repo.access_keys_mut().insert(key).unwrap();
        repo.login_profiles_mut()
            .insert(LoginProfile {
                user_name: "John".into(),
                create_date: Utc::now(),
                password_reset_required: false,
                password: "Password".into(),
            })
            .unwrap();

        repo.delete_user("John").unwrap();

        assert!(repo.members_of("Admins").unwrap().is_empty());
        assert!(!repo.access_keys().contains(&key_id));
        assert!(repo.login_profiles().is_empty());
        assert_eq!(
            repo.access_keys_for("John"),
            Err(IamError::NoSuchUser("John".into()))
        );
    }

    #[test]
    fn test_access_keys_for_user() {
        let mut repo = seeded();
        repo.users_mut().insert(user("Jane")).unwrap();
        let first = access_key(&repo, "John");
        let first_id = first.access_key_id.clone();
        repo.access_keys_mut().insert(first).unwrap();
        let other = access_key(&repo, "Jane");
        repo.access_keys_mut().insert(other).unwrap();

        let keys = repo.access_keys_for("John").unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].access_key_id, first_id);
    }

    #[test]
    fn test_reset() {
        let mut repo = seeded();
        repo.add_membership("John", "Admins").unwrap();
        assert!(!repo.is_empty());
        repo.reset();
        assert!(repo.is_empty());
    }
}
