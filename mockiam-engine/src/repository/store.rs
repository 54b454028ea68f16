//! Insertion-ordered keyed store shared by every entity collection

use indexmap::IndexMap;

use crate::error::{IamError, IamResult};
use crate::types::{AccessKey, Group, LoginProfile, User};

/// A record the repository keys by a string and knows how to report
/// as missing or conflicting.
pub trait Entity {
    fn key(&self) -> &str;

    fn not_found(key: &str) -> IamError;

    fn already_exists(key: &str) -> IamError;
}

impl Entity for User {
    fn key(&self) -> &str {
        &self.user_name
    }

    fn not_found(key: &str) -> IamError {
        IamError::NoSuchUser(key.to_string())
    }

    fn already_exists(key: &str) -> IamError {
        IamError::UserAlreadyExists(key.to_string())
    }
}

impl Entity for Group {
    fn key(&self) -> &str {
        &self.group_name
    }

    fn not_found(key: &str) -> IamError {
        IamError::NoSuchGroup(key.to_string())
    }

    fn already_exists(key: &str) -> IamError {
        IamError::GroupAlreadyExists(key.to_string())
    }
}

impl Entity for AccessKey {
    fn key(&self) -> &str {
        &self.access_key_id
    }

    fn not_found(key: &str) -> IamError {
        IamError::NoSuchAccessKey(key.to_string())
    }

    // Generated ids are checked for uniqueness before insert; a collision
    // here means the caller reused an id.
    fn already_exists(key: &str) -> IamError {
        IamError::validation(format!(
            "Value '{key}' at 'accessKeyId' failed to satisfy constraint: Member must be unique"
        ))
    }
}

/// Login profiles are keyed by their owning user name.
impl Entity for LoginProfile {
    fn key(&self) -> &str {
        &self.user_name
    }

    fn not_found(key: &str) -> IamError {
        IamError::NoSuchLoginProfile(key.to_string())
    }

    fn already_exists(key: &str) -> IamError {
        IamError::LoginProfileAlreadyExists(key.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct EntityStore<E> {
    entries: IndexMap<String, E>,
}

impl<E> Default for EntityStore<E> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<E: Entity> EntityStore<E> {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> IamResult<&E> {
        self.entries.get(key).ok_or_else(|| E::not_found(key))
    }

    pub fn get_mut(&mut self, key: &str) -> IamResult<&mut E> {
        self.entries.get_mut(key).ok_or_else(|| E::not_found(key))
    }

    pub fn insert(&mut self, entity: E) -> IamResult<()> {
        if self.entries.contains_key(entity.key()) {
            return Err(E::already_exists(entity.key()));
        }
        self.entries.insert(entity.key().to_string(), entity);
        Ok(())
    }

    /// Removes and returns the entity, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> IamResult<E> {
        self.entries
            .shift_remove(key)
            .ok_or_else(|| E::not_found(key))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&E) -> bool) {
        self.entries.retain(|_, entity| keep(entity));
    }

    /// Entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entries.values()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
