//! Generated identifiers in the shape the real service hands out

use uuid::Uuid;

pub const USER_ID_PREFIX: &str = "AIDA";
pub const GROUP_ID_PREFIX: &str = "AGPA";
pub const ACCESS_KEY_ID_PREFIX: &str = "AKIA";

pub(crate) const ENTITY_ID_SUFFIX_LEN: usize = 17;
pub(crate) const ACCESS_KEY_ID_SUFFIX_LEN: usize = 16;
const SECRET_ACCESS_KEY_LEN: usize = 40;

/// `prefix` followed by `len` random uppercase alphanumerics.
pub fn generate_id(prefix: &str, len: usize) -> String {
    let mut id = String::with_capacity(prefix.len() + len);
    id.push_str(prefix);
    while id.len() < prefix.len() + len {
        let chunk = Uuid::new_v4().simple().to_string().to_ascii_uppercase();
        let remaining = prefix.len() + len - id.len();
        id.extend(chunk.chars().take(remaining));
    }
    id
}

pub(crate) fn generate_secret() -> String {
    let mut secret = String::with_capacity(SECRET_ACCESS_KEY_LEN);
    while secret.len() < SECRET_ACCESS_KEY_LEN {
        let chunk = Uuid::new_v4().simple().to_string();
        let remaining = SECRET_ACCESS_KEY_LEN - secret.len();
        secret.extend(chunk.chars().take(remaining));
    }
    secret
}
