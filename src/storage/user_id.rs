use super::prefixed::PrefixedStore;
use crate::utils::{UNIQUE_ID_LEN, USER_ID_KEY, unique_id};

/// Pick the user id for this device.
///
/// A configured id wins; otherwise the stored id is reused, and on first
/// run a fresh id is generated and persisted. Store failures are logged and
/// fall back to an unpersisted id rather than failing client startup.
pub fn resolve_user_id(configured: Option<&str>, store: &PrefixedStore) -> String {
    if let Some(id) = configured.map(str::trim).filter(|id| !id.is_empty()) {
        return id.to_string();
    }

    match store.get::<String>(USER_ID_KEY) {
        Ok(Some(id)) if !id.is_empty() => return id,
        Ok(_) => {}
        Err(e) => log::warn!("Failed to read stored user id: {e}"),
    }

    let id = unique_id(UNIQUE_ID_LEN);
    if let Err(e) = store.set_with_ttl(USER_ID_KEY, &id, None) {
        log::warn!("Failed to persist user id: {e}");
    }
    id
}
