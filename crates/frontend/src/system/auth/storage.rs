use contracts::system::users::SessionUser;
use web_sys::window;

const USER_KEY: &str = "user";
const JWT_KEY: &str = "jwt";

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Key/value store holding the session
pub trait SessionStorage {
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str) -> Result<(), String>;
}

impl SessionStorage for web_sys::Storage {
    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.set_item(key, value)
            .map_err(|e| format!("Failed to write '{}': {:?}", key, e))
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        self.remove_item(key)
            .map_err(|e| format!("Failed to remove '{}': {:?}", key, e))
    }
}

/// Decode the `user` entry; anything malformed counts as no session
pub fn parse_session_user(raw: &str) -> Option<SessionUser> {
    match serde_json::from_str::<SessionUser>(raw) {
        Ok(user) => Some(user),
        Err(e) => {
            log::warn!("Ignoring malformed session entry: {}", e);
            None
        }
    }
}

/// Write both session entries; a half-written session is rolled back
pub fn save_session_in(
    storage: &impl SessionStorage,
    user: &SessionUser,
    jwt: &str,
) -> Result<(), String> {
    let json = serde_json::to_string(user)
        .map_err(|e| format!("Failed to serialize session user: {}", e))?;
    storage.set(USER_KEY, &json)?;
    if let Err(e) = storage.set(JWT_KEY, jwt) {
        if let Err(cleanup) = storage.remove(USER_KEY) {
            log::error!("{}", cleanup);
        }
        return Err(e);
    }
    Ok(())
}

/// Remove both session entries, reporting the first failure
pub fn clear_session_in(storage: &impl SessionStorage) -> Result<(), String> {
    let user = storage.remove(USER_KEY);
    let jwt = storage.remove(JWT_KEY);
    user.and(jwt)
}

/// Save the logged-in user and its bearer token to localStorage
pub fn save_session(user: &SessionUser, jwt: &str) -> Result<(), String> {
    let storage = get_local_storage().ok_or_else(|| "localStorage is unavailable".to_string())?;
    save_session_in(&storage, user, jwt).inspect_err(|e| log::error!("Session not saved: {}", e))
}

/// Get the session user from localStorage
pub fn get_session_user() -> Option<SessionUser> {
    let raw = get_local_storage()?.get_item(USER_KEY).ok()??;
    parse_session_user(&raw)
}

/// Get the bearer token from localStorage
pub fn get_jwt() -> Option<String> {
    get_local_storage()?.get_item(JWT_KEY).ok()?
}

/// Clear the session
pub fn clear_session() -> Result<(), String> {
    let Some(storage) = get_local_storage() else {
        return Ok(());
    };
    clear_session_in(&storage).inspect_err(|e| log::error!("Session not cleared: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::users::UserRole;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[test]
    fn test_parse_session_user() {
        let user = parse_session_user(r#"{"type":"Employee","email":"a@a"}"#).unwrap();
        assert_eq!(user.role, UserRole::Employee);
        assert_eq!(user.email.as_deref(), Some("a@a"));

        assert!(parse_session_user(r#"{"type":"Intern"}"#).is_none());
        assert!(parse_session_user("not json").is_none());
    }

    /// In-memory storage refusing writes to `read_only` keys
    #[derive(Default)]
    struct MemoryStorage {
        entries: RefCell<HashMap<String, String>>,
        read_only: Vec<&'static str>,
    }

    impl SessionStorage for MemoryStorage {
        fn set(&self, key: &str, value: &str) -> Result<(), String> {
            if self.read_only.iter().any(|k| *k == key) {
                return Err(format!("QuotaExceededError on '{}'", key));
            }
            self.entries.borrow_mut().insert(key.into(), value.into());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), String> {
            if self.read_only.iter().any(|k| *k == key) {
                return Err(format!("SecurityError on '{}'", key));
            }
            self.entries.borrow_mut().remove(key);
            Ok(())
        }
    }

    fn employee() -> SessionUser {
        SessionUser {
            role: UserRole::Employee,
            email: Some("a@a".into()),
        }
    }

    #[test]
    fn test_session_is_saved_and_cleared() {
        let storage = MemoryStorage::default();
        save_session_in(&storage, &employee(), "token").unwrap();
        {
            let entries = storage.entries.borrow();
            assert_eq!(entries.get(JWT_KEY).map(String::as_str), Some("token"));
            assert_eq!(parse_session_user(&entries[USER_KEY]), Some(employee()));
        }

        clear_session_in(&storage).unwrap();
        assert!(storage.entries.borrow().is_empty());
    }

    #[test]
    fn test_failed_token_write_is_reported_and_rolled_back() {
        let storage = MemoryStorage {
            read_only: vec![JWT_KEY],
            ..Default::default()
        };
        let err = save_session_in(&storage, &employee(), "token").unwrap_err();
        assert!(err.contains(JWT_KEY));
        assert!(storage.entries.borrow().is_empty());
    }

    #[test]
    fn test_failed_removal_is_reported() {
        let storage = MemoryStorage::default();
        save_session_in(&storage, &employee(), "token").unwrap();
        let storage = MemoryStorage {
            read_only: vec![USER_KEY],
            entries: storage.entries,
        };

        assert!(clear_session_in(&storage).is_err());
        // The other entry is still removed
        assert!(!storage.entries.borrow().contains_key(JWT_KEY));
    }
}
