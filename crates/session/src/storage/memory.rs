//! 基于读写锁的内存存储后端
//!
//! 整个存储使用一把 `RwLock`：读者之间不互斥，写者独占。

use super::backend::{AuthKey, KeyStoreBackend};
use crate::error::{SessionError, SessionResult};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

#[derive(Debug, Default)]
pub struct MemoryBackend {
    keys: RwLock<HashMap<String, AuthKey>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> SessionResult<RwLockWriteGuard<'_, HashMap<String, AuthKey>>> {
        self.keys
            .write()
            .map_err(|_| SessionError::Storage("key store lock poisoned".to_string()))
    }
}

impl KeyStoreBackend for MemoryBackend {
    fn find(&self, user_id: &str) -> Option<AuthKey> {
        // 每个写临界区只有一次 map 操作，锁中毒时 map 仍然一致
        let keys = self.keys.read().unwrap_or_else(PoisonError::into_inner);
        keys.get(user_id).cloned()
    }

    fn save(&self, user_id: &str, key: AuthKey) -> SessionResult<()> {
        self.write()?.insert(user_id.to_string(), key);
        Ok(())
    }

    fn insert_if_absent(&self, user_id: &str, key: AuthKey) -> SessionResult<()> {
        match self.write()?.entry(user_id.to_string()) {
            Entry::Occupied(_) => Err(SessionError::conflict(user_id)),
            Entry::Vacant(slot) => {
                slot.insert(key);
                Ok(())
            }
        }
    }

    fn delete(&self, user_id: &str) -> SessionResult<()> {
        match self.write()?.remove(user_id) {
            Some(_) => Ok(()),
            None => Err(SessionError::not_found(user_id)),
        }
    }

    fn len(&self) -> usize {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(bytes: &[u8]) -> AuthKey {
        AuthKey::from(bytes)
    }

    #[test]
    fn test_find_save_delete() {
        let store = MemoryBackend::new();

        assert!(store.find("user-1").is_none());

        store.save("user-1", key(b"my-key")).unwrap();
        assert_eq!(store.find("user-1").as_deref(), Some(&b"my-key"[..]));
        assert!(store.find("user-2").is_none());

        store.delete("user-1").unwrap();
        assert!(store.find("user-1").is_none());
        assert_eq!(
            store.delete("user-1"),
            Err(SessionError::not_found("user-1"))
        );
    }

    #[test]
    fn test_save_overwrites() {
        let store = MemoryBackend::new();
        store.save("user-1", key(b"first")).unwrap();
        store.save("user-1", key(b"second")).unwrap();

        assert_eq!(store.find("user-1").as_deref(), Some(&b"second"[..]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_insert_if_absent_keeps_existing() {
        let store = MemoryBackend::new();
        store.insert_if_absent("user-1", key(b"first")).unwrap();

        let result = store.insert_if_absent("user-1", key(b"second"));
        assert_eq!(result, Err(SessionError::conflict("user-1")));
        assert_eq!(store.find("user-1").as_deref(), Some(&b"first"[..]));
    }

    #[test]
    fn test_poisoned_lock_rejects_writes_but_serves_reads() {
        let store = std::sync::Arc::new(MemoryBackend::new());
        store.save("user-1", key(b"k")).unwrap();

        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.keys.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(store.find("user-1").as_deref(), Some(&b"k"[..]));
        assert!(matches!(
            store.save("user-2", key(b"k")),
            Err(SessionError::Storage(_))
        ));
    }
}
