//! Key-value storage used for client-side bookkeeping.
//!
//! Two named stores exist: the durable one (`localStorage`, survives
//! restarts) and the session one (`sessionStorage`, cleared with the tab).
//! Both sit behind [`KeyValueStore`] so flows can be driven against
//! [`MemoryStore`] in tests or when the browser refuses storage access.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use web_sys::window;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Wrapper over a `web_sys::Storage` area
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        if self.storage.set_item(key, value).is_err() {
            log::warn!("storage: failed to write key {}", key);
        }
    }

    fn remove(&self, key: &str) {
        let _ = self.storage.remove_item(key);
    }
}

/// In-process store, also used when browser storage is blocked
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

fn get_session_storage() -> Option<web_sys::Storage> {
    window()?.session_storage().ok()?
}

fn wrap(storage: Option<web_sys::Storage>, area: &str) -> Rc<dyn KeyValueStore> {
    match storage {
        Some(storage) => Rc::new(BrowserStorage { storage }),
        None => {
            log::warn!("{} is unavailable, falling back to memory", area);
            Rc::new(MemoryStore::new())
        }
    }
}

/// Durable store (`localStorage`)
pub fn durable_store() -> Rc<dyn KeyValueStore> {
    wrap(get_local_storage(), "localStorage")
}

/// Per-tab store (`sessionStorage`)
pub fn session_store() -> Rc<dyn KeyValueStore> {
    wrap(get_session_storage(), "sessionStorage")
}
