// src/api/storage_proxy.rs

use mlua::{UserData, UserDataMethods, Value};

use crate::storage::GlobalStorage;

use super::convert::{json_to_lua, lua_to_json};

/// `installer.globalstorage` in the guest.
///
/// Every method goes straight to the shared store; nothing is cached, so
/// other holders of the store see writes immediately.
#[derive(Debug, Clone)]
pub struct StorageProxy {
    storage: GlobalStorage,
}

impl StorageProxy {
    pub fn new(storage: GlobalStorage) -> Self {
        Self { storage }
    }
}

impl UserData for StorageProxy {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_method("contains", |_, this, key: String| {
            Ok(this.storage.contains(&key))
        });
        methods.add_method("count", |_, this, ()| Ok(this.storage.count()));
        methods.add_method("insert", |lua, this, (key, value): (String, Value)| {
            let value = lua_to_json(lua, value)?;
            this.storage.insert(key, value);
            Ok(())
        });
        methods.add_method("keys", |_, this, ()| Ok(this.storage.keys()));
        methods.add_method("remove", |_, this, key: String| {
            Ok(this.storage.remove(&key))
        });
        methods.add_method("value", |lua, this, key: String| {
            match this.storage.value(&key) {
                Some(value) => json_to_lua(lua, &value),
                None => Ok(Value::Nil),
            }
        });
    }
}
