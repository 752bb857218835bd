//! Key-value persistence seam behind the bookmark store. The store only needs
//! string keys mapping to string values plus a prefix scan, which is the
//! contract a browser's local storage offers as well.

mod memory;

pub use memory::MemoryStorage;

use crate::error::StorageError;

pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite `key`. Must be durable before returning `Ok`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`, reporting whether it existed.
    fn remove(&mut self, key: &str) -> Result<bool, StorageError>;

    /// All keys starting with `prefix`, sorted.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}
