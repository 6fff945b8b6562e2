//! # Durable Storage
//!
//! String-valued key/value slots that survive process restarts.
//!
//! The session store is the only writer of the slots defined here; nothing
//! else in the console reads or writes them.
//!
//! ## Backends
//!
//! - [`MemoryStorage`] - in-process map, for tests and throwaway runs
//! - [`FileStorage`] - a single JSON document on disk

mod error;
mod file;
mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Slot holding the raw bearer credential.
pub const CREDENTIAL_KEY: &str = "token";

/// Slot holding the JSON-serialized identity record.
pub const IDENTITY_KEY: &str = "user";

/// Trait for durable key/value storage backends.
///
/// Values are opaque strings. Backends that can write several slots in one
/// step should override [`set_many`](Self::set_many) and
/// [`remove_many`](Self::remove_many) so paired slots land together.
pub trait KeyValueStorage: Send + Sync {
    /// Reads a slot, returning `None` if it is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes a slot, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes a slot. Removing an absent slot is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Writes several slots.
    fn set_many(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        entries.iter().try_for_each(|(key, value)| self.set(key, value))
    }

    /// Removes several slots.
    fn remove_many(&self, keys: &[&str]) -> StorageResult<()> {
        keys.iter().try_for_each(|key| self.remove(key))
    }
}
