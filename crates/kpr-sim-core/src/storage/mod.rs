//! Key-value persistence for calculator state, history and custom links.

pub mod file;
pub mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::KprSimResult;

/// Key holding the last-used calculator inputs.
pub const CALC_STATE_KEY: &str = "calc_state";
/// Key holding the saved simulation list.
pub const SIM_HISTORY_KEY: &str = "sim_history";
/// Key holding salesperson-added catalogue links.
pub const CUSTOM_LINKS_KEY: &str = "custom_links";

/// String-keyed store of JSON-encoded values.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> KprSimResult<Option<String>>;
    fn set(&self, key: &str, value: String) -> KprSimResult<()>;
    fn remove(&self, key: &str) -> KprSimResult<()>;
}

/// Load and decode a value; a missing key yields `T::default()`.
pub fn load_or_default<T, S>(store: &S, key: &str) -> KprSimResult<T>
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(T::default()),
    }
}

/// Encode and store a value under `key`.
pub fn save<T, S>(store: &S, key: &str, value: &T) -> KprSimResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    store.set(key, serde_json::to_string(value)?)
}
