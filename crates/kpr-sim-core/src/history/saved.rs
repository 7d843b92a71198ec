//! Saved simulations, newest first.
//!
//! Records are immutable: they are created by an explicit save and destroyed
//! by an explicit delete (one or all). Nothing edits a record in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amortization::engine::SimulationResult;
use crate::storage::{load_or_default, save, KeyValueStore, SIM_HISTORY_KEY};
use crate::KprSimResult;

/// Label used when a simulation is saved without a client name.
pub const DEFAULT_CLIENT_LABEL: &str = "Klien Tanpa Nama";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSimulation {
    pub id: String,
    pub client_label: String,
    pub created_at: DateTime<Utc>,
    pub result: SimulationResult,
}

/// Saved simulation list persisted under [`SIM_HISTORY_KEY`].
pub struct SimulationHistory<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> SimulationHistory<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    fn load(&self) -> KprSimResult<Vec<SavedSimulation>> {
        load_or_default(self.store, SIM_HISTORY_KEY)
    }

    /// Save a result, prepending it to the list.
    ///
    /// The id is the creation instant in epoch milliseconds, bumped past any
    /// existing id so two saves in the same millisecond stay distinct.
    pub fn save(
        &self,
        client_label: &str,
        result: SimulationResult,
        now: DateTime<Utc>,
    ) -> KprSimResult<SavedSimulation> {
        let mut records = self.load()?;

        let mut millis = now.timestamp_millis();
        while records.iter().any(|r| r.id == millis.to_string()) {
            millis += 1;
        }

        let label = client_label.trim();
        let record = SavedSimulation {
            id: millis.to_string(),
            client_label: if label.is_empty() {
                DEFAULT_CLIENT_LABEL.to_string()
            } else {
                label.to_string()
            },
            created_at: now,
            result,
        };

        records.insert(0, record.clone());
        save(self.store, SIM_HISTORY_KEY, &records)?;
        Ok(record)
    }

    /// All records, newest first by creation time.
    pub fn list(&self) -> KprSimResult<Vec<SavedSimulation>> {
        let mut records = self.load()?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    pub fn get(&self, id: &str) -> KprSimResult<Option<SavedSimulation>> {
        Ok(self.load()?.into_iter().find(|r| r.id == id))
    }

    /// Delete one record; returns whether anything was removed.
    pub fn delete(&self, id: &str) -> KprSimResult<bool> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        save(self.store, SIM_HISTORY_KEY, &records)?;
        Ok(true)
    }

    /// Delete every record.
    pub fn clear(&self) -> KprSimResult<()> {
        self.store.remove(SIM_HISTORY_KEY)
    }
}
