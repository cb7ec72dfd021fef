//! Client-local key/value storage shared between the catalog and the
//! reservation page. Values are strings, the same shape a browser's local
//! storage would hold.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ClientError, Result};
use crate::models::ReservationDraft;

/// VIN of the car picked on the catalog page.
pub const SELECTED_VIN_KEY: &str = "selectedCarVIN";
/// JSON object of the in-progress reservation form.
pub const DRAFT_KEY: &str = "reservationFormData";

pub trait LocalStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// Store that lives as long as the value does. Used per web session and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl LocalStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object file, rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: HashMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let items = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<HashMap<String, String>>(&text) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Ignoring corrupt storage file");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;
        let text = serde_json::to_string_pretty(&self.items)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.persist(&self.path)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        Ok(())
    }
}

impl LocalStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.items.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

pub fn selected_vin<S: LocalStore + ?Sized>(store: &S) -> Option<String> {
    store
        .get_item(SELECTED_VIN_KEY)
        .filter(|vin| !vin.trim().is_empty())
}

/// Remember the car picked on the catalog page for the reservation page.
pub fn select_car<S: LocalStore + ?Sized>(store: &mut S, vin: &str) -> Result<()> {
    store.set_item(SELECTED_VIN_KEY, vin)
}

pub fn load_draft<S: LocalStore + ?Sized>(store: &S) -> Option<ReservationDraft> {
    let raw = store.get_item(DRAFT_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(draft) => Some(draft),
        Err(e) => {
            tracing::warn!(%e, "Ignoring unreadable reservation draft");
            None
        }
    }
}

pub fn save_draft<S: LocalStore + ?Sized>(store: &mut S, draft: &ReservationDraft) -> Result<()> {
    let raw = serde_json::to_string(draft).map_err(|e| ClientError::Storage(e.to_string()))?;
    store.set_item(DRAFT_KEY, &raw)
}

/// Forget both the draft and the selected car, after a successful reservation.
pub fn clear_reservation<S: LocalStore + ?Sized>(store: &mut S) -> Result<()> {
    store.remove_item(DRAFT_KEY)?;
    store.remove_item(SELECTED_VIN_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        select_car(&mut store, "VIN123").unwrap();
        assert_eq!(selected_vin(&store).as_deref(), Some("VIN123"));
        store.remove_item(SELECTED_VIN_KEY).unwrap();
        assert_eq!(selected_vin(&store), None);
    }

    #[test]
    fn test_blank_vin_counts_as_unselected() {
        let mut store = MemoryStore::new();
        store.set_item(SELECTED_VIN_KEY, "  ").unwrap();
        assert_eq!(selected_vin(&store), None);
    }

    #[test]
    fn test_draft_uses_form_field_names() {
        let mut store = MemoryStore::new();
        let draft = ReservationDraft {
            start_date: "2030-01-01".into(),
            rental_period: "3".into(),
            ..Default::default()
        };
        save_draft(&mut store, &draft).unwrap();
        let raw = store.get_item(DRAFT_KEY).unwrap();
        assert!(raw.contains("\"startDate\":\"2030-01-01\""));
        assert!(raw.contains("\"rentalPeriod\":\"3\""));
        assert_eq!(load_draft(&store), Some(draft));
    }

    #[test]
    fn test_corrupt_draft_is_ignored() {
        let mut store = MemoryStore::new();
        store.set_item(DRAFT_KEY, "{not json").unwrap();
        assert_eq!(load_draft(&store), None);
    }

    #[test]
    fn test_clear_reservation_removes_both_keys() {
        let mut store = MemoryStore::new();
        select_car(&mut store, "VIN1").unwrap();
        save_draft(&mut store, &ReservationDraft::default()).unwrap();
        clear_reservation(&mut store).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");
        {
            let mut store = FileStore::open(&path).unwrap();
            select_car(&mut store, "VIN9").unwrap();
        }
        let store = FileStore::open(&path).unwrap();
        assert_eq!(selected_vin(&store).as_deref(), Some("VIN9"));
    }

    #[test]
    fn test_file_store_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get_item(SELECTED_VIN_KEY), None);
    }
}
