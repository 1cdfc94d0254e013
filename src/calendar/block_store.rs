use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::api::types::format_minute;
use crate::error::Result;

use super::observe::{Observers, Subscription};

pub const MIN_BLOCK_MINUTES: u32 = 15;

/// A block the user drew on the day timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBlock {
    pub start_minute: u32,
    pub end_minute: u32,
    #[serde(default)]
    pub text: String,
}

impl DayBlock {
    pub fn duration(&self) -> u32 {
        self.end_minute.saturating_sub(self.start_minute)
    }

    pub fn label(&self) -> String {
        let span = format!(
            "{}–{}",
            format_minute(self.start_minute),
            format_minute(self.end_minute)
        );
        if self.text.is_empty() {
            span
        } else {
            format!("{} {}", span, self.text)
        }
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Delivered to subscribers after every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreChange {
    pub date_key: String,
    pub blocks: Vec<DayBlock>,
}

/// Manual blocks keyed by `YYYY-MM-DD`, backed by one JSON file.
#[derive(Debug)]
pub struct BlockStore {
    path: Option<PathBuf>,
    days: BTreeMap<String, Vec<DayBlock>>,
    observers: Observers<StoreChange>,
    dirty: bool,
}

pub type SharedBlockStore = Rc<RefCell<BlockStore>>;

impl BlockStore {
    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            days: BTreeMap::new(),
            observers: Observers::new(),
            dirty: false,
        }
    }

    /// Reads `path`. A missing or unreadable file yields an empty store that
    /// will still save to `path`.
    pub fn load(path: &Path) -> Self {
        let mut store = Self::in_memory();
        store.path = Some(path.to_path_buf());
        if !path.exists() {
            debug!("event=store_load module=block_store status=missing path={:?}", path);
            return store;
        }
        match read_days(path) {
            Ok(days) => {
                info!(
                    "event=store_load module=block_store status=ok days={} path={:?}",
                    days.len(),
                    path
                );
                store.days = days;
            }
            Err(e) => {
                warn!(
                    "event=store_load module=block_store status=error path={:?} error={}",
                    path, e
                );
            }
        }
        store
    }

    pub fn into_shared(self) -> SharedBlockStore {
        Rc::new(RefCell::new(self))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn save(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            self.dirty = false;
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.days)?;
        fs::write(path, content)?;
        self.dirty = false;
        debug!("event=store_save module=block_store status=ok path={:?}", path);
        Ok(())
    }

    /// Saves and logs any failure instead of returning it.
    pub fn flush(&mut self) {
        if let Err(e) = self.save() {
            warn!("event=store_save module=block_store status=error error={}", e);
        }
    }

    pub fn blocks_for(&self, date: NaiveDate) -> &[DayBlock] {
        self.days
            .get(&date_key(date))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn add(&mut self, date: NaiveDate, block: DayBlock) {
        let key = date_key(date);
        let day = self.days.entry(key.clone()).or_default();
        day.push(block);
        day.sort_by_key(|b| (b.start_minute, b.end_minute));
        let change = StoreChange {
            date_key: key,
            blocks: day.clone(),
        };
        self.dirty = true;
        self.observers.notify(&change);
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreChange) + 'static) -> Subscription {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.observers.unsubscribe(subscription)
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }
}

fn read_days(path: &Path) -> Result<BTreeMap<String, Vec<DayBlock>>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
