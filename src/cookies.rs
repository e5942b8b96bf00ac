//! User-declared cookie sources
//!
//! Users can register several (browser, path) pairs and mark one of them as
//! the active source for authenticated downloads. The list and the
//! selection live in two storage keys and are written on every change.

use crate::browser::{Browser, CookiePathResolver, FsProbe, ResolvedCookies, StdFs};
use crate::error::Result;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

/// Storage key holding the serialized entry list
pub const ENTRIES_KEY: &str = "customCookiesPathEntries";
/// Storage key holding the selected entry id
pub const SELECTED_KEY: &str = "customCookiesPathSelected";

const ID_PREFIX: &str = "c_";
const ID_TOKEN_LEN: usize = 8;

/// One cookie source declared by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieEntry {
    pub id: String,
    pub browser: String,
    pub path: String,
}

impl CookieEntry {
    /// Typed view of the browser id; `None` for identifiers we cannot resolve
    pub fn browser_kind(&self) -> Option<Browser> {
        self.browser.parse().ok()
    }
}

/// Field edits applied by [`CookieEntryStore::update`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieEntryUpdate {
    pub browser: Option<String>,
    pub path: Option<String>,
}

impl CookieEntryUpdate {
    pub fn browser(browser: impl Into<String>) -> Self {
        Self {
            browser: Some(browser.into()),
            path: None,
        }
    }

    pub fn path(path: impl Into<String>) -> Self {
        Self {
            browser: None,
            path: Some(path.into()),
        }
    }
}

/// Status line shown beneath the selected entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieStatus {
    Found(ResolvedCookies),
    NotFound,
}

/// Parse a persisted entry list.
///
/// Never fails: malformed payloads load as an empty list, elements without
/// a string `id` are dropped, and missing fields take their defaults.
pub fn parse_entries(raw: &str) -> Vec<CookieEntry> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            log::warn!("Ignoring non-array value under {}", ENTRIES_KEY);
            return Vec::new();
        }
        Err(e) => {
            log::warn!("Ignoring malformed {}: {}", ENTRIES_KEY, e);
            return Vec::new();
        }
    };

    items.iter().filter_map(entry_from_value).collect()
}

fn entry_from_value(value: &Value) -> Option<CookieEntry> {
    let id = value.get("id")?.as_str()?;
    let browser = value
        .get("browser")
        .and_then(scalar_text)
        .unwrap_or_else(|| Browser::default().id().to_string());
    let path = value.get("path").and_then(scalar_text).unwrap_or_default();
    Some(CookieEntry {
        id: id.to_string(),
        browser,
        path,
    })
}

/// Text form of a truthy scalar field: non-empty strings as-is, `true`,
/// and non-zero numbers. Empty, falsy and structured values yield `None`.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        _ => None,
    }
}

/// Serialize an entry list in the persisted JSON format
pub fn serialize_entries(entries: &[CookieEntry]) -> Result<String> {
    Ok(serde_json::to_string(entries)?)
}

fn generate_id(taken: &HashSet<&str>) -> String {
    loop {
        let token = Uuid::new_v4().simple().to_string();
        let id = format!("{}{}", ID_PREFIX, &token[..ID_TOKEN_LEN]);
        if !taken.contains(id.as_str()) {
            return id;
        }
    }
}

/// Write-through repository for cookie entries and the selection
pub struct CookieEntryStore<S, P = StdFs> {
    store: S,
    resolver: CookiePathResolver<P>,
}

impl<S: KeyValueStore> CookieEntryStore<S, StdFs> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            resolver: CookiePathResolver::new(),
        }
    }
}

impl<S: KeyValueStore, P: FsProbe> CookieEntryStore<S, P> {
    pub fn with_resolver(store: S, resolver: CookiePathResolver<P>) -> Self {
        Self { store, resolver }
    }

    pub fn resolver(&self) -> &CookiePathResolver<P> {
        &self.resolver
    }

    /// All entries in display order
    pub fn list(&self) -> Result<Vec<CookieEntry>> {
        let raw = self.store.get(ENTRIES_KEY)?.unwrap_or_default();
        Ok(parse_entries(&raw))
    }

    pub fn get(&self, id: &str) -> Result<Option<CookieEntry>> {
        Ok(self.list()?.into_iter().find(|entry| entry.id == id))
    }

    /// Append a new entry with a fresh id
    pub fn add(&self, browser: &str, path: &str) -> Result<CookieEntry> {
        let mut entries = self.list()?;
        let id = {
            let taken: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
            generate_id(&taken)
        };
        let entry = CookieEntry {
            id,
            browser: browser.to_string(),
            path: path.to_string(),
        };
        entries.push(entry.clone());
        self.save(&entries)?;
        log::info!("Added cookie source {} ({})", entry.id, entry.browser);
        Ok(entry)
    }

    /// Apply `update` to the entry with `id`; false when no entry matched
    pub fn update(&self, id: &str, update: CookieEntryUpdate) -> Result<bool> {
        let mut entries = self.list()?;
        let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) else {
            return Ok(false);
        };
        if let Some(browser) = update.browser {
            entry.browser = browser;
        }
        if let Some(path) = update.path {
            entry.path = path;
        }
        self.save(&entries)?;
        log::debug!("Updated cookie source {}", id);
        Ok(true)
    }

    /// Delete the entry with `id`, clearing the selection if it pointed there
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut entries = self.list()?;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        let removed = entries.len() != before;
        if removed {
            self.save(&entries)?;
            log::info!("Removed cookie source {}", id);
        }
        if self.selected_id()?.as_deref() == Some(id) {
            self.set_selected(None)?;
        }
        Ok(removed)
    }

    /// Raw stored selection, which may point at a deleted entry
    pub fn selected_id(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(SELECTED_KEY)?
            .filter(|id| !id.is_empty()))
    }

    /// The selected entry, treating a stale id as no selection
    pub fn selected(&self) -> Result<Option<CookieEntry>> {
        match self.selected_id()? {
            Some(id) => {
                let entry = self.get(&id)?;
                if entry.is_none() {
                    log::debug!("Selected cookie source {} no longer exists", id);
                }
                Ok(entry)
            }
            None => Ok(None),
        }
    }

    /// Mark `id` as selected without checking membership; `None` clears it
    pub fn set_selected(&self, id: Option<&str>) -> Result<()> {
        self.store.set(SELECTED_KEY, id.unwrap_or_default())
    }

    /// Status for `entry`; only the selected entry with a non-blank path has one
    pub fn status(&self, entry: &CookieEntry) -> Result<Option<CookieStatus>> {
        if entry.path.trim().is_empty() {
            return Ok(None);
        }
        if self.selected_id()?.as_deref() != Some(entry.id.as_str()) {
            return Ok(None);
        }
        Ok(Some(self.resolve_entry(entry)))
    }

    pub fn selected_status(&self) -> Result<Option<CookieStatus>> {
        match self.selected()? {
            Some(entry) => self.status(&entry),
            None => Ok(None),
        }
    }

    pub fn resolve_entry(&self, entry: &CookieEntry) -> CookieStatus {
        match self.resolver.resolve(&entry.browser, &entry.path) {
            Some(found) => CookieStatus::Found(found),
            None => CookieStatus::NotFound,
        }
    }

    fn save(&self, entries: &[CookieEntry]) -> Result<()> {
        self.store.set(ENTRIES_KEY, &serialize_entries(entries)?)
    }
}
