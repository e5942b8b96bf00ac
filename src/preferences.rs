//! Preferences screen binding
//!
//! Translates user actions on the preferences screen into repository writes
//! and host requests. Nothing here renders; callers receive [`Notice`]s and
//! [`CookieRow`]s and present them however they like.

use crate::browser::{Browser, CookiePathResolver, FsProbe, StdFs};
use crate::cookies::{CookieEntry, CookieEntryStore, CookieEntryUpdate, CookieStatus};
use crate::error::{PrefsError, Result};
use crate::host::{HostChannel, HostMessage};
use crate::i18n;
use crate::settings::{self, SettingKey, SettingsRepository, CUSTOM_BROWSER};
use crate::storage::KeyValueStore;
use crate::utils::FileUtils;
use std::path::Path;
use std::time::Duration;
use unic_langid::LanguageIdentifier;

/// How long a notice stays fully visible
pub const NOTICE_VISIBLE: Duration = Duration::from_millis(2200);
/// Fade-out time after [`NOTICE_VISIBLE`] elapses
pub const NOTICE_FADE: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// One line of the custom cookie location list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieRow {
    pub entry: CookieEntry,
    pub selected: bool,
    /// Localized status, present only for the selected entry with a path
    pub status: Option<String>,
    pub found: Option<bool>,
}

/// Binding between the preferences screen, storage and the host process
pub struct Preferences<S, H, P = StdFs> {
    settings: SettingsRepository<S>,
    cookies: CookieEntryStore<S, P>,
    host: H,
    langid: LanguageIdentifier,
}

impl<S, H> Preferences<S, H, StdFs>
where
    S: KeyValueStore + Clone,
    H: HostChannel,
{
    pub fn new(store: S, host: H, langid: LanguageIdentifier) -> Self {
        Self::with_resolver(store, host, langid, CookiePathResolver::new())
    }
}

impl<S, H, P> Preferences<S, H, P>
where
    S: KeyValueStore + Clone,
    H: HostChannel,
    P: FsProbe,
{
    pub fn with_resolver(
        store: S,
        host: H,
        langid: LanguageIdentifier,
        resolver: CookiePathResolver<P>,
    ) -> Self {
        Self {
            settings: SettingsRepository::new(store.clone()),
            cookies: CookieEntryStore::with_resolver(store, resolver),
            host,
            langid,
        }
    }

    pub fn settings(&self) -> &SettingsRepository<S> {
        &self.settings
    }

    pub fn cookies(&self) -> &CookieEntryStore<S, P> {
        &self.cookies
    }

    pub fn language(&self) -> &LanguageIdentifier {
        &self.langid
    }

    fn tr(&self, key: &str) -> String {
        i18n::translate(&self.langid, key)
    }

    /// Re-announce tray behavior to the host when the screen opens
    pub fn restore_tray_state(&self) -> Result<()> {
        if self.settings.close_to_tray()? {
            self.host.send(HostMessage::UseTray(true))?;
        }
        Ok(())
    }

    pub fn close(&self) -> Result<()> {
        self.host.send(HostMessage::CloseSecondary)
    }

    pub fn reload(&self) -> Result<()> {
        log::info!("Requesting reload");
        self.host.send(HostMessage::Reload)
    }

    /// Ask the host for a directory picker
    pub fn request_download_location(&self) -> Result<()> {
        self.host.send(HostMessage::SelectLocation)
    }

    /// Host reply to [`Self::request_download_location`]
    pub fn on_download_path_picked(&self, paths: &[String]) -> Result<Notice> {
        let Some(picked) = paths.first() else {
            log::warn!("Directory picker returned no path");
            return Ok(Notice::error(self.tr("unableToAccessDir")));
        };

        let path = FileUtils::expand_path(picked)?;
        if let Err(e) = FileUtils::check_dir_writable(&path) {
            log::warn!("Rejecting download directory {:?}: {}", path, e);
            return Ok(Notice::error(self.tr("unableToAccessDir")));
        }

        let path = path.display().to_string();
        self.settings.set_download_path(&path)?;
        log::info!("Download directory set to {}", path);
        Ok(Notice::success(i18n::translate_with(
            &self.langid,
            "downloadPathUpdated",
            "path",
            &path,
        )))
    }

    /// Ask the host for a yt-dlp config file picker
    pub fn request_config_file(&self) -> Result<()> {
        self.host.send(HostMessage::SelectConfig)
    }

    /// Host reply to [`Self::request_config_file`]
    pub fn on_config_path_picked(&self, path: &str) -> Result<Notice> {
        let path = FileUtils::expand_path(path.trim())?;
        let path = path.display().to_string();
        self.settings.set_config_path(Some(&path))?;
        log::info!("Config file set to {}", path);
        Ok(Notice::success(i18n::translate_with(
            &self.langid,
            "configPathUpdated",
            "path",
            &path,
        )))
    }

    /// Unticking "use config file" forgets the path
    pub fn disable_config_file(&self) -> Result<Notice> {
        self.settings.set_config_path(None)?;
        Ok(Notice::success(self.tr("configPathCleared")))
    }

    /// Whether "edit config" can be offered
    pub fn can_edit_config(&self) -> Result<bool> {
        Ok(self.settings.config_path()?.is_some())
    }

    /// Open the configured yt-dlp config file through the host
    pub fn edit_config(&self) -> Result<Option<Notice>> {
        let Some(path) = self.settings.config_path()? else {
            return Ok(Some(Notice::error(self.tr("noConfigSelected"))));
        };
        if let Err(e) = FileUtils::check_file_readable(&path) {
            log::warn!("Cannot open config file {:?}: {}", path, e);
            return Ok(Some(Notice::error(self.tr("unableToAccessDir"))));
        }
        self.host
            .send(HostMessage::OpenPath(path.display().to_string()))?;
        Ok(None)
    }

    /// Change the interface language; takes effect after reload
    pub fn change_language(&self, locale: &str) -> Result<()> {
        let locale = locale.trim();
        if locale.is_empty() {
            return Err(PrefsError::InvalidSetting {
                key: SettingKey::Locale.to_string(),
                detail: "language code is empty".to_string(),
            });
        }
        self.settings.set_locale(locale)
    }

    /// Change the global cookie browser; leaving `custom` drops the selection
    pub fn change_browser(&self, browser: &str) -> Result<()> {
        self.settings.set_browser(browser)?;
        if browser != CUSTOM_BROWSER {
            self.cookies.set_selected(None)?;
        }
        Ok(())
    }

    pub fn set_close_to_tray(&self, enabled: bool) -> Result<()> {
        self.settings.set_close_to_tray(enabled)?;
        self.host.send(HostMessage::UseTray(enabled))
    }

    /// Apply a textual value to any preference, routing side effects
    pub fn set_setting(&self, key: SettingKey, value: &str) -> Result<Option<Notice>> {
        match key {
            SettingKey::DownloadPath => {
                self.on_download_path_picked(&[value.to_string()]).map(Some)
            }
            SettingKey::ConfigPath if value.trim().is_empty() => {
                self.disable_config_file().map(Some)
            }
            SettingKey::ConfigPath => self.on_config_path_picked(value).map(Some),
            SettingKey::Locale => self.change_language(value).map(|_| None),
            SettingKey::Browser => self.change_browser(value.trim()).map(|_| None),
            SettingKey::CloseToTray => {
                let enabled = settings::parse_bool(key, value)?;
                self.set_close_to_tray(enabled).map(|_| None)
            }
            _ => self.settings.set_plain(key, value).map(|_| None),
        }
    }

    pub fn add_cookie_entry(&self, browser: Option<&str>, path: &str) -> Result<CookieEntry> {
        let browser = match browser {
            Some(browser) => parse_browser(browser)?,
            None => Browser::default(),
        };
        self.cookies.add(browser.id(), path)
    }

    pub fn set_cookie_entry_browser(&self, id: &str, browser: &str) -> Result<()> {
        let browser = parse_browser(browser)?;
        self.update_entry(id, CookieEntryUpdate::browser(browser.id()))
    }

    pub fn set_cookie_entry_path(&self, id: &str, path: &str) -> Result<()> {
        self.update_entry(id, CookieEntryUpdate::path(path))
    }

    /// Paste clipboard text as the entry path; blank clipboard is ignored
    pub fn paste_cookie_entry_path(&self, id: &str, clipboard: &str) -> Result<bool> {
        let text = clipboard.trim();
        if text.is_empty() {
            return Ok(false);
        }
        self.update_entry(id, CookieEntryUpdate::path(text))?;
        Ok(true)
    }

    pub fn remove_cookie_entry(&self, id: &str) -> Result<()> {
        if !self.cookies.remove(id)? {
            return Err(PrefsError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Make `id` the active cookie source and switch the browser to `custom`
    pub fn select_cookie_entry(&self, id: &str) -> Result<()> {
        if self.cookies.get(id)?.is_none() {
            return Err(PrefsError::NotFound(id.to_string()));
        }
        self.cookies.set_selected(Some(id))?;
        self.settings.set_browser(CUSTOM_BROWSER)
    }

    pub fn clear_cookie_selection(&self) -> Result<()> {
        self.cookies.set_selected(None)
    }

    /// Entries in display order with the status line for the selected one
    pub fn cookie_rows(&self) -> Result<Vec<CookieRow>> {
        let selected = self.cookies.selected_id()?;
        let entries = self.cookies.list()?;
        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            let is_selected = selected.as_deref() == Some(entry.id.as_str());
            let status = self.cookies.status(&entry)?;
            let found = status
                .as_ref()
                .map(|status| matches!(status, CookieStatus::Found(_)));
            let status = status.map(|status| self.status_text(&status));
            rows.push(CookieRow {
                entry,
                selected: is_selected,
                status,
                found,
            });
        }
        Ok(rows)
    }

    pub fn status_text(&self, status: &CookieStatus) -> String {
        match status {
            CookieStatus::Found(found) => format!(
                "{}\n{} {}",
                self.tr("cookiesFound"),
                self.tr("cookiesFoundAt"),
                found.cookies_path.display()
            ),
            CookieStatus::NotFound => format!(
                "{}\n{}",
                self.tr("cookiesNotFound"),
                self.tr("cookiesNotFoundHelp")
            ),
        }
    }

    /// Resolve an arbitrary (browser, path) pair without storing it
    pub fn resolve(&self, browser: &str, path: &Path) -> CookieStatus {
        let path = path.to_string_lossy();
        match self.cookies.resolver().resolve(browser, &path) {
            Some(found) => CookieStatus::Found(found),
            None => CookieStatus::NotFound,
        }
    }

    fn update_entry(&self, id: &str, update: CookieEntryUpdate) -> Result<()> {
        if !self.cookies.update(id, update)? {
            return Err(PrefsError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn parse_browser(value: &str) -> Result<Browser> {
    value
        .trim()
        .to_ascii_lowercase()
        .parse::<Browser>()
        .map_err(|_| PrefsError::InvalidSetting {
            key: "browser".to_string(),
            detail: format!("unsupported browser '{}'", value),
        })
}
