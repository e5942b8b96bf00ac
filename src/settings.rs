//! Typed access to persisted preferences
//!
//! Each preference is a string in the key-value store. `SettingsRepository`
//! owns the key names, defaults and normalization rules so callers never
//! touch raw keys.

use crate::error::{PrefsError, Result};
use crate::storage::KeyValueStore;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

pub const DEFAULT_THEME: &str = "frappe";
pub const DEFAULT_FILENAME_FORMAT: &str = "%(playlist_index)s.%(title)s.%(ext)s";
pub const DEFAULT_FOLDERNAME_FORMAT: &str = "%(playlist_title)s";
pub const DEFAULT_GRID_COLUMNS: u32 = 5;
pub const DEFAULT_GRID_ITEM_HEIGHT: u32 = 240;

const GRID_COLUMNS_RANGE: (u32, u32) = (1, 10);
const GRID_ITEM_HEIGHT_RANGE: (u32, u32) = (120, 800);
const RTL_LANGUAGES: [&str; 2] = ["fa", "ar"];

/// Value of the global `browser` preference meaning "use the selected
/// custom cookie entry"
pub const CUSTOM_BROWSER: &str = "custom";

/// Every preference key known to the preferences screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Theme,
    RightToLeft,
    DownloadPath,
    ConfigPath,
    Locale,
    DownloadLayout,
    GridColumns,
    GridItemHeight,
    Browser,
    PreferredVideoQuality,
    PreferredAudioQuality,
    PreferredVideoCodec,
    Proxy,
    CustomYtDlpArgs,
    FilenameFormat,
    FoldernameFormat,
    MaxActiveDownloads,
    CloseToTray,
    AutoUpdate,
    ShowMoreFormats,
}

impl SettingKey {
    pub const ALL: [SettingKey; 20] = [
        SettingKey::Theme,
        SettingKey::RightToLeft,
        SettingKey::DownloadPath,
        SettingKey::ConfigPath,
        SettingKey::Locale,
        SettingKey::DownloadLayout,
        SettingKey::GridColumns,
        SettingKey::GridItemHeight,
        SettingKey::Browser,
        SettingKey::PreferredVideoQuality,
        SettingKey::PreferredAudioQuality,
        SettingKey::PreferredVideoCodec,
        SettingKey::Proxy,
        SettingKey::CustomYtDlpArgs,
        SettingKey::FilenameFormat,
        SettingKey::FoldernameFormat,
        SettingKey::MaxActiveDownloads,
        SettingKey::CloseToTray,
        SettingKey::AutoUpdate,
        SettingKey::ShowMoreFormats,
    ];

    /// Storage key shared with the desktop front end
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::Theme => "theme",
            SettingKey::RightToLeft => "rightToLeft",
            SettingKey::DownloadPath => "downloadPath",
            SettingKey::ConfigPath => "configPath",
            SettingKey::Locale => "locale",
            SettingKey::DownloadLayout => "downloadLayout",
            SettingKey::GridColumns => "downloadGridColumns",
            SettingKey::GridItemHeight => "downloadGridItemHeight",
            SettingKey::Browser => "browser",
            SettingKey::PreferredVideoQuality => "preferredVideoQuality",
            SettingKey::PreferredAudioQuality => "preferredAudioQuality",
            SettingKey::PreferredVideoCodec => "preferredVideoCodec",
            SettingKey::Proxy => "proxy",
            SettingKey::CustomYtDlpArgs => "customYtDlpArgs",
            SettingKey::FilenameFormat => "filenameFormat",
            SettingKey::FoldernameFormat => "foldernameFormat",
            SettingKey::MaxActiveDownloads => "maxActiveDownloads",
            SettingKey::CloseToTray => "closeToTray",
            SettingKey::AutoUpdate => "autoUpdate",
            SettingKey::ShowMoreFormats => "showMoreFormats",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = PrefsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SettingKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| PrefsError::Config(format!("Unknown setting: {}", s)))
    }
}

/// Download list presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadLayout {
    Grid,
    List,
}

impl DownloadLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            DownloadLayout::Grid => "grid",
            DownloadLayout::List => "list",
        }
    }

    /// Anything but `grid` means list
    pub fn from_stored(value: &str) -> Self {
        if value == "grid" {
            DownloadLayout::Grid
        } else {
            DownloadLayout::List
        }
    }
}

/// Clamp a numeric field the way the form inputs do: floor, cap at `max`,
/// and fall back to `default` for anything non-numeric or below `min`.
fn clamp_number(value: &str, (min, max): (u32, u32), default: u32) -> u32 {
    match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() && number >= f64::from(min) => {
            number.floor().min(f64::from(max)) as u32
        }
        _ => default,
    }
}

pub(crate) fn parse_bool(key: SettingKey, value: &str) -> Result<bool> {
    match value.trim() {
        "true" | "on" | "1" | "yes" => Ok(true),
        "false" | "off" | "0" | "no" => Ok(false),
        other => Err(PrefsError::InvalidSetting {
            key: key.to_string(),
            detail: format!("expected true or false, got '{}'", other),
        }),
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Default download directory: `~/Downloads`
pub fn default_download_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("Downloads"))
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}

/// Typed repository over the persisted preference keys
pub struct SettingsRepository<S> {
    store: S,
}

impl<S: KeyValueStore> SettingsRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn raw(&self, key: SettingKey) -> Result<Option<String>> {
        self.store.get(key.as_str())
    }

    /// Stored value, treating an empty string as unset
    fn non_empty(&self, key: SettingKey) -> Result<Option<String>> {
        Ok(self.raw(key)?.filter(|value| !value.is_empty()))
    }

    fn put(&self, key: SettingKey, value: &str) -> Result<()> {
        log::debug!("Setting {} = {:?}", key, value);
        self.store.set(key.as_str(), value)
    }

    /// Forget the stored value so the default applies again
    pub fn reset(&self, key: SettingKey) -> Result<()> {
        log::debug!("Resetting {}", key);
        self.store.remove(key.as_str())
    }

    pub fn theme(&self) -> Result<String> {
        Ok(self
            .non_empty(SettingKey::Theme)?
            .unwrap_or_else(|| DEFAULT_THEME.to_string()))
    }

    pub fn set_theme(&self, theme: &str) -> Result<()> {
        self.put(SettingKey::Theme, theme)
    }

    pub fn right_to_left(&self) -> Result<bool> {
        Ok(self.raw(SettingKey::RightToLeft)?.as_deref() == Some("true"))
    }

    pub fn set_right_to_left(&self, value: bool) -> Result<()> {
        self.put(SettingKey::RightToLeft, bool_str(value))
    }

    pub fn download_path(&self) -> Result<PathBuf> {
        Ok(self
            .non_empty(SettingKey::DownloadPath)?
            .map(PathBuf::from)
            .unwrap_or_else(default_download_path))
    }

    /// Store the download directory as-is; access checks belong to the caller
    pub fn set_download_path(&self, path: &str) -> Result<()> {
        self.put(SettingKey::DownloadPath, path)
    }

    pub fn config_path(&self) -> Result<Option<PathBuf>> {
        Ok(self.non_empty(SettingKey::ConfigPath)?.map(PathBuf::from))
    }

    /// Set the yt-dlp config file; `None` stores an empty value
    pub fn set_config_path(&self, path: Option<&str>) -> Result<()> {
        self.put(SettingKey::ConfigPath, path.unwrap_or_default())
    }

    /// Interface language; every English variant reads back as `en`
    pub fn locale(&self) -> Result<Option<String>> {
        Ok(self.non_empty(SettingKey::Locale)?.map(|locale| {
            if locale.starts_with("en") {
                "en".to_string()
            } else {
                locale
            }
        }))
    }

    /// Store the language and derive the text direction from it
    pub fn set_locale(&self, locale: &str) -> Result<()> {
        self.put(SettingKey::Locale, locale)?;
        self.set_right_to_left(RTL_LANGUAGES.contains(&locale))
    }

    pub fn download_layout(&self) -> Result<DownloadLayout> {
        Ok(DownloadLayout::from_stored(
            self.raw(SettingKey::DownloadLayout)?
                .as_deref()
                .unwrap_or("grid"),
        ))
    }

    pub fn set_download_layout(&self, layout: DownloadLayout) -> Result<()> {
        self.put(SettingKey::DownloadLayout, layout.as_str())
    }

    pub fn grid_columns(&self) -> Result<u32> {
        Ok(self
            .raw(SettingKey::GridColumns)?
            .map(|v| clamp_number(&v, GRID_COLUMNS_RANGE, DEFAULT_GRID_COLUMNS))
            .unwrap_or(DEFAULT_GRID_COLUMNS))
    }

    /// Store a column count from form input, returning the value kept
    pub fn set_grid_columns(&self, input: &str) -> Result<u32> {
        let columns = clamp_number(input, GRID_COLUMNS_RANGE, DEFAULT_GRID_COLUMNS);
        self.put(SettingKey::GridColumns, &columns.to_string())?;
        Ok(columns)
    }

    pub fn grid_item_height(&self) -> Result<u32> {
        Ok(self
            .raw(SettingKey::GridItemHeight)?
            .map(|v| clamp_number(&v, GRID_ITEM_HEIGHT_RANGE, DEFAULT_GRID_ITEM_HEIGHT))
            .unwrap_or(DEFAULT_GRID_ITEM_HEIGHT))
    }

    /// Store a grid item height in pixels from form input, returning the value kept
    pub fn set_grid_item_height(&self, input: &str) -> Result<u32> {
        let height = clamp_number(input, GRID_ITEM_HEIGHT_RANGE, DEFAULT_GRID_ITEM_HEIGHT);
        self.put(SettingKey::GridItemHeight, &height.to_string())?;
        Ok(height)
    }

    /// Global cookie browser: a browser id, `custom`, or `None` for no cookies
    pub fn browser(&self) -> Result<Option<String>> {
        self.non_empty(SettingKey::Browser)
    }

    pub fn set_browser(&self, browser: &str) -> Result<()> {
        if !browser.is_empty()
            && browser != CUSTOM_BROWSER
            && browser.parse::<crate::browser::Browser>().is_err()
        {
            return Err(PrefsError::InvalidSetting {
                key: SettingKey::Browser.to_string(),
                detail: format!("unsupported browser '{}'", browser),
            });
        }
        self.put(SettingKey::Browser, browser)
    }

    pub fn preferred_video_quality(&self) -> Result<Option<String>> {
        self.non_empty(SettingKey::PreferredVideoQuality)
    }

    pub fn set_preferred_video_quality(&self, value: &str) -> Result<()> {
        self.put(SettingKey::PreferredVideoQuality, value)
    }

    pub fn preferred_audio_quality(&self) -> Result<Option<String>> {
        self.non_empty(SettingKey::PreferredAudioQuality)
    }

    pub fn set_preferred_audio_quality(&self, value: &str) -> Result<()> {
        self.put(SettingKey::PreferredAudioQuality, value)
    }

    pub fn preferred_video_codec(&self) -> Result<Option<String>> {
        self.non_empty(SettingKey::PreferredVideoCodec)
    }

    pub fn set_preferred_video_codec(&self, value: &str) -> Result<()> {
        self.put(SettingKey::PreferredVideoCodec, value)
    }

    pub fn proxy(&self) -> Result<Option<String>> {
        self.non_empty(SettingKey::Proxy)
    }

    /// Store a proxy URL; an empty value disables the proxy
    pub fn set_proxy(&self, proxy: &str) -> Result<()> {
        let proxy = proxy.trim();
        if !proxy.is_empty() {
            Url::parse(proxy).map_err(|e| PrefsError::InvalidSetting {
                key: SettingKey::Proxy.to_string(),
                detail: format!("invalid proxy URL '{}': {}", proxy, e),
            })?;
        }
        self.put(SettingKey::Proxy, proxy)
    }

    pub fn custom_ytdlp_args(&self) -> Result<String> {
        Ok(self.raw(SettingKey::CustomYtDlpArgs)?.unwrap_or_default())
    }

    pub fn set_custom_ytdlp_args(&self, args: &str) -> Result<()> {
        self.put(SettingKey::CustomYtDlpArgs, args.trim())
    }

    pub fn filename_format(&self) -> Result<String> {
        Ok(self
            .non_empty(SettingKey::FilenameFormat)?
            .unwrap_or_else(|| DEFAULT_FILENAME_FORMAT.to_string()))
    }

    pub fn set_filename_format(&self, format: &str) -> Result<()> {
        self.put(SettingKey::FilenameFormat, format)
    }

    pub fn reset_filename_format(&self) -> Result<()> {
        self.put(SettingKey::FilenameFormat, DEFAULT_FILENAME_FORMAT)
    }

    pub fn foldername_format(&self) -> Result<String> {
        Ok(self
            .non_empty(SettingKey::FoldernameFormat)?
            .unwrap_or_else(|| DEFAULT_FOLDERNAME_FORMAT.to_string()))
    }

    pub fn set_foldername_format(&self, format: &str) -> Result<()> {
        self.put(SettingKey::FoldernameFormat, format)
    }

    pub fn reset_foldername_format(&self) -> Result<()> {
        self.put(SettingKey::FoldernameFormat, DEFAULT_FOLDERNAME_FORMAT)
    }

    pub fn max_active_downloads(&self) -> Result<Option<u32>> {
        Ok(self
            .non_empty(SettingKey::MaxActiveDownloads)?
            .and_then(|value| value.parse().ok()))
    }

    /// Store the concurrent download limit; anything below one becomes one
    pub fn set_max_active_downloads(&self, input: &str) -> Result<u32> {
        let requested: i64 = input
            .trim()
            .parse()
            .map_err(|_| PrefsError::InvalidSetting {
                key: SettingKey::MaxActiveDownloads.to_string(),
                detail: format!("expected a whole number, got '{}'", input),
            })?;
        let limit = u32::try_from(requested.max(1)).unwrap_or(u32::MAX);
        self.put(SettingKey::MaxActiveDownloads, &limit.to_string())?;
        Ok(limit)
    }

    pub fn close_to_tray(&self) -> Result<bool> {
        Ok(self.raw(SettingKey::CloseToTray)?.as_deref() == Some("true"))
    }

    pub fn set_close_to_tray(&self, value: bool) -> Result<()> {
        self.put(SettingKey::CloseToTray, bool_str(value))
    }

    /// Updates stay on unless explicitly disabled
    pub fn auto_update(&self) -> Result<bool> {
        Ok(self.raw(SettingKey::AutoUpdate)?.as_deref() != Some("false"))
    }

    pub fn set_auto_update(&self, value: bool) -> Result<()> {
        self.put(SettingKey::AutoUpdate, bool_str(value))
    }

    pub fn show_more_formats(&self) -> Result<bool> {
        Ok(self.raw(SettingKey::ShowMoreFormats)?.as_deref() == Some("true"))
    }

    pub fn set_show_more_formats(&self, value: bool) -> Result<()> {
        self.put(SettingKey::ShowMoreFormats, bool_str(value))
    }

    /// Effective value of `key` rendered as text; empty when unset
    pub fn display(&self, key: SettingKey) -> Result<String> {
        let value = match key {
            SettingKey::Theme => self.theme()?,
            SettingKey::RightToLeft => bool_str(self.right_to_left()?).to_string(),
            SettingKey::DownloadPath => self.download_path()?.display().to_string(),
            SettingKey::ConfigPath => self
                .config_path()?
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            SettingKey::Locale => self.locale()?.unwrap_or_default(),
            SettingKey::DownloadLayout => self.download_layout()?.as_str().to_string(),
            SettingKey::GridColumns => self.grid_columns()?.to_string(),
            SettingKey::GridItemHeight => self.grid_item_height()?.to_string(),
            SettingKey::Browser => self.browser()?.unwrap_or_default(),
            SettingKey::PreferredVideoQuality => {
                self.preferred_video_quality()?.unwrap_or_default()
            }
            SettingKey::PreferredAudioQuality => {
                self.preferred_audio_quality()?.unwrap_or_default()
            }
            SettingKey::PreferredVideoCodec => self.preferred_video_codec()?.unwrap_or_default(),
            SettingKey::Proxy => self.proxy()?.unwrap_or_default(),
            SettingKey::CustomYtDlpArgs => self.custom_ytdlp_args()?,
            SettingKey::FilenameFormat => self.filename_format()?,
            SettingKey::FoldernameFormat => self.foldername_format()?,
            SettingKey::MaxActiveDownloads => self
                .max_active_downloads()?
                .map(|v| v.to_string())
                .unwrap_or_default(),
            SettingKey::CloseToTray => bool_str(self.close_to_tray()?).to_string(),
            SettingKey::AutoUpdate => bool_str(self.auto_update()?).to_string(),
            SettingKey::ShowMoreFormats => bool_str(self.show_more_formats()?).to_string(),
        };
        Ok(value)
    }

    /// Store `value` for a key that needs no host interaction.
    ///
    /// Keys with side effects (download path, locale, browser, tray) are
    /// routed through [`crate::preferences::Preferences`] instead.
    pub fn set_plain(&self, key: SettingKey, value: &str) -> Result<()> {
        match key {
            SettingKey::Theme => self.set_theme(value),
            SettingKey::RightToLeft => self.set_right_to_left(parse_bool(key, value)?),
            SettingKey::ConfigPath => {
                self.set_config_path(Some(value).filter(|v| !v.is_empty()))
            }
            SettingKey::DownloadLayout => {
                self.set_download_layout(DownloadLayout::from_stored(value.trim()))
            }
            SettingKey::GridColumns => self.set_grid_columns(value).map(|_| ()),
            SettingKey::GridItemHeight => self.set_grid_item_height(value).map(|_| ()),
            SettingKey::PreferredVideoQuality => self.set_preferred_video_quality(value),
            SettingKey::PreferredAudioQuality => self.set_preferred_audio_quality(value),
            SettingKey::PreferredVideoCodec => self.set_preferred_video_codec(value),
            SettingKey::Proxy => self.set_proxy(value),
            SettingKey::CustomYtDlpArgs => self.set_custom_ytdlp_args(value),
            SettingKey::FilenameFormat => self.set_filename_format(value),
            SettingKey::FoldernameFormat => self.set_foldername_format(value),
            SettingKey::MaxActiveDownloads => self.set_max_active_downloads(value).map(|_| ()),
            SettingKey::AutoUpdate => self.set_auto_update(parse_bool(key, value)?),
            SettingKey::ShowMoreFormats => self.set_show_more_formats(parse_bool(key, value)?),
            SettingKey::DownloadPath
            | SettingKey::Locale
            | SettingKey::Browser
            | SettingKey::CloseToTray => Err(PrefsError::Config(format!(
                "{} must be changed through the preferences binding",
                key
            ))),
        }
    }
}

#[cfg(test)]
mod tests;
