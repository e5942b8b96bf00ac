use super::{
    clamp_number, default_download_path, DownloadLayout, SettingKey, SettingsRepository,
    DEFAULT_FILENAME_FORMAT, DEFAULT_FOLDERNAME_FORMAT,
};
use crate::error::PrefsError;
use crate::storage::{KeyValueStore, MemoryStore};
use std::path::PathBuf;

#[test]
fn defaults_apply_on_empty_store() {
    let settings = SettingsRepository::new(MemoryStore::new());
    assert_eq!(settings.theme().expect("theme"), "frappe");
    assert!(!settings.right_to_left().expect("rtl"));
    assert_eq!(
        settings.download_path().expect("download path"),
        default_download_path()
    );
    assert_eq!(settings.config_path().expect("config path"), None);
    assert_eq!(
        settings.download_layout().expect("layout"),
        DownloadLayout::Grid
    );
    assert_eq!(settings.grid_columns().expect("columns"), 5);
    assert_eq!(settings.grid_item_height().expect("height"), 240);
    assert_eq!(
        settings.filename_format().expect("filename"),
        DEFAULT_FILENAME_FORMAT
    );
    assert_eq!(
        settings.foldername_format().expect("foldername"),
        DEFAULT_FOLDERNAME_FORMAT
    );
    assert!(settings.auto_update().expect("auto update"));
    assert!(!settings.close_to_tray().expect("tray"));
    assert!(!settings.show_more_formats().expect("formats"));
}

#[test]
fn default_download_path_is_under_home() {
    let home = dirs::home_dir().expect("home dir");
    assert_eq!(default_download_path(), home.join("Downloads"));
}

#[test]
fn setting_keys_parse_from_storage_names() {
    for key in SettingKey::ALL {
        assert_eq!(key.as_str().parse::<SettingKey>().expect("known key"), key);
    }
    let err = "colour".parse::<SettingKey>().expect_err("unknown key");
    assert!(matches!(err, PrefsError::Config(_)));
}

#[test]
fn locale_derives_text_direction() {
    let settings = SettingsRepository::new(MemoryStore::new());
    settings.set_locale("fa").expect("set fa");
    assert!(settings.right_to_left().expect("rtl"));
    settings.set_locale("ar").expect("set ar");
    assert!(settings.right_to_left().expect("rtl"));
    settings.set_locale("de").expect("set de");
    assert!(!settings.right_to_left().expect("rtl"));
    assert_eq!(settings.locale().expect("locale"), Some("de".to_string()));
}

#[test]
fn english_variants_read_back_as_en() {
    let kv = MemoryStore::new();
    kv.set("locale", "en-GB").expect("seed");
    let settings = SettingsRepository::new(&kv);
    assert_eq!(settings.locale().expect("locale"), Some("en".to_string()));
}

#[test]
fn layout_treats_unknown_values_as_list() {
    let kv = MemoryStore::new();
    let settings = SettingsRepository::new(&kv);
    kv.set("downloadLayout", "mosaic").expect("seed");
    assert_eq!(settings.download_layout().expect("layout"), DownloadLayout::List);
    settings
        .set_plain(SettingKey::DownloadLayout, "grid")
        .expect("set layout");
    assert_eq!(kv.get("downloadLayout").expect("get"), Some("grid".to_string()));
}

#[test]
fn numeric_inputs_are_clamped() {
    assert_eq!(clamp_number("7.9", (1, 10), 5), 7);
    assert_eq!(clamp_number("42", (1, 10), 5), 10);
    assert_eq!(clamp_number("0", (1, 10), 5), 5);
    assert_eq!(clamp_number("", (1, 10), 5), 5);
    assert_eq!(clamp_number("wide", (1, 10), 5), 5);
    assert_eq!(clamp_number("inf", (1, 10), 5), 5);

    let settings = SettingsRepository::new(MemoryStore::new());
    assert_eq!(settings.set_grid_columns("12").expect("columns"), 10);
    assert_eq!(settings.grid_columns().expect("columns"), 10);
    assert_eq!(settings.set_grid_item_height("90").expect("height"), 240);
    assert_eq!(settings.set_grid_item_height("1000").expect("height"), 800);
    assert_eq!(settings.grid_item_height().expect("height"), 800);
}

#[test]
fn max_active_downloads_floors_at_one() {
    let settings = SettingsRepository::new(MemoryStore::new());
    assert_eq!(settings.max_active_downloads().expect("limit"), None);
    assert_eq!(settings.set_max_active_downloads("0").expect("set"), 1);
    assert_eq!(settings.set_max_active_downloads("-4").expect("set"), 1);
    assert_eq!(settings.set_max_active_downloads(" 6 ").expect("set"), 6);
    assert_eq!(settings.max_active_downloads().expect("limit"), Some(6));

    let err = settings
        .set_max_active_downloads("many")
        .expect_err("invalid number");
    assert!(matches!(err, PrefsError::InvalidSetting { .. }));
}

#[test]
fn proxy_must_be_a_url_or_empty() {
    let settings = SettingsRepository::new(MemoryStore::new());
    settings
        .set_proxy(" socks5://127.0.0.1:9050 ")
        .expect("valid proxy");
    assert_eq!(
        settings.proxy().expect("proxy"),
        Some("socks5://127.0.0.1:9050".to_string())
    );

    let err = settings.set_proxy("not a proxy").expect_err("invalid proxy");
    assert!(matches!(err, PrefsError::InvalidSetting { .. }));

    settings.set_proxy("").expect("clear proxy");
    assert_eq!(settings.proxy().expect("proxy"), None);
}

#[test]
fn browser_accepts_known_ids_custom_and_empty() {
    let settings = SettingsRepository::new(MemoryStore::new());
    settings.set_browser("firefox").expect("firefox");
    settings.set_browser("custom").expect("custom");
    assert_eq!(settings.browser().expect("browser"), Some("custom".to_string()));
    settings.set_browser("").expect("none");
    assert_eq!(settings.browser().expect("browser"), None);
    assert!(settings.set_browser("netscape").is_err());
}

#[test]
fn templates_reset_to_defaults() {
    let settings = SettingsRepository::new(MemoryStore::new());
    settings.set_filename_format("%(title)s.%(ext)s").expect("set");
    settings.set_foldername_format("%(uploader)s").expect("set");
    assert_eq!(settings.filename_format().expect("get"), "%(title)s.%(ext)s");

    settings.reset_filename_format().expect("reset");
    settings.reset_foldername_format().expect("reset");
    assert_eq!(settings.filename_format().expect("get"), DEFAULT_FILENAME_FORMAT);
    assert_eq!(
        settings.foldername_format().expect("get"),
        DEFAULT_FOLDERNAME_FORMAT
    );
}

#[test]
fn custom_args_are_trimmed() {
    let settings = SettingsRepository::new(MemoryStore::new());
    settings
        .set_custom_ytdlp_args("  --embed-subs --no-mtime \n")
        .expect("set");
    assert_eq!(
        settings.custom_ytdlp_args().expect("get"),
        "--embed-subs --no-mtime"
    );
}

#[test]
fn auto_update_is_on_unless_disabled() {
    let kv = MemoryStore::new();
    let settings = SettingsRepository::new(&kv);
    kv.set("autoUpdate", "garbage").expect("seed");
    assert!(settings.auto_update().expect("auto update"));
    settings.set_plain(SettingKey::AutoUpdate, "off").expect("disable");
    assert!(!settings.auto_update().expect("auto update"));
}

#[test]
fn set_plain_rejects_keys_with_side_effects() {
    let settings = SettingsRepository::new(MemoryStore::new());
    for key in [
        SettingKey::DownloadPath,
        SettingKey::Locale,
        SettingKey::Browser,
        SettingKey::CloseToTray,
    ] {
        assert!(settings.set_plain(key, "x").is_err(), "{key} accepted");
    }
    let err = settings
        .set_plain(SettingKey::ShowMoreFormats, "maybe")
        .expect_err("bad bool");
    assert!(matches!(err, PrefsError::InvalidSetting { .. }));
}

#[test]
fn display_and_reset_round_trip() {
    let settings = SettingsRepository::new(MemoryStore::new());
    settings.set_plain(SettingKey::Theme, "mocha").expect("set");
    settings
        .set_plain(SettingKey::ConfigPath, "/home/u/yt-dlp.conf")
        .expect("set");
    assert_eq!(settings.display(SettingKey::Theme).expect("display"), "mocha");
    assert_eq!(
        settings.config_path().expect("config"),
        Some(PathBuf::from("/home/u/yt-dlp.conf"))
    );

    settings.reset(SettingKey::Theme).expect("reset");
    assert_eq!(settings.display(SettingKey::Theme).expect("display"), "frappe");
    assert_eq!(settings.display(SettingKey::Proxy).expect("display"), "");
}
