//! CLI argument parsing module
//!
//! This module handles command-line argument parsing and application entry point.

use crate::config::{AppConfig, OutputConfig, STORE_ENV};
use crate::cookies::CookieStatus;
use crate::error::{PrefsError, Result};
use crate::exit_code::exit_code_for_error;
use crate::host::JsonLinesHost;
use crate::i18n;
use crate::output::OutputWriter;
use crate::preferences::{Notice, Preferences};
use crate::settings::{SettingKey, SettingsRepository};
use crate::storage::{KeyValueStore, SqliteStore};
use crate::utils::FileUtils;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io;
use unic_langid::LanguageIdentifier;

type CliPreferences<'a> = Preferences<&'a SqliteStore, JsonLinesHost<io::Stdout>>;

/// Main entry point for the CLI application
pub fn run() {
    let matches = create_app().get_matches();
    crate::logging::init(matches.get_flag("verbose"));

    match run_with_args(&matches) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            let langid = stored_language(&matches);
            eprintln!("dlprefs: error: {}", i18n::localize_error(&langid, &e));
            std::process::exit(exit_code_for_error(&e));
        }
    }
}

/// Language for error messages: the stored locale when an existing store
/// can be read, else the environment
fn stored_language(matches: &ArgMatches) -> LanguageIdentifier {
    let store = matches.get_one::<String>("store").map(String::as_str);
    let locale = AppConfig::new(store, OutputConfig::default())
        .ok()
        .filter(|config| config.store_path.is_file())
        .and_then(|config| SqliteStore::open(&config.store_path).ok())
        .and_then(|store| {
            let locale = SettingsRepository::new(&store).locale();
            locale.ok().flatten()
        });
    i18n::resolve_language(locale.as_deref())
}

/// Run with parsed arguments; `Ok(false)` means an error notice was shown
fn run_with_args(matches: &ArgMatches) -> Result<bool> {
    let output_config = OutputConfig {
        verbose: matches.get_flag("verbose"),
        silent: matches.get_flag("silent"),
        format_json: matches.get_flag("json"),
    };
    let config = AppConfig::new(
        matches.get_one::<String>("store").map(String::as_str),
        output_config.clone(),
    )?;
    let mut out = OutputWriter::new(output_config);
    out.write_verbose(&format!("Using store {:?}", config.store_path))?;

    let store = SqliteStore::open(&config.store_path)?;
    let locale = SettingsRepository::new(&store).locale()?;
    let langid = i18n::resolve_language(locale.as_deref());
    let prefs: CliPreferences<'_> =
        Preferences::new(&store, JsonLinesHost::new(io::stdout()), langid);

    let notice = match matches.subcommand() {
        Some(("get", sub)) => {
            let key = setting_key(sub)?;
            out.write_line(&prefs.settings().display(key)?)?;
            None
        }
        Some(("set", sub)) => {
            let key = setting_key(sub)?;
            prefs.set_setting(key, required(sub, "value")?)?
        }
        Some(("reset", sub)) => {
            let key = setting_key(sub)?;
            reset_setting(prefs.settings(), key)?;
            None
        }
        Some(("list", _)) => {
            let pairs = SettingKey::ALL
                .iter()
                .map(|key| Ok((key.to_string(), prefs.settings().display(*key)?)))
                .collect::<Result<Vec<_>>>()?;
            out.write_pairs(&pairs)?;
            None
        }
        Some(("language", sub)) => {
            prefs.change_language(required(sub, "code")?)?;
            None
        }
        Some(("browser", sub)) => {
            prefs.change_browser(required(sub, "name")?)?;
            None
        }
        Some(("tray", sub)) => {
            let state = required(sub, "state")?;
            let enabled = crate::settings::parse_bool(SettingKey::CloseToTray, state)?;
            prefs.set_close_to_tray(enabled)?;
            None
        }
        Some(("download-path", sub)) => {
            Some(prefs.on_download_path_picked(&[required(sub, "path")?.to_string()])?)
        }
        Some(("config-path", sub)) => {
            if sub.get_flag("clear") {
                Some(prefs.disable_config_file()?)
            } else if let Some(path) = sub.get_one::<String>("path") {
                Some(prefs.on_config_path_picked(path)?)
            } else {
                let path = prefs.settings().display(SettingKey::ConfigPath)?;
                out.write_line(&path)?;
                None
            }
        }
        Some(("edit-config", _)) => prefs.edit_config()?,
        Some(("pick-location", _)) => {
            prefs.request_download_location()?;
            None
        }
        Some(("pick-config", _)) => {
            prefs.request_config_file()?;
            None
        }
        Some(("restore-tray", _)) => {
            prefs.restore_tray_state()?;
            None
        }
        Some(("reload", _)) => {
            prefs.reload()?;
            None
        }
        Some(("close", _)) => {
            prefs.close()?;
            None
        }
        Some(("cookies", sub)) => run_cookies(&prefs, &mut out, sub)?,
        _ => {
            return Err(PrefsError::Config("No command given".to_string()));
        }
    };

    match notice {
        Some(notice) => {
            out.write_notice(&notice)?;
            Ok(!notice.is_error())
        }
        None => Ok(true),
    }
}

fn run_cookies(
    prefs: &CliPreferences<'_>,
    out: &mut OutputWriter,
    matches: &ArgMatches,
) -> Result<Option<Notice>> {
    let langid = prefs.language().clone();
    match matches.subcommand() {
        Some(("list", _)) => {
            let rows = prefs.cookie_rows()?;
            out.write_cookie_rows(&rows, &i18n::translate(&langid, "noCookieEntries"))?;
        }
        Some(("add", sub)) => {
            let browser = sub.get_one::<String>("browser").map(String::as_str);
            let path = sub.get_one::<String>("path").map(String::as_str).unwrap_or("");
            let entry = prefs.add_cookie_entry(browser, path)?;
            if sub.get_flag("select") {
                prefs.select_cookie_entry(&entry.id)?;
            }
            out.write_line(&entry.id)?;
        }
        Some(("set-browser", sub)) => {
            prefs.set_cookie_entry_browser(required(sub, "id")?, required(sub, "browser")?)?;
        }
        Some(("set-path", sub)) => {
            prefs.set_cookie_entry_path(required(sub, "id")?, required(sub, "path")?)?;
        }
        Some(("paste", sub)) => {
            prefs.paste_cookie_entry_path(required(sub, "id")?, required(sub, "text")?)?;
        }
        Some(("remove", sub)) => {
            prefs.remove_cookie_entry(required(sub, "id")?)?;
        }
        Some(("select", sub)) => {
            prefs.select_cookie_entry(required(sub, "id")?)?;
        }
        Some(("deselect", _)) => {
            prefs.clear_cookie_selection()?;
        }
        Some(("selected", _)) => match prefs.cookies().selected()? {
            Some(entry) => {
                out.write_line(&format!("{}\t{}\t{}", entry.id, entry.browser, entry.path))?;
                if let Some(status) = prefs.cookies().selected_status()? {
                    out.write_line(&prefs.status_text(&status))?;
                }
            }
            None => return Ok(None),
        },
        Some(("resolve", sub)) => {
            let browser = required(sub, "browser")?;
            let path = FileUtils::expand_path(required(sub, "path")?.trim())?;
            let status = prefs.resolve(browser, &path);
            let text = prefs.status_text(&status);
            return Ok(Some(match status {
                CookieStatus::Found(found) => {
                    out.write_verbose(&format!("Profile directory {:?}", found.profile_path))?;
                    Notice::success(text)
                }
                CookieStatus::NotFound => Notice::error(text),
            }));
        }
        _ => {
            return Err(PrefsError::Config("No cookies command given".to_string()));
        }
    }
    Ok(None)
}

fn reset_setting<S: KeyValueStore>(settings: &SettingsRepository<S>, key: SettingKey) -> Result<()> {
    match key {
        SettingKey::FilenameFormat => settings.reset_filename_format(),
        SettingKey::FoldernameFormat => settings.reset_foldername_format(),
        _ => settings.reset(key),
    }
}

fn setting_key(matches: &ArgMatches) -> Result<SettingKey> {
    required(matches, "key")?.parse()
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| PrefsError::Config(format!("Missing argument: {}", name)))
}

/// Create the CLI application structure
pub fn create_app() -> Command {
    Command::new("dlprefs")
        .version(crate::VERSION)
        .about("Manage media downloader preferences and browser cookie sources")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("store")
                .long("store")
                .value_name("FILE")
                .env(STORE_ENV)
                .global(true)
                .help("Preference store location"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .help("Verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .global(true)
                .help("Silent mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .help("Print lists as JSON")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("get")
                .about("Print the effective value of a preference")
                .arg(key_arg()),
        )
        .subcommand(
            Command::new("set")
                .about("Change a preference")
                .arg(key_arg())
                .arg(
                    Arg::new("value")
                        .required(true)
                        .allow_hyphen_values(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("reset")
                .about("Restore a preference to its default")
                .arg(key_arg()),
        )
        .subcommand(Command::new("list").about("Print every preference"))
        .subcommand(
            Command::new("language")
                .about("Change the interface language")
                .arg(Arg::new("code").required(true).index(1)),
        )
        .subcommand(
            Command::new("browser")
                .about("Choose the browser to take cookies from (or 'custom')")
                .arg(Arg::new("name").required(true).index(1)),
        )
        .subcommand(
            Command::new("tray")
                .about("Keep running in the system tray when closed")
                .arg(Arg::new("state").required(true).index(1).value_name("on|off")),
        )
        .subcommand(
            Command::new("download-path")
                .about("Use a directory for downloads")
                .arg(Arg::new("path").required(true).index(1)),
        )
        .subcommand(
            Command::new("config-path")
                .about("Show, set or clear the yt-dlp config file")
                .arg(Arg::new("path").index(1).conflicts_with("clear"))
                .arg(
                    Arg::new("clear")
                        .long("clear")
                        .help("Stop using a config file")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("edit-config").about("Open the yt-dlp config file"))
        .subcommand(Command::new("pick-location").about("Ask the host for a download directory"))
        .subcommand(Command::new("pick-config").about("Ask the host for a config file"))
        .subcommand(Command::new("restore-tray").about("Re-announce tray behavior to the host"))
        .subcommand(Command::new("reload").about("Ask the host to reload"))
        .subcommand(Command::new("close").about("Ask the host to close preferences"))
        .subcommand(cookies_command())
}

fn key_arg() -> Arg {
    Arg::new("key")
        .required(true)
        .index(1)
        .value_name("KEY")
        .help("Preference key, e.g. filenameFormat")
}

fn cookies_command() -> Command {
    let id = || Arg::new("id").required(true).index(1);
    Command::new("cookies")
        .about("Manage custom browser cookie locations")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List cookie locations"))
        .subcommand(
            Command::new("add")
                .about("Add a cookie location")
                .arg(
                    Arg::new("browser")
                        .long("browser")
                        .short('b')
                        .value_name("BROWSER"),
                )
                .arg(Arg::new("path").long("path").short('p').value_name("PATH"))
                .arg(
                    Arg::new("select")
                        .long("select")
                        .help("Make the new location active")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("set-browser")
                .about("Change the browser of a location")
                .arg(id())
                .arg(Arg::new("browser").required(true).index(2)),
        )
        .subcommand(
            Command::new("set-path")
                .about("Change the path of a location")
                .arg(id())
                .arg(Arg::new("path").required(true).index(2)),
        )
        .subcommand(
            Command::new("paste")
                .about("Use clipboard text as the path of a location")
                .arg(id())
                .arg(Arg::new("text").required(true).index(2)),
        )
        .subcommand(Command::new("remove").about("Delete a location").arg(id()))
        .subcommand(Command::new("select").about("Make a location active").arg(id()))
        .subcommand(Command::new("deselect").about("Clear the active location"))
        .subcommand(Command::new("selected").about("Show the active location"))
        .subcommand(
            Command::new("resolve")
                .about("Find the cookie database for a browser path")
                .arg(Arg::new("browser").required(true).index(1))
                .arg(Arg::new("path").required(true).index(2)),
        )
}
