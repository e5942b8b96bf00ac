use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::Path;
use std::process::Output;
use tempfile::tempdir;

fn dlprefs(store: &Path, args: &[&str]) -> Output {
    cargo_bin_cmd!("dlprefs")
        .env_remove("DLPREFS_STORE")
        .env_remove("LC_ALL")
        .env_remove("LC_MESSAGES")
        .env("LANG", "en_US.UTF-8")
        .arg("--store")
        .arg(store)
        .args(args)
        .output()
        .expect("run dlprefs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_cli_help_succeeds() {
    let output = cargo_bin_cmd!("dlprefs")
        .arg("--help")
        .output()
        .expect("run dlprefs");
    assert!(output.status.success(), "help should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "help should include usage text");
    assert!(stdout.contains("cookies"));
}

#[test]
fn test_set_then_get_persists_between_runs() {
    let temp = tempdir().expect("tempdir");
    let store = temp.path().join("prefs.sqlite");

    let output = dlprefs(&store, &["get", "theme"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "frappe\n");

    assert!(dlprefs(&store, &["set", "downloadGridColumns", "42"]).status.success());
    let output = dlprefs(&store, &["get", "downloadGridColumns"]);
    assert_eq!(stdout(&output), "10\n");

    assert!(dlprefs(&store, &["reset", "downloadGridColumns"]).status.success());
    let output = dlprefs(&store, &["get", "downloadGridColumns"]);
    assert_eq!(stdout(&output), "5\n");
}

#[test]
fn test_unknown_key_and_bad_proxy_fail() {
    let temp = tempdir().expect("tempdir");
    let store = temp.path().join("prefs.sqlite");

    let output = dlprefs(&store, &["get", "noSuchKey"]);
    assert_eq!(output.status.code(), Some(2));

    let output = dlprefs(&store, &["set", "proxy", "not a url"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_list_as_json_contains_every_key() {
    let temp = tempdir().expect("tempdir");
    let store = temp.path().join("prefs.sqlite");

    let output = dlprefs(&store, &["--json", "list"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(value["theme"], "frappe");
    assert_eq!(value["autoUpdate"], "true");
    assert_eq!(value.as_object().map(|m| m.len()), Some(20));
}

#[test]
fn test_tray_and_reload_emit_host_messages() {
    let temp = tempdir().expect("tempdir");
    let store = temp.path().join("prefs.sqlite");

    let output = dlprefs(&store, &["tray", "on"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "{\"channel\":\"useTray\",\"payload\":true}\n");

    let output = dlprefs(&store, &["reload"]);
    assert_eq!(stdout(&output), "{\"channel\":\"reload\"}\n");

    let output = dlprefs(&store, &["get", "closeToTray"]);
    assert_eq!(stdout(&output), "true\n");
}

#[test]
fn test_download_path_rejects_missing_directory() {
    let temp = tempdir().expect("tempdir");
    let store = temp.path().join("prefs.sqlite");
    let missing = temp.path().join("missing");

    let output = dlprefs(&store, &["download-path", missing.to_str().expect("utf-8")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("write permission"));

    let downloads = temp.path().join("downloads");
    fs::create_dir(&downloads).expect("create downloads");
    let downloads = downloads.to_str().expect("utf-8");
    let output = dlprefs(&store, &["download-path", downloads]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(downloads));
}

#[test]
fn test_cookie_entries_lifecycle() {
    let temp = tempdir().expect("tempdir");
    let store = temp.path().join("prefs.sqlite");
    let profile = temp.path().join("chromium");
    fs::create_dir_all(profile.join("Default")).expect("create profile");
    fs::write(profile.join("Default").join("Cookies"), b"").expect("write cookies");
    let profile = profile.to_str().expect("utf-8");

    let output = dlprefs(&store, &["cookies", "list"]);
    assert_eq!(stdout(&output), "No custom cookie locations yet\n");

    let output = dlprefs(
        &store,
        &["cookies", "add", "--browser", "chrome", "--path", profile, "--select"],
    );
    assert!(output.status.success());
    let id = stdout(&output).trim().to_string();
    assert!(id.starts_with("c_"));
    assert_eq!(id.len(), 10);

    let output = dlprefs(&store, &["get", "browser"]);
    assert_eq!(stdout(&output), "custom\n");

    let output = dlprefs(&store, &["cookies", "list"]);
    let listing = stdout(&output);
    assert!(listing.starts_with(&format!("* {}  Chrome ", id)));
    assert!(listing.contains("Cookies found"));

    assert!(dlprefs(&store, &["browser", "firefox"]).status.success());
    let output = dlprefs(&store, &["cookies", "selected"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");

    assert!(dlprefs(&store, &["cookies", "remove", &id]).status.success());
    let output = dlprefs(&store, &["cookies", "remove", &id]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_cookies_resolve_reports_status() {
    let temp = tempdir().expect("tempdir");
    let store = temp.path().join("prefs.sqlite");
    let release = temp.path().join("firefox").join("xyz.default-release");
    fs::create_dir_all(&release).expect("create profile");
    fs::write(release.join("cookies.sqlite"), b"").expect("write db");
    let root = temp.path().join("firefox");
    let root = root.to_str().expect("utf-8");

    let output = dlprefs(&store, &["cookies", "resolve", "firefox", root]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Cookies found\n"));
    assert!(text.contains("xyz.default-release"));

    let output = dlprefs(&store, &["cookies", "resolve", "safari", root]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cookies not found"));
}

#[test]
fn test_errors_follow_stored_language() {
    let temp = tempdir().expect("tempdir");
    let store = temp.path().join("prefs.sqlite");

    assert!(dlprefs(&store, &["language", "de"]).status.success());
    let output = dlprefs(&store, &["cookies", "remove", "c_missing"]);
    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Kein Cookie-Pfad mit der ID c_missing"),
        "unexpected stderr: {}",
        stderr
    );
}
