//! dlprefs - preferences backend for a media downloader
//!
//! This crate persists the settings of a yt-dlp front end in a local
//! key-value store, tracks user-declared browser cookie sources and
//! locates the cookie database inside Chromium and Firefox profiles.

pub mod browser;
pub mod cli;
pub mod config;
pub mod cookies;
pub mod error;
pub mod exit_code;
pub mod host;
pub mod i18n;
pub mod logging;
pub mod output;
pub mod preferences;
pub mod settings;
pub mod storage;
pub mod utils;

pub use error::{PrefsError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
