//! Browser cookie source discovery
//!
//! This module knows which browsers can act as cookie sources for
//! authenticated downloads and how each family lays out its profile
//! directories on disk.

use std::fmt;
use std::str::FromStr;

pub mod probe;
pub mod resolver;

pub use probe::{FsProbe, StdFs};
pub use resolver::{CookiePathResolver, ResolvedCookies};

/// Browsers supported as cookie sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Browser {
    #[default]
    Chromium,
    Chrome,
    Brave,
    Edge,
    Vivaldi,
    Opera,
    Firefox,
    LibreWolf,
    Waterfox,
}

/// On-disk cookie storage convention shared by a group of browsers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserFamily {
    Chromium,
    Firefox,
}

impl Browser {
    pub const ALL: [Browser; 9] = [
        Browser::Chromium,
        Browser::Chrome,
        Browser::Brave,
        Browser::Edge,
        Browser::Vivaldi,
        Browser::Opera,
        Browser::Firefox,
        Browser::LibreWolf,
        Browser::Waterfox,
    ];

    pub fn family(self) -> BrowserFamily {
        match self {
            Browser::Chromium
            | Browser::Chrome
            | Browser::Brave
            | Browser::Edge
            | Browser::Vivaldi
            | Browser::Opera => BrowserFamily::Chromium,
            Browser::Firefox | Browser::LibreWolf | Browser::Waterfox => BrowserFamily::Firefox,
        }
    }

    /// Identifier as persisted in storage
    pub fn id(self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Chrome => "chrome",
            Browser::Brave => "brave",
            Browser::Edge => "edge",
            Browser::Vivaldi => "vivaldi",
            Browser::Opera => "opera",
            Browser::Firefox => "firefox",
            Browser::LibreWolf => "librewolf",
            Browser::Waterfox => "waterfox",
        }
    }

    /// Human readable label for pickers
    pub fn label(self) -> &'static str {
        match self {
            Browser::Chromium => "Chromium",
            Browser::Chrome => "Chrome",
            Browser::Brave => "Brave",
            Browser::Edge => "Edge",
            Browser::Vivaldi => "Vivaldi",
            Browser::Opera => "Opera",
            Browser::Firefox => "Firefox",
            Browser::LibreWolf => "LibreWolf",
            Browser::Waterfox => "Waterfox",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Browser {
    type Err = ();

    /// Identifiers are matched exactly; persisted ids are always lowercase.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Browser::ALL
            .iter()
            .copied()
            .find(|browser| browser.id() == s)
            .ok_or(())
    }
}
