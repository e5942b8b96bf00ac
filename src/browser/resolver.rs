//! Cookie database discovery for user-declared browser paths
//!
//! Users may point at a single profile directory or at a browser's whole
//! configuration root. The resolver probes the well-known layouts of each
//! browser family to find the cookie database inside either.

use super::probe::{FsProbe, StdFs};
use super::{Browser, BrowserFamily};
use std::path::{Path, PathBuf};

const CHROMIUM_DEFAULT_PROFILE: &str = "Default";
const CHROMIUM_PROFILE_PREFIX: &str = "Profile";
const FIREFOX_COOKIE_DB: &str = "cookies.sqlite";
const FIREFOX_PREFERRED_PROFILE: &str = "default-release";

/// A located cookie database and the profile directory that holds it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCookies {
    pub cookies_path: PathBuf,
    pub profile_path: PathBuf,
}

/// Maps a (browser, path) pair to the cookie database it refers to
#[derive(Debug, Clone, Default)]
pub struct CookiePathResolver<P = StdFs> {
    fs: P,
}

impl CookiePathResolver<StdFs> {
    pub fn new() -> Self {
        Self { fs: StdFs }
    }
}

impl<P: FsProbe> CookiePathResolver<P> {
    /// Create a resolver over a custom filesystem probe
    pub fn with_probe(fs: P) -> Self {
        Self { fs }
    }

    /// Locate the cookie database for `browser` starting from `input_path`.
    ///
    /// Returns `None` for blank paths (without touching the filesystem),
    /// for unknown browser identifiers, and whenever no layout matches.
    pub fn resolve(&self, browser: &str, input_path: &str) -> Option<ResolvedCookies> {
        let input = input_path.trim();
        if input.is_empty() {
            return None;
        }

        let browser = match browser.parse::<Browser>() {
            Ok(browser) => browser,
            Err(()) => {
                log::debug!("No cookie layout known for browser '{}'", browser);
                return None;
            }
        };

        let root = Path::new(input);
        let resolved = match browser.family() {
            BrowserFamily::Chromium => self.resolve_chromium(root),
            BrowserFamily::Firefox => self.resolve_firefox(root),
        };

        match &resolved {
            Some(found) => log::debug!(
                "Resolved {} cookies for {:?} at {:?}",
                browser,
                root,
                found.cookies_path
            ),
            None => log::debug!("No {} cookie database under {:?}", browser, root),
        }
        resolved
    }

    fn resolve_chromium(&self, root: &Path) -> Option<ResolvedCookies> {
        if !self.fs.is_dir(root) {
            return None;
        }

        if let Some(found) = self.chromium_profile(root.to_path_buf()) {
            return Some(found);
        }

        if let Some(found) = self.chromium_profile(root.join(CHROMIUM_DEFAULT_PROFILE)) {
            return Some(found);
        }

        self.fs
            .list_dir(root)
            .into_iter()
            .filter(|name| name.starts_with(CHROMIUM_PROFILE_PREFIX))
            .find_map(|name| self.chromium_profile(root.join(name)))
    }

    /// Probe one Chromium profile directory; newer builds keep the
    /// database under `Network/`.
    fn chromium_profile(&self, profile_dir: PathBuf) -> Option<ResolvedCookies> {
        let candidates = [
            profile_dir.join("Network").join("Cookies"),
            profile_dir.join("Cookies"),
        ];
        let cookies_path = candidates
            .into_iter()
            .find(|candidate| self.fs.file_exists(candidate))?;
        Some(ResolvedCookies {
            cookies_path,
            profile_path: profile_dir,
        })
    }

    fn resolve_firefox(&self, root: &Path) -> Option<ResolvedCookies> {
        let direct = root.join(FIREFOX_COOKIE_DB);
        if self.fs.file_exists(&direct) {
            return Some(ResolvedCookies {
                cookies_path: direct,
                profile_path: root.to_path_buf(),
            });
        }

        if !self.fs.is_dir(root) {
            return None;
        }

        let mut first = None;
        let mut preferred = None;
        for name in self.fs.list_dir(root) {
            let candidate = root.join(&name);
            if !self.fs.is_dir(&candidate) || !self.fs.file_exists(&candidate.join(FIREFOX_COOKIE_DB))
            {
                continue;
            }
            if name.contains(FIREFOX_PREFERRED_PROFILE) {
                preferred = Some(candidate);
                break;
            }
            if first.is_none() {
                first = Some(candidate);
            }
        }

        preferred.or(first).map(|profile_path| ResolvedCookies {
            cookies_path: profile_path.join(FIREFOX_COOKIE_DB),
            profile_path,
        })
    }
}
