//! Output formatting and display utilities

use crate::config::OutputConfig;
use crate::error::Result;
use crate::preferences::{CookieRow, Notice};
use serde_json::json;
use std::io::{self, Write};

/// Writes command results to stdout and diagnostics to stderr
pub struct OutputWriter<W: Write = io::Stdout> {
    config: OutputConfig,
    out: W,
}

impl OutputWriter<io::Stdout> {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            out: io::stdout(),
        }
    }
}

impl<W: Write> OutputWriter<W> {
    pub fn with_writer(config: OutputConfig, out: W) -> Self {
        Self { config, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write one line of regular output
    pub fn write_line(&mut self, content: &str) -> Result<()> {
        writeln!(self.out, "{}", content)?;
        Ok(())
    }

    /// Write `(key, value)` pairs as aligned text or a JSON object
    pub fn write_pairs(&mut self, pairs: &[(String, String)]) -> Result<()> {
        if self.config.format_json {
            let map: serde_json::Map<String, serde_json::Value> = pairs
                .iter()
                .map(|(key, value)| (key.clone(), json!(value)))
                .collect();
            let text = serde_json::to_string_pretty(&serde_json::Value::Object(map))?;
            return self.write_line(&text);
        }
        let width = pairs.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
        for (key, value) in pairs {
            writeln!(self.out, "{:width$}  {}", key, value, width = width)?;
        }
        Ok(())
    }

    pub fn write_cookie_rows(&mut self, rows: &[CookieRow], empty_text: &str) -> Result<()> {
        if self.config.format_json {
            let items: Vec<_> = rows
                .iter()
                .map(|row| {
                    json!({
                        "id": row.entry.id,
                        "browser": row.entry.browser,
                        "path": row.entry.path,
                        "selected": row.selected,
                        "found": row.found,
                        "status": row.status,
                    })
                })
                .collect();
            let text = serde_json::to_string_pretty(&items)?;
            return self.write_line(&text);
        }
        if rows.is_empty() {
            return self.write_line(empty_text);
        }
        for row in rows {
            let marker = if row.selected { '*' } else { ' ' };
            let browser = row
                .entry
                .browser_kind()
                .map_or(row.entry.browser.as_str(), |browser| browser.label());
            writeln!(
                self.out,
                "{} {}  {:<9}  {}",
                marker, row.entry.id, browser, row.entry.path
            )?;
            if let Some(status) = &row.status {
                for line in status.lines() {
                    writeln!(self.out, "      {}", line)?;
                }
            }
        }
        Ok(())
    }

    /// Show a notice; errors go to stderr
    pub fn write_notice(&mut self, notice: &Notice) -> Result<()> {
        if notice.is_error() {
            self.write_error(&notice.text)
        } else if !self.config.silent {
            self.write_line(&notice.text)
        } else {
            Ok(())
        }
    }

    /// Write verbose information (if enabled)
    pub fn write_verbose(&self, message: &str) -> Result<()> {
        if self.config.verbose && !self.config.silent {
            eprintln!("* {}", message);
        }
        Ok(())
    }

    /// Write error message
    pub fn write_error(&self, message: &str) -> Result<()> {
        if !self.config.silent {
            eprintln!("dlprefs: error: {}", message);
        }
        Ok(())
    }
}
