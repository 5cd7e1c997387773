// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use config::{Environment, File};
use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Bounds of the scan window. Anything outside is clamped.
pub const MIN_SCAN_LIMIT: usize = 50;
pub const MAX_SCAN_LIMIT: usize = 500;
pub const DEFAULT_SCAN_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub imap_host: String,
    pub imap_port: u16,
    pub imap_user: String,
    pub imap_pass: Option<String>,
    pub mailbox: String,
    pub scan_limit: usize,
    pub log: LogConfig,
}

impl Settings {
    pub fn new(config_path: Option<&str>) -> Result<Self, SettingsError> {
        // Default configuration values
        let mut config_builder = config::Config::builder()
            .set_default("imap_host", "")?
            .set_default("imap_port", 993_i64)?
            .set_default("imap_user", "")?
            .set_default("mailbox", "INBOX")?
            .set_default("scan_limit", DEFAULT_SCAN_LIMIT as i64)?
            .set_default("log.level", "info")?;

        // Add configuration from file
        if let Some(path) = config_path {
            config_builder = config_builder.add_source(File::with_name(path));
        }

        // Add environment variables with prefix
        // e.g. `MAILSWEEP_MAILBOX=...` would override `mailbox`
        config_builder = config_builder.add_source(
            Environment::with_prefix("MAILSWEEP")
                .separator("__")
                .ignore_empty(true),
        );

        // Add direct environment variables for important settings
        // e.g. `IMAP_HOST=...` would override `imap_host`
        let env_vars = [
            ("IMAP_HOST", "imap_host"),
            ("IMAP_PORT", "imap_port"),
            ("IMAP_USER", "imap_user"),
            ("IMAP_PASS", "imap_pass"),
        ];

        for (env_var, config_key) in &env_vars {
            if let Ok(value) = env::var(env_var) {
                if *env_var == "IMAP_PORT" {
                    if let Ok(port) = value.parse::<u16>() {
                        config_builder = config_builder.set_override(*config_key, i64::from(port))?;
                    } else {
                        warn!("Invalid port value in {}: {}", env_var, value);
                    }
                } else {
                    config_builder = config_builder.set_override(*config_key, value)?;
                }
            }
        }

        let mut settings: Settings = config_builder.build()?.try_deserialize()?;
        settings.scan_limit = clamp_scan_limit(settings.scan_limit);
        Ok(settings)
    }

    /// Resolves the IMAP host: the configured value, or one inferred from the
    /// account's mail domain.
    pub fn resolve_host(&self) -> Result<String, SettingsError> {
        if !self.imap_host.is_empty() {
            return Ok(self.imap_host.clone());
        }
        infer_imap_host(&self.imap_user)
            .map(str::to_string)
            .ok_or_else(|| SettingsError::MissingValue("imap_host".to_string()))
    }

    pub fn validate_user(&self) -> Result<&str, SettingsError> {
        if self.imap_user.is_empty() {
            return Err(SettingsError::MissingValue("imap_user".to_string()));
        }
        Ok(&self.imap_user)
    }
}

/// Clamps a requested scan window to the supported range.
pub fn clamp_scan_limit(limit: usize) -> usize {
    let clamped = limit.clamp(MIN_SCAN_LIMIT, MAX_SCAN_LIMIT);
    if clamped != limit {
        warn!(
            "scan limit {} outside {}..={}, using {}",
            limit, MIN_SCAN_LIMIT, MAX_SCAN_LIMIT, clamped
        );
    }
    clamped
}

/// Guesses the IMAP server for well-known mail providers from the account
/// address. Returns `None` for domains that need an explicit host.
pub fn infer_imap_host(email: &str) -> Option<&'static str> {
    if !email.contains('@') {
        return None;
    }
    let domain = email.rsplit('@').next()?.to_lowercase();

    if domain.contains("gmail") {
        Some("imap.gmail.com")
    } else if domain.contains("qq") {
        Some("imap.qq.com")
    } else if domain.contains("163") {
        Some("imap.163.com")
    } else if domain.contains("outlook") || domain.contains("hotmail") || domain.contains("live.com")
    {
        Some("outlook.office365.com")
    } else if domain.contains("yahoo") {
        Some("imap.mail.yahoo.com")
    } else if domain.contains("icloud") || domain.contains("me.com") || domain.contains("mac.com") {
        Some("imap.mail.me.com")
    } else {
        None
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            imap_host: String::new(),
            imap_port: 993,
            imap_user: String::new(),
            imap_pass: None,
            mailbox: "INBOX".to_string(),
            scan_limit: DEFAULT_SCAN_LIMIT,
            log: LogConfig::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load or parse configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Missing required setting: {0}")]
    MissingValue(String),
}
