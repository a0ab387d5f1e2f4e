use std::{fs, io, path::Path};

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

pub const SETTINGS_FILE: &str = "site.toml";
/// Project id left in the service URL by the setup template.
pub const PLACEHOLDER_PROJECT_ID: &str = "YOUR_PROJECT_ID";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub content_url: String,
    pub content_api_key: String,
    pub contact_endpoint: String,
    pub admin_passphrase: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            content_url: format!("https://{PLACEHOLDER_PROJECT_ID}.supabase.co"),
            content_api_key: String::new(),
            contact_endpoint: String::new(),
            admin_passphrase: "admin123".into(),
        }
    }
}

impl SiteSettings {
    /// Both service strings present and not the setup placeholder.
    pub fn content_configured(&self) -> bool {
        let url = self.content_url.trim();
        let key = self.content_api_key.trim();
        !url.is_empty()
            && !key.is_empty()
            && !url.contains(PLACEHOLDER_PROJECT_ID)
            && !key.contains(PLACEHOLDER_PROJECT_ID)
    }

    pub fn contact_configured(&self) -> bool {
        !self.contact_endpoint.trim().is_empty()
    }
}

pub fn load_settings() -> anyhow::Result<SiteSettings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file if present, then environment overrides.
/// `APP__*` variables win over the plain names.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<SiteSettings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<SiteSettings>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no settings file, using defaults");
            SiteSettings::default()
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };

    let overrides: [(&str, &str, &mut String); 4] = [
        (
            "CONTENT_SERVICE_URL",
            "APP__CONTENT_URL",
            &mut settings.content_url,
        ),
        (
            "CONTENT_SERVICE_KEY",
            "APP__CONTENT_API_KEY",
            &mut settings.content_api_key,
        ),
        (
            "CONTACT_ENDPOINT",
            "APP__CONTACT_ENDPOINT",
            &mut settings.contact_endpoint,
        ),
        (
            "ADMIN_PASSPHRASE",
            "APP__ADMIN_PASSPHRASE",
            &mut settings.admin_passphrase,
        ),
    ];
    for (plain, prefixed, field) in overrides {
        if let Some(v) = env(plain) {
            *field = v;
        }
        if let Some(v) = env(prefixed) {
            *field = v;
        }
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
