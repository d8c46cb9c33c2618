use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{SessionIdentity, User};

pub const DEFAULT_CONFIG_PATH: &str = "config/chat.json";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
pub const DEFAULT_ECHO_WINDOW: usize = 64;

pub const SERVER_URL_ENV: &str = "CHAT_SERVER_URL";
pub const USER_EMAIL_ENV: &str = "CHAT_USER_EMAIL";
pub const USER_ID_ENV: &str = "CHAT_USER_ID";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base address of the Socket.IO server.
    pub server_url: String,
    /// Skip inbound messages that are the server's echo of our own sends.
    pub suppress_echo: bool,
    /// How many recent sends are remembered for echo matching.
    pub echo_window: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            suppress_echo: true,
            echo_window: DEFAULT_ECHO_WINDOW,
        }
    }
}

impl AppConfig {
    /// Applies environment overrides, looked up through `lookup` so tests do
    /// not have to touch the process environment.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(SERVER_URL_ENV).filter(|url| !url.trim().is_empty()) {
            log::debug!("Server url overridden by {SERVER_URL_ENV}");
            self.server_url = url;
        }
        if self.echo_window == 0 {
            log::warn!("echo_window must be positive; using {DEFAULT_ECHO_WINDOW}");
            self.echo_window = DEFAULT_ECHO_WINDOW;
        }
        self
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}

/// Stand-in for the external auth layer: the signed-in user, if any, is
/// handed over through the environment.
pub fn identity_from<F>(lookup: F) -> SessionIdentity
where
    F: Fn(&str) -> Option<String>,
{
    identity_with_overrides(None, None, lookup)
}

/// Like [`identity_from`], with command-line values taking precedence over
/// the environment. A `user_id` without an email is ignored.
pub fn identity_with_overrides<F>(
    email: Option<&str>,
    user_id: Option<i64>,
    lookup: F,
) -> SessionIdentity
where
    F: Fn(&str) -> Option<String>,
{
    let email = email
        .map(str::to_string)
        .or_else(|| lookup(USER_EMAIL_ENV))
        .filter(|email| !email.trim().is_empty());
    let Some(email) = email else {
        return SessionIdentity::anonymous();
    };

    if let Some(id) = user_id {
        return SessionIdentity::authenticated(User { id, email });
    }

    let id = match lookup(USER_ID_ENV).map(|raw| raw.parse::<i64>()) {
        Some(Ok(id)) => id,
        Some(Err(err)) => {
            log::warn!("Ignoring invalid {USER_ID_ENV}: {err}");
            0
        }
        None => 0,
    };

    SessionIdentity::authenticated(User { id, email })
}
