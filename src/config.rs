use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, WcsError};

const ENV_ENDPOINT: &str = "WCS_ENDPOINT";
const ENV_USERNAME: &str = "WCS_USERNAME";
const ENV_PASSWORD: &str = "WCS_PASSWORD";
const ENV_RC: &str = "WCSRC";
const RC_FILE: &str = ".wcsrc";

/// Basic-auth credentials sent with every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// WCS endpoint, e.g. `https://ows.rasdaman.org/rasdaman/ows`.
    pub endpoint: String,
    pub credentials: Option<Credentials>,
    pub connect_timeout: Duration,
    /// Limit on the whole exchange; DescribeCoverage of large coverages can be slow.
    pub read_timeout: Duration,
}

impl ServiceConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials: None,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(600),
        }
    }

    /// Resolves the configuration from environment variables and/or `.wcsrc`.
    ///
    /// This is equivalent to `load_config(None, None, None)`.
    pub fn from_env() -> Result<Self> {
        load_config(None, None, None)
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}

#[derive(Debug, Default)]
struct RcConfig {
    endpoint: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

/// Resolves a [`ServiceConfig`] using (in order of precedence):
/// - explicit arguments
/// - environment variables `WCS_ENDPOINT` / `WCS_USERNAME` / `WCS_PASSWORD`
/// - config file from `WCSRC`, `./.wcsrc` or `~/.wcsrc`
pub fn load_config(
    endpoint: Option<String>,
    username: Option<String>,
    password: Option<String>,
) -> Result<ServiceConfig> {
    resolve_config(endpoint, username, password, |name| std::env::var(name).ok())
}

pub(crate) fn resolve_config<E>(
    endpoint: Option<String>,
    username: Option<String>,
    password: Option<String>,
    env: E,
) -> Result<ServiceConfig>
where
    E: Fn(&str) -> Option<String>,
{
    let mut endpoint = endpoint.or_else(|| env(ENV_ENDPOINT));
    let mut username = username.or_else(|| env(ENV_USERNAME));
    let mut password = password.or_else(|| env(ENV_PASSWORD));

    let rc_candidates = rc_candidates(&env);

    if endpoint.is_none() || username.is_none() || password.is_none() {
        if let Some(rc_path) = rc_candidates.iter().find(|p| p.exists()) {
            let rc = read_rc(rc_path)?;
            endpoint = endpoint.or(rc.endpoint);
            username = username.or(rc.username);
            password = password.or(rc.password);
        }
    }

    let endpoint = endpoint.ok_or_else(|| {
        WcsError::Config(format!(
            "Missing configuration: endpoint (set {} or put `endpoint:` in one of: {})",
            ENV_ENDPOINT,
            searched(&rc_candidates)
        ))
    })?;

    let credentials = match (username, password) {
        (Some(username), Some(password)) => Some(Credentials { username, password }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(WcsError::Config(format!(
                "Missing configuration: password (set {} or put `password:` in one of: {})",
                ENV_PASSWORD,
                searched(&rc_candidates)
            )));
        }
        (None, Some(_)) => {
            return Err(WcsError::Config(format!(
                "Missing configuration: username (set {} or put `username:` in one of: {})",
                ENV_USERNAME,
                searched(&rc_candidates)
            )));
        }
    };

    Ok(ServiceConfig {
        credentials,
        ..ServiceConfig::new(endpoint)
    })
}

fn searched(candidates: &[PathBuf]) -> String {
    if candidates.is_empty() {
        return RC_FILE.to_string();
    }
    candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        WcsError::Config(format!(
            "failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;
    let mut cfg = RcConfig::default();

    // `key:` may be alone on its line with the value on the next one.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(key) = pending_key.take() {
            if !is_key_line(line) {
                cfg.set(key, strip_quotes(line));
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':') {
            let k = k.trim();
            let v = strip_quotes(v.trim());
            if v.is_empty() {
                pending_key = Some(k);
            } else {
                cfg.set(k, v);
            }
        }
    }

    Ok(cfg)
}

/// Endpoint URLs contain colons too, so only a known key starts a new entry.
fn is_key_line(line: &str) -> bool {
    line.split_once(':')
        .is_some_and(|(k, _)| matches!(k.trim(), "endpoint" | "username" | "password"))
}

impl RcConfig {
    fn set(&mut self, key: &str, value: &str) {
        let value = Some(value.to_string());
        match key {
            "endpoint" => self.endpoint = value,
            "username" => self.username = value,
            "password" => self.password = value,
            _ => {}
        }
    }
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates<E>(env: &E) -> Vec<PathBuf>
where
    E: Fn(&str) -> Option<String>,
{
    // 1) WCSRC (explicit)
    // 2) ./.wcsrc
    // 3) ~/.wcsrc
    if let Some(p) = env(ENV_RC) {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(RC_FILE));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(RC_FILE));
    }
    v
}
