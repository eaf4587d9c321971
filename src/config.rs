//! Server configuration.
//!
//! The usual format is one setting per line:
//!
//! ```text
//! # comment
//! server_root /var/www
//! port        8080
//! type        html text/html
//! ```
//!
//! A file ending in `.yaml` or `.yml` is read as YAML with the same fields,
//! content types going under a `types` map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::Deserialize;

use crate::http::mime::ContentTypes;

pub const DEFAULT_CONFIG_FILE: &str = "wsng.conf";
pub const DEFAULT_SERVER_ROOT: &str = ".";
pub const DEFAULT_PORT: u16 = 80;
/// Overrides the whole bind address when set.
pub const LISTEN_ENV: &str = "WSNG_LISTEN";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server_root: PathBuf,
    pub port: u16,
    pub content_types: ContentTypes,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct YamlConfig {
    #[serde(default = "default_server_root")]
    server_root: PathBuf,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    types: HashMap<String, String>,
}

fn default_server_root() -> PathBuf {
    PathBuf::from(DEFAULT_SERVER_ROOT)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_root: default_server_root(),
            port: DEFAULT_PORT,
            content_types: ContentTypes::new(),
        }
    }
}

impl Config {
    /// Reads the config file at `path`, picking the format from its
    /// extension.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open config file {}", path.display()))?;

        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");

        if is_yaml {
            Self::from_yaml(&text)
                .with_context(|| format!("Invalid config file {}", path.display()))
        } else {
            Self::parse(&text)
                .with_context(|| format!("Invalid config file {}", path.display()))
        }
    }

    /// Parses the line format.
    ///
    /// Comment lines and lines without exactly two or three fields are
    /// skipped. Setting names are case-insensitive; later lines win.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut config = Config::default();

        for (idx, line) in text.lines().enumerate() {
            let lineno = idx + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();

            let Some(name) = fields.first() else {
                continue;
            };
            if name.starts_with('#') {
                continue;
            }
            if !(2..=3).contains(&fields.len()) {
                tracing::warn!(line = lineno, "Skipping malformed config line");
                continue;
            }

            let value = fields[1];
            match name.to_ascii_lowercase().as_str() {
                "server_root" => config.server_root = PathBuf::from(value),
                "port" => config.port = parse_port(value)?,
                "type" => match fields.get(2) {
                    Some(content_type) => config.content_types.insert(value, *content_type),
                    None => {
                        tracing::warn!(line = lineno, "No type specified for \"{}\"", value)
                    }
                },
                other => tracing::warn!(line = lineno, "Unknown config setting {}", other),
            }
        }

        Ok(config)
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let raw: YamlConfig = serde_yaml::from_str(text)?;
        Ok(Self {
            server_root: raw.server_root,
            port: raw.port,
            content_types: raw.types.into_iter().collect(),
        })
    }

    /// Address to bind: `0.0.0.0:<port>` unless `WSNG_LISTEN` says otherwise.
    pub fn listen_addr(&self) -> String {
        self.listen_addr_with(std::env::var(LISTEN_ENV).ok())
    }

    pub fn listen_addr_with(&self, listen_override: Option<String>) -> String {
        listen_override.unwrap_or_else(|| format!("0.0.0.0:{}", self.port))
    }
}

fn parse_port(value: &str) -> anyhow::Result<u16> {
    match value.parse::<u16>() {
        Ok(port) => Ok(port),
        Err(_) => bail!("port must be a number between 0 and 65535, got {:?}", value),
    }
}

/// Config file named on the command line with `-c`, or the default.
pub fn config_path_from_args<I>(args: I) -> anyhow::Result<PathBuf>
where
    I: IntoIterator<Item = String>,
{
    let mut path = PathBuf::from(DEFAULT_CONFIG_FILE);
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "-c" {
            match args.next() {
                Some(value) => path = PathBuf::from(value),
                None => bail!("missing arg for -c"),
            }
        }
    }

    Ok(path)
}
