// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use jscrambler_core::utils::Redact;
use jscrambler_core::{Context, Error, Result};
use log::warn;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::path::PathBuf;

/// Env value overriding the API host.
pub const JSCRAMBLER_HOST: &str = "JSCRAMBLER_HOST";
/// Env value overriding the API port.
pub const JSCRAMBLER_PORT: &str = "JSCRAMBLER_PORT";
/// Env value overriding the API version.
pub const JSCRAMBLER_API_VERSION: &str = "JSCRAMBLER_API_VERSION";

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "api.jscrambler.com";
/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 443;
/// API version used when none is configured.
pub const DEFAULT_API_VERSION: u32 = 3;

/// Config carries the connection settings of a [`Client`](crate::Client).
#[derive(Clone, Default)]
pub struct Config {
    /// `host` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`JSCRAMBLER_HOST`]
    /// - default to [`DEFAULT_HOST`]
    pub host: Option<String>,
    /// `port` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`JSCRAMBLER_PORT`]
    /// - default to [`DEFAULT_PORT`]
    pub port: Option<u16>,
    /// `api_version` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`JSCRAMBLER_API_VERSION`]
    /// - default to [`DEFAULT_API_VERSION`]
    pub api_version: Option<u32>,
    /// Hex-encoded access key. When both keys are unset, credentials are
    /// loaded from `JSCRAMBLER_ACCESS_KEY` and `JSCRAMBLER_SECRET_KEY`.
    pub access_key: Option<String>,
    /// Hex-encoded secret key.
    pub secret_key: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_version", &self.api_version)
            .field("access_key", &Redact::from(&self.access_key))
            .field("secret_key", &Redact::from(&self.secret_key))
            .finish()
    }
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(JSCRAMBLER_HOST) {
            self.host.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(JSCRAMBLER_PORT) {
            match v.parse() {
                Ok(port) => {
                    self.port.get_or_insert(port);
                }
                Err(_) => warn!("ignoring invalid {JSCRAMBLER_PORT}: {v}"),
            }
        }
        if let Some(v) = ctx.env_var(JSCRAMBLER_API_VERSION) {
            match v.trim_start_matches('v').parse() {
                Ok(version) => {
                    self.api_version.get_or_insert(version);
                }
                Err(_) => warn!("ignoring invalid {JSCRAMBLER_API_VERSION}: {v}"),
            }
        }

        self
    }

    /// Fill every unset field from `fallback`.
    pub fn or(self, fallback: Config) -> Self {
        Self {
            host: self.host.or(fallback.host),
            port: self.port.or(fallback.port),
            api_version: self.api_version.or(fallback.api_version),
            access_key: self.access_key.or(fallback.access_key),
            secret_key: self.secret_key.or(fallback.secret_key),
        }
    }

    /// Base url of the web API.
    ///
    /// Port 443 is served over https without an explicit port, any other port
    /// over plain http.
    pub fn base_url(&self) -> String {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let version = self.api_version.unwrap_or(DEFAULT_API_VERSION);
        match self.port.unwrap_or(DEFAULT_PORT) {
            443 => format!("https://{host}/v{version}"),
            port => format!("http://{host}:{port}/v{version}"),
        }
    }
}

/// Source patterns, either a single pattern or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FilesSrc {
    /// A single path or glob pattern.
    One(String),
    /// Several paths or glob patterns.
    Many(Vec<String>),
}

impl FilesSrc {
    /// All patterns in declaration order.
    pub fn patterns(&self) -> Vec<String> {
        match self {
            FilesSrc::One(v) => vec![v.clone()],
            FilesSrc::Many(v) => v.clone(),
        }
    }
}

/// Value of an upload parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Sent verbatim.
    String(String),
    /// Sent in its JSON text form.
    Number(serde_json::Number),
    /// Sent as `true` or `false`.
    Bool(bool),
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(v) => f.write_str(v),
            ParamValue::Number(v) => write!(f, "{v}"),
            ParamValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Flatten parameters into the `(name, value)` pairs sent to the service.
pub fn param_pairs(params: &BTreeMap<String, ParamValue>) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(k, v)| (k.clone(), v.to_string()))
        .collect()
}

/// Hex-encoded API keys as found in configuration documents.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keys {
    /// Hex-encoded access key.
    pub access_key: String,
    /// Hex-encoded secret key.
    pub secret_key: String,
}

impl Debug for Keys {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keys")
            .field("access_key", &Redact::from(&self.access_key))
            .field("secret_key", &Redact::from(&self.secret_key))
            .finish()
    }
}

/// ProcessConfig describes one upload, poll and download run.
///
/// ```json
/// {
///   "keys": { "accessKey": "…", "secretKey": "…" },
///   "filesSrc": ["src/**/*.js", "index.html"],
///   "filesDest": "dist/",
///   "params": { "rename_local": "%DEFAULT%", "whitespace": "%DEFAULT%" }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessConfig {
    /// Files to upload.
    pub files_src: FilesSrc,
    /// Existing directory receiving the obfuscated project.
    pub files_dest: PathBuf,
    /// Parameters forwarded to the upload.
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
    /// API keys, overriding the environment.
    #[serde(default)]
    pub keys: Option<Keys>,
    /// API host.
    #[serde(default)]
    pub host: Option<String>,
    /// API port.
    #[serde(default)]
    pub port: Option<u16>,
    /// API version.
    #[serde(default)]
    pub api_version: Option<u32>,
}

impl ProcessConfig {
    /// Parse a configuration document.
    pub fn from_slice(content: &[u8]) -> Result<Self> {
        serde_json::from_slice(content)
            .map_err(|e| Error::config_invalid("invalid configuration document").with_source(e))
    }

    /// Load a configuration document through the context file reader.
    pub async fn from_file(ctx: &Context, path: &str) -> Result<Self> {
        let content = ctx.file_read(path).await?;
        serde_json::from_slice(&content).map_err(|e| {
            Error::config_invalid(format!("invalid configuration document {path}")).with_source(e)
        })
    }

    /// Upload parameters as `(name, value)` pairs.
    pub fn param_pairs(&self) -> Vec<(String, String)> {
        param_pairs(&self.params)
    }

    /// Overlay the connection settings of this document on `config`.
    pub fn client_config(&self, mut config: Config) -> Config {
        if let Some(v) = &self.host {
            config.host = Some(v.clone());
        }
        if let Some(v) = self.port {
            config.port = Some(v);
        }
        if let Some(v) = self.api_version {
            config.api_version = Some(v);
        }
        if let Some(keys) = &self.keys {
            config.access_key = Some(keys.access_key.clone());
            config.secret_key = Some(keys.secret_key.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jscrambler_core::{ErrorKind, StaticEnv};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use test_case::test_case;

    #[test_case(None, None, None, "https://api.jscrambler.com/v3"; "defaults")]
    #[test_case(Some("localhost"), Some(8080), None, "http://localhost:8080/v3"; "custom port")]
    #[test_case(Some("example.com"), Some(443), Some(4), "https://example.com/v4"; "tls port")]
    fn test_base_url(host: Option<&str>, port: Option<u16>, version: Option<u32>, expected: &str) {
        let config = Config {
            host: host.map(|v| v.to_string()),
            port,
            api_version: version,
            ..Default::default()
        };
        assert_eq!(config.base_url(), expected);
    }

    #[test]
    fn test_config_from_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (JSCRAMBLER_HOST.to_string(), "env.example.com".to_string()),
                (JSCRAMBLER_PORT.to_string(), "8080".to_string()),
                (JSCRAMBLER_API_VERSION.to_string(), "v4".to_string()),
            ]),
        });

        let config = Config {
            host: Some("explicit.example.com".to_string()),
            ..Default::default()
        }
        .from_env(&ctx);

        assert_eq!(config.host.as_deref(), Some("explicit.example.com"));
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.api_version, Some(4));
    }

    #[test]
    fn test_config_from_env_ignores_invalid_port() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([(JSCRAMBLER_PORT.to_string(), "https".to_string())]),
        });

        let config = Config::default().from_env(&ctx);
        assert_eq!(config.port, None);
    }

    #[test]
    fn test_config_or_keeps_each_set_field() {
        let config = Config {
            port: Some(8080),
            access_key: Some("AB01".to_string()),
            ..Default::default()
        }
        .or(Config {
            host: Some("localhost".to_string()),
            port: Some(443),
            access_key: Some("EF03".to_string()),
            secret_key: Some("CD02".to_string()),
            ..Default::default()
        });

        assert_eq!(config.host.as_deref(), Some("localhost"));
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.api_version, None);
        assert_eq!(config.access_key.as_deref(), Some("AB01"));
        assert_eq!(config.secret_key.as_deref(), Some("CD02"));
    }

    #[test]
    fn test_config_debug_redacts_keys() {
        let config = Config {
            access_key: Some("0123456789ABCDEF".to_string()),
            secret_key: Some("FEDCBA9876543210".to_string()),
            ..Default::default()
        };
        let s = format!("{config:?}");
        assert!(!s.contains("0123456789ABCDEF"));
        assert!(!s.contains("FEDCBA9876543210"));
    }

    #[test]
    fn test_process_config() {
        let config = ProcessConfig::from_slice(
            br#"{
                "keys": {"accessKey": "AB01", "secretKey": "CD02"},
                "host": "localhost",
                "port": 8080,
                "filesSrc": ["src/*.js", "index.html"],
                "filesDest": "dist",
                "params": {"rename_local": "%DEFAULT%", "level": 2, "debug": false}
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.files_src.patterns(),
            vec!["src/*.js".to_string(), "index.html".to_string()]
        );
        assert_eq!(config.files_dest, PathBuf::from("dist"));
        assert_eq!(
            config.param_pairs(),
            vec![
                ("debug".to_string(), "false".to_string()),
                ("level".to_string(), "2".to_string()),
                ("rename_local".to_string(), "%DEFAULT%".to_string()),
            ]
        );

        let client_config = config.client_config(Config::default());
        assert_eq!(client_config.base_url(), "http://localhost:8080/v3");
        assert_eq!(client_config.access_key.as_deref(), Some("AB01"));
        assert_eq!(client_config.secret_key.as_deref(), Some("CD02"));
    }

    #[test]
    fn test_process_config_single_source() {
        let config =
            ProcessConfig::from_slice(br#"{"filesSrc": "app.js", "filesDest": "out"}"#).unwrap();

        assert_eq!(config.files_src, FilesSrc::One("app.js".to_string()));
        assert!(config.params.is_empty());
        assert!(config.keys.is_none());
    }

    #[test_case(br#"{"filesDest": "out"}"#; "missing sources")]
    #[test_case(br#"{"filesSrc": "a.js", "filesDest": "out", "params": {"x": [1]}}"#; "nested param")]
    #[test_case(b"not json"; "not json")]
    fn test_process_config_invalid(content: &[u8]) {
        let err = ProcessConfig::from_slice(content).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }
}
