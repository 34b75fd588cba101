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

//! Editor integration.
//!
//! [`ObfuscateJob`] obfuscates the file open in an editor, either through the
//! web API or through an external tool, and reports back through an
//! [`EditorSurface`] implemented by the host editor.

use crate::archive::entry_name;
use crate::client::{project_id, Client};
use crate::config::{param_pairs, Config, Keys, ParamValue};
use crate::poll::PollOptions;
use jscrambler_core::{Context, Error, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Status shown while a job is running.
pub const STATUS_UPLOADING: &str = "Uploading JScrambler job...";

/// Settings of the editor integration, as stored by the host editor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// API host.
    pub host: Option<String>,
    /// API port.
    pub port: Option<u16>,
    /// API keys.
    pub keys: Option<Keys>,
    /// Parameters forwarded to the upload.
    pub params: BTreeMap<String, ParamValue>,
    /// Run `external_tool` instead of calling the web API.
    pub use_external_tool: bool,
    /// Executable invoked as `external_tool <output dir> <file>`.
    pub external_tool: Option<String>,
}

impl EditorSettings {
    /// Client configuration described by these settings.
    pub fn client_config(&self) -> Config {
        Config {
            host: self.host.clone(),
            port: self.port,
            access_key: self.keys.as_ref().map(|k| k.access_key.clone()),
            secret_key: self.keys.as_ref().map(|k| k.secret_key.clone()),
            ..Default::default()
        }
    }
}

/// The part of the host editor a job reports to.
pub trait EditorSurface: Send + Sync + 'static {
    /// Show a message in the status line.
    fn set_status(&self, message: &str);
    /// Clear the status line.
    fn clear_status(&self);
    /// Show an error dialog.
    fn error_message(&self, message: &str);
    /// Open a new scratch document with `contents`.
    fn open_scratch(&self, contents: &str);
}

/// ObfuscateJob obfuscates a single file.
#[derive(Debug, Clone)]
pub struct ObfuscateJob {
    ctx: Context,
    settings: EditorSettings,
    file: PathBuf,
}

impl ObfuscateJob {
    /// Create a new job for `file`.
    pub fn new(ctx: Context, settings: EditorSettings, file: impl Into<PathBuf>) -> Self {
        Self {
            ctx,
            settings,
            file: file.into(),
        }
    }

    /// Obfuscate the file and return the obfuscated contents.
    ///
    /// Output is written to a temporary directory that is removed before
    /// returning.
    pub async fn run(&self) -> Result<String> {
        let tempdir = tempfile::tempdir()?;

        if self.settings.use_external_tool {
            self.run_external_tool(tempdir.path()).await?;
        } else {
            self.run_client(tempdir.path()).await?;
        }

        let output = tempdir.path().join(entry_name(&self.file)?);
        debug!("reading obfuscated output {}", output.display());
        self.ctx.file_read_as_string(&output.to_string_lossy()).await
    }

    /// Run the job on a background task, reporting to `surface`.
    pub fn spawn(self, surface: Arc<dyn EditorSurface>) -> JoinHandle<()> {
        tokio::spawn(async move {
            surface.set_status(STATUS_UPLOADING);
            match self.run().await {
                Ok(contents) => surface.open_scratch(&contents),
                Err(err) => {
                    warn!("obfuscating {} failed: {err}", self.file.display());
                    surface.error_message(&err.to_string());
                }
            }
            surface.clear_status();
        })
    }

    async fn run_client(&self, dest: &Path) -> Result<()> {
        let client = Client::new(self.ctx.clone(), self.settings.client_config())?;
        let pattern = glob::Pattern::escape(&self.file.to_string_lossy());

        let resp = client
            .upload_code(&[pattern], &param_pairs(&self.settings.params))
            .await?;
        let project_id = project_id(&resp)?;
        client
            .poll_project(&project_id, &PollOptions::default())
            .await?;
        client.download_code(&project_id, dest).await?;
        Ok(())
    }

    async fn run_external_tool(&self, dest: &Path) -> Result<()> {
        let tool = self
            .settings
            .external_tool
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("external tool is not configured"))?;

        let dest = dest.to_string_lossy();
        let file = self.file.to_string_lossy();
        let output = self.ctx.command_execute(tool, &[&*dest, &*file]).await?;

        let mut message = String::from_utf8_lossy(&output.stdout).to_string();
        message.push_str(&String::from_utf8_lossy(&output.stderr));
        if !output.success() {
            return Err(Error::unexpected(format!(
                "{tool} exited with status {}: {message}",
                output.status
            )));
        }
        // Any output of a successful run is a diagnostic.
        if !message.is_empty() {
            return Err(Error::unexpected(message));
        }
        Ok(())
    }
}
