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

//! Client for the JScrambler code obfuscation web API.
//!
//! The typical run uploads sources, waits for the service to process them,
//! downloads the result and deletes the remote project:
//!
//! ```no_run
//! use jscrambler::{default_context, Client, Config, ProcessConfig};
//!
//! # async fn example() -> jscrambler::Result<()> {
//! let ctx = default_context();
//! let config = ProcessConfig::from_file(&ctx, "jscrambler.json").await?;
//!
//! let client = Client::new(ctx.clone(), config.client_config(Config::default().from_env(&ctx)))?;
//! let files = client.process(&config).await?;
//! println!("wrote {} files", files.len());
//! # Ok(())
//! # }
//! ```
//!
//! The individual steps are available as [`Client::upload_code`],
//! [`Client::poll_project`] and [`Client::download_code`]. Requests are
//! signed by [`jscrambler_sign`], re-exported as [`sign`].

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use jscrambler_core::*;

/// Request signing.
pub mod sign {
    pub use jscrambler_sign::*;
}

pub mod archive;
pub mod editor;

mod client;
pub use client::{Client, ListOptions};

mod config;
pub use config::{
    param_pairs, Config, FilesSrc, Keys, ParamValue, ProcessConfig, DEFAULT_API_VERSION,
    DEFAULT_HOST, DEFAULT_PORT, JSCRAMBLER_API_VERSION, JSCRAMBLER_HOST, JSCRAMBLER_PORT,
};

mod poll;
pub use poll::{classify, PollOptions};

mod status;
pub use status::{Info, ProjectStatus};

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;
