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

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Command line client for the JScrambler web API.
///
/// Credentials are read from --access-key/--secret-key, the configuration
/// document, or JSCRAMBLER_ACCESS_KEY/JSCRAMBLER_SECRET_KEY.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// API host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// API port, 443 selects https
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// API version
    #[arg(long, global = true)]
    pub api_version: Option<u32>,

    /// Hex-encoded access key
    #[arg(long, global = true)]
    pub access_key: Option<String>,

    /// Hex-encoded secret key
    #[arg(long, global = true)]
    pub secret_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload, poll and download as described by a JSON configuration file
    Process {
        /// Path to the configuration document
        config: String,
    },
    /// Upload files as a new project and print the response
    Upload {
        /// Files or glob patterns to upload
        #[arg(required = true)]
        files: Vec<String>,
        /// Upload parameter as name=value, may be repeated
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Show the status of one project, or list all projects
    Status {
        /// Project id
        id: Option<String>,
    },
    /// Wait until a project finished processing
    Poll {
        /// Project id
        id: String,
        /// Additional attempts after the first one
        #[arg(long, default_value_t = 10)]
        retries: usize,
        /// Seconds between two attempts
        #[arg(long, default_value_t = 1.0)]
        pause: f64,
    },
    /// Download a finished project and delete it remotely
    Download {
        /// Project id
        id: String,
        /// Existing output directory
        dest: PathBuf,
    },
    /// Delete a project
    Delete {
        /// Project id
        id: String,
    },
    /// Show information about a project source, or print its text
    Source {
        /// Project id
        id: String,
        /// Source id
        source_id: String,
        /// Print the source text with this extension instead of its information
        #[arg(long)]
        extension: Option<String>,
    },
}

/// Pause between poll attempts given in seconds.
pub fn pause_duration(seconds: f64) -> Result<Duration, String> {
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("invalid pause {seconds}: {e}"))
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid parameter {s}, expected name=value"))
}
