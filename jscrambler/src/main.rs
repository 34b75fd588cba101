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

//! `jscrambler` command line client.

use anyhow::{Context as _, Result};
use clap::Parser;
use jscrambler::{default_context, Client, Config, Info, PollOptions, ProcessConfig};
use log::debug;

mod cli;
use cli::{pause_duration, Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let ctx = default_context();

    let mut config = Config {
        host: args.host,
        port: args.port,
        api_version: args.api_version,
        access_key: args.access_key,
        secret_key: args.secret_key,
    };

    // Connection settings of a configuration document apply below the
    // command line flags.
    let process_config = match &args.command {
        Command::Process { config: path } => Some(
            ProcessConfig::from_file(&ctx, path)
                .await
                .with_context(|| format!("failed to load {path}"))?,
        ),
        _ => None,
    };
    if let Some(process_config) = &process_config {
        config = config.or(process_config.client_config(Config::default()));
    }
    let config = config.from_env(&ctx);
    debug!("using {config:?}");

    let client = Client::new(ctx, config)?;

    match args.command {
        Command::Process { .. } => {
            let process_config = process_config.context("configuration was not loaded")?;
            let files = client.process(&process_config).await?;
            for file in files {
                println!("{}", file.display());
            }
        }
        Command::Upload { files, params } => {
            let resp = client.upload_code(&files, &params).await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Command::Status { id } => match client.get_info(id.as_deref()).await? {
            Info::Project(status) => println!("{}", serde_json::to_string_pretty(&status.raw)?),
            Info::List(list) => {
                for status in list {
                    println!("{}", serde_json::to_string(&status.raw)?);
                }
            }
        },
        Command::Poll { id, retries, pause } => {
            let options = PollOptions {
                max_retries: retries,
                pause: pause_duration(pause).map_err(anyhow::Error::msg)?,
            };
            let status = client.poll_project(&id, &options).await?;
            println!("{}", serde_json::to_string_pretty(&status.raw)?);
        }
        Command::Download { id, dest } => {
            for file in client.download_code(&id, &dest).await? {
                println!("{}", file.display());
            }
        }
        Command::Delete { id } => {
            let resp = client.delete_project(&id).await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Command::Source {
            id,
            source_id,
            extension,
        } => match extension {
            Some(ext) => print!("{}", client.project_source(&id, &source_id, &ext).await?),
            None => {
                let info = client.project_source_info(&id, &source_id).await?;
                println!("{}", serde_json::to_string_pretty(&info)?);
            }
        },
    }

    Ok(())
}
