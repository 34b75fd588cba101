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

//! Tokio-based command execution implementation for the JScrambler client.
//!
//! This crate provides `TokioCommandExecute`, which implements the
//! `CommandExecute` trait from `jscrambler_core` using Tokio's process
//! operations. Editors configured to use an external obfuscation tool run it
//! through this executor.
//!
//! ## Example
//!
//! ```no_run
//! use jscrambler_core::Context;
//! use jscrambler_command_execute_tokio::TokioCommandExecute;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = Context::new().with_command_execute(TokioCommandExecute);
//!
//!     match ctx.command_execute("jscrambler-tool", &["/tmp/out", "app.js"]).await {
//!         Ok(output) if output.success() => println!("done"),
//!         Ok(output) => eprintln!("{}", String::from_utf8_lossy(&output.stderr)),
//!         Err(e) => eprintln!("Failed to execute command: {}", e),
//!     }
//! }
//! ```

use async_trait::async_trait;
use jscrambler_core::{CommandExecute, CommandOutput, Error, Result};
use log::debug;
use std::process::Stdio;
use tokio::process::Command;

/// Tokio-based implementation of the `CommandExecute` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandExecute;

#[async_trait]
impl CommandExecute for TokioCommandExecute {
    async fn command_execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        debug!("executing {program} {args:?}");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                Error::unexpected(format!("failed to execute command '{program}'")).with_source(e)
            })?;

        Ok(CommandOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_command() {
        let output = TokioCommandExecute
            .command_execute("echo", &["hello"])
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, b"hello\n");
    }

    #[tokio::test]
    async fn test_missing_program() {
        let result = TokioCommandExecute
            .command_execute("nonexistent_command_xyz", &[])
            .await;

        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_with_non_zero_exit() {
        let output = TokioCommandExecute
            .command_execute("false", &[])
            .await
            .unwrap();

        assert!(!output.success());
        assert_eq!(output.status, 1);
    }
}
