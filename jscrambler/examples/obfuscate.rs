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

use std::env;
use std::sync::Arc;

use jscrambler::editor::{EditorSettings, EditorSurface, ObfuscateJob};
use jscrambler::{default_context, Result};

/// Prints everything an editor would show.
struct Terminal;

impl EditorSurface for Terminal {
    fn set_status(&self, message: &str) {
        eprintln!("[status] {message}");
    }

    fn clear_status(&self) {}

    fn error_message(&self, message: &str) {
        eprintln!("[error] {message}");
    }

    fn open_scratch(&self, contents: &str) {
        println!("{contents}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Some(file) = env::args().nth(1) else {
        eprintln!("usage: obfuscate <file.js>");
        return Ok(());
    };

    // Credentials come from JSCRAMBLER_ACCESS_KEY and JSCRAMBLER_SECRET_KEY.
    let job = ObfuscateJob::new(default_context(), EditorSettings::default(), file);
    job.spawn(Arc::new(Terminal))
        .await
        .map_err(|e| jscrambler::Error::unexpected("job panicked").with_source(e))?;

    Ok(())
}
