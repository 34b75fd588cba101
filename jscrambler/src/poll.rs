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

use crate::status::ProjectStatus;
use jscrambler_core::{Error, Result};
use log::debug;
use std::future::Future;
use std::time::Duration;

/// PollOptions controls how long [`Client::poll_project`](crate::Client::poll_project)
/// waits for a project to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Additional attempts after the first one.
    pub max_retries: usize,
    /// Pause between two attempts.
    pub pause: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            max_retries: 10,
            pause: Duration::from_secs(1),
        }
    }
}

/// Decide what a fetched status means for the project being polled.
///
/// Returns `Ok(None)` while the project is still processing.
pub fn classify(project_id: &str, status: ProjectStatus) -> Result<Option<ProjectStatus>> {
    if !status.is_finished() {
        return Ok(None);
    }

    if status.id.as_deref() != Some(project_id) {
        return Err(Error::project_mismatch(format!(
            "wrong project id, expected {project_id} got {}",
            status.id.as_deref().unwrap_or("none")
        )));
    }

    if status.has_error() {
        return Err(Error::project_failed(format!(
            "project {project_id} failed with error {}: {}",
            status.error_id.as_deref().unwrap_or_default(),
            status.error_message.as_deref().unwrap_or_default()
        ))
        .with_payload(status.raw));
    }

    Ok(Some(status))
}

/// Fetch statuses until the project finishes, at most `max_retries + 1`
/// times, sleeping `pause` between attempts.
pub(crate) async fn poll_until_finished<F, Fut>(
    project_id: &str,
    options: &PollOptions,
    mut fetch: F,
) -> Result<ProjectStatus>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ProjectStatus>>,
{
    let attempts = options.max_retries.saturating_add(1);
    for attempt in 1..=attempts {
        let status = fetch().await?;
        if let Some(status) = classify(project_id, status)? {
            debug!("project {project_id} finished after {attempt} attempts");
            return Ok(status);
        }

        debug!("project {project_id} still processing, attempt {attempt}/{attempts}");
        if attempt < attempts {
            tokio::time::sleep(options.pause).await;
        }
    }

    Err(Error::poll_timeout(format!(
        "project {project_id} did not finish after {attempts} attempts"
    )))
}
