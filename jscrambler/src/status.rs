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

use jscrambler_core::{Error, Result};
use serde_json::{Map, Value};

/// Status of a project as reported by the service.
///
/// Decoding is lenient: ids may arrive as strings or numbers, counts as
/// numbers or numeric strings, and missing fields are `None`. The complete
/// payload is kept in `raw`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectStatus {
    /// Unique identifier of the project.
    pub id: Option<String>,
    /// `"0"` or absent when the project was processed without error.
    pub error_id: Option<String>,
    /// Short message about the result of obfuscation.
    pub error_message: Option<String>,
    /// Upload time.
    pub received_at: Option<String>,
    /// Completion time, unset while the project is processing.
    pub finished_at: Option<String>,
    /// Number of JavaScript sources.
    pub js_files: Option<u64>,
    /// Number of HTML sources.
    pub html_files: Option<u64>,
    /// The payload this status was decoded from.
    pub raw: Value,
}

impl ProjectStatus {
    /// Decode a status from a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(obj) = &value else {
            return Err(
                Error::unexpected("project status is not a JSON object").with_payload(value)
            );
        };

        Ok(Self {
            id: string_field(obj, "id"),
            error_id: string_field(obj, "error_id"),
            error_message: string_field(obj, "error_message"),
            received_at: string_field(obj, "received_at"),
            finished_at: string_field(obj, "finished_at"),
            js_files: count_field(obj, "js_files"),
            html_files: count_field(obj, "html_files"),
            raw: value,
        })
    }

    /// The service has completed processing.
    pub fn is_finished(&self) -> bool {
        self.finished_at.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// The service reported a non-zero error id.
    pub fn has_error(&self) -> bool {
        self.error_id
            .as_deref()
            .is_some_and(|v| !v.is_empty() && v != "0")
    }
}

/// Result of [`Client::get_info`](crate::Client::get_info).
#[derive(Debug, Clone, PartialEq)]
pub enum Info {
    /// A single project was requested.
    Project(ProjectStatus),
    /// All projects of the account.
    List(Vec<ProjectStatus>),
}

/// Decode a list of statuses from a JSON array.
pub(crate) fn status_list(value: Value) -> Result<Vec<ProjectStatus>> {
    match value {
        Value::Array(items) => items.into_iter().map(ProjectStatus::from_value).collect(),
        v => Err(Error::unexpected("project list is not a JSON array").with_payload(v)),
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(v) => Some(v.clone()),
        Value::Number(v) => Some(v.to_string()),
        _ => None,
    }
}

fn count_field(obj: &Map<String, Value>, key: &str) -> Option<u64> {
    match obj.get(key)? {
        Value::Number(v) => v.as_u64(),
        Value::String(v) => v.trim().parse().ok(),
        _ => None,
    }
}
