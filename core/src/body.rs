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

use bytes::Bytes;

/// Body of a request sent through [`HttpSend`](crate::HttpSend).
///
/// The service only ever receives parameter-only requests or multipart
/// uploads, so the body is modeled as exactly that instead of raw bytes.
/// Encoding of the multipart body is left to the transport.
#[derive(Debug, Clone, Default)]
pub enum Body {
    /// No body, parameters travel in the query string.
    #[default]
    Empty,
    /// `multipart/form-data` body.
    Multipart(Multipart),
}

/// A `multipart/form-data` body made of text fields and file parts.
#[derive(Debug, Clone, Default)]
pub struct Multipart {
    /// Text fields in transmission order.
    pub fields: Vec<(String, String)>,
    /// File parts in transmission order.
    pub files: Vec<FilePart>,
}

/// A file part of a multipart body.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name, e.g. `file_0`.
    pub name: String,
    /// File name announced to the server.
    pub file_name: String,
    /// File content.
    pub content: Bytes,
}

impl Multipart {
    /// Create an empty multipart body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Append a file part.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        self.files.push(FilePart {
            name: name.into(),
            file_name: file_name.into(),
            content: content.into(),
        });
        self
    }
}
