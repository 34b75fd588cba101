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

//! Reqwest-based HTTP transport for the JScrambler client.
//!
//! `ReqwestHttpSend` implements the `HttpSend` trait from `jscrambler_core`,
//! turning multipart bodies into `reqwest::multipart::Form`s.
//!
//! ## Example
//!
//! ```no_run
//! use jscrambler_core::Context;
//! use jscrambler_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! # fn example() -> anyhow::Result<()> {
//! let client = reqwest::Client::builder()
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use jscrambler_core::{Body, Error, HttpSend, Multipart, Result};
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

/// Reqwest-based implementation of the `HttpSend` trait.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Body>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        debug!("sending {} {}", parts.method, parts.uri.path());

        let mut builder = self
            .client
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers);
        if let Body::Multipart(multipart) = body {
            builder = builder.multipart(into_form(multipart));
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| Error::transport("failed to send request").with_source(e))?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::transport("failed to read response body").with_source(e))?;
        debug!("received {status} with {} bytes", body.len());

        let mut http_resp = http::Response::new(body);
        *http_resp.status_mut() = status;
        *http_resp.headers_mut() = headers;
        Ok(http_resp)
    }
}

fn into_form(multipart: Multipart) -> Form {
    let mut form = Form::new();
    for (name, value) in multipart.fields {
        form = form.text(name, value);
    }
    for file in multipart.files {
        let part = Part::bytes(file.content.to_vec()).file_name(file.file_name);
        form = form.part(file.name, part);
    }
    form
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_passes_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/code.json"))
            .and(query_param("access_key", "AB"))
            .respond_with(ResponseTemplate::new(404).set_body_string("{\"error\":true}"))
            .mount(&server)
            .await;

        let req = http::Request::get(format!("{}/v3/code.json?access_key=AB", server.uri()))
            .body(Body::Empty)
            .unwrap();
        let resp = ReqwestHttpSend::default().http_send(req).await.unwrap();

        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(resp.body().as_ref(), b"{\"error\":true}");
    }

    #[tokio::test]
    async fn test_multipart_upload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/code.json"))
            .and(header_exists("content-type"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\":\"1\"}"))
            .expect(1)
            .mount(&server)
            .await;

        let body = Multipart::new()
            .text("access_key", "AB")
            .file("file_0", "project.zip", Bytes::from_static(b"zip-bytes"));
        let req = http::Request::post(format!("{}/v3/code.json", server.uri()))
            .body(Body::Multipart(body))
            .unwrap();
        let resp = ReqwestHttpSend::default().http_send(req).await.unwrap();
        assert!(resp.status().is_success());

        let received = server.received_requests().await.unwrap();
        let content_type = received[0]
            .headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data"));
        let raw = String::from_utf8_lossy(&received[0].body).to_string();
        assert!(raw.contains("name=\"access_key\""));
        assert!(raw.contains("filename=\"project.zip\""));
        assert!(raw.contains("zip-bytes"));
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        let req = http::Request::get("http://127.0.0.1:1/v3/code.json")
            .body(Body::Empty)
            .unwrap();
        let err = ReqwestHttpSend::default().http_send(req).await.unwrap_err();

        assert_eq!(err.kind(), jscrambler_core::ErrorKind::Transport);
    }
}
