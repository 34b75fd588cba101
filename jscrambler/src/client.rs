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

use crate::archive;
use crate::config::{Config, ProcessConfig};
use crate::poll::{poll_until_finished, PollOptions};
use crate::status::{status_list, Info, ProjectStatus};
use bytes::Bytes;
use http::uri::PathAndQuery;
use http::{Method, Request, Response, Uri};
use jscrambler_core::hash::hex_md5;
use jscrambler_core::{
    Body, Context, Error, Multipart, Result, SignatureParameters, Signer, SigningRequest,
    QUERY_ENCODE_SET,
};
use jscrambler_sign::{
    Credential, DefaultCredentialProvider, RequestSigner, StaticCredentialProvider,
};
use log::{debug, warn};
use percent_encoding::utf8_percent_encode;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Name of the multipart part carrying the uploaded archive.
const UPLOAD_PART: &str = "file_0";
/// File name announced for the uploaded archive.
const UPLOAD_FILE_NAME: &str = "project.zip";

/// Filters for [`Client::list_projects`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Only list projects in this state.
    pub status: Option<String>,
    /// Skip this many projects.
    pub offset: Option<u64>,
    /// Return at most this many projects.
    pub limit: Option<u64>,
}

/// Client talks to the jscrambler web API.
///
/// Every request is signed with the credential resolved from the
/// [`Config`] keys, falling back to `JSCRAMBLER_ACCESS_KEY` and
/// `JSCRAMBLER_SECRET_KEY`.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    signer: Signer<Credential>,
}

impl Client {
    /// Create a new client.
    ///
    /// Malformed keys in `config` are rejected here.
    pub fn new(ctx: Context, config: Config) -> Result<Self> {
        let mut provider = DefaultCredentialProvider::new();
        if let (Some(ak), Some(sk)) = (&config.access_key, &config.secret_key) {
            provider = provider.push_front(StaticCredentialProvider::new(ak, sk)?);
        }

        let base_url = config.base_url();
        debug!("jscrambler api url: {base_url}");

        Ok(Self {
            base_url,
            signer: Signer::new(ctx, provider, RequestSigner::new()),
        })
    }

    /// Base url requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Zip the files matched by `patterns` and upload them as a new project.
    ///
    /// `params` are forwarded to the service verbatim. The decoded response
    /// carries the project `id` on success.
    pub async fn upload_code(
        &self,
        patterns: &[String],
        params: &[(String, String)],
    ) -> Result<Value> {
        let content = archive::build(patterns.to_vec()).await?;
        let digest = hex_md5(&content);
        debug!("uploading {} bytes with md5 {digest}", content.len());

        let body = Multipart::new().file(UPLOAD_PART, UPLOAD_FILE_NAME, content);
        let resp = self
            .send(
                Method::POST,
                "/code.json",
                params,
                Body::Multipart(body),
                Some(SignatureParameters(vec![(UPLOAD_PART.to_string(), digest)])),
            )
            .await?;
        let value = parse_json(resp)?;
        debug!("upload returned {value}");
        Ok(value)
    }

    /// Information about one project, or about all projects when
    /// `project_id` is `None`.
    pub async fn get_info(&self, project_id: Option<&str>) -> Result<Info> {
        match project_id {
            Some(id) => Ok(Info::Project(self.project_status(id, None).await?)),
            None => Ok(Info::List(
                self.list_projects(&ListOptions::default()).await?,
            )),
        }
    }

    /// List projects of the account.
    pub async fn list_projects(&self, options: &ListOptions) -> Result<Vec<ProjectStatus>> {
        let mut query = Vec::new();
        if let Some(v) = &options.status {
            query.push(("status".to_string(), v.clone()));
        }
        if let Some(v) = options.offset {
            query.push(("offset".to_string(), v.to_string()));
        }
        if let Some(v) = options.limit {
            query.push(("limit".to_string(), v.to_string()));
        }

        let resp = self
            .send(Method::GET, "/code.json", &query, Body::Empty, None)
            .await?;
        status_list(parse_json(resp)?)
    }

    /// Status of one project.
    pub async fn project_status(
        &self,
        project_id: &str,
        symbol_table: Option<bool>,
    ) -> Result<ProjectStatus> {
        let mut query = Vec::new();
        if let Some(v) = symbol_table {
            query.push(("symbol_table".to_string(), v.to_string()));
        }

        let resource = format!("/code/{}.json", encode_segment(project_id));
        let resp = self
            .send(Method::GET, &resource, &query, Body::Empty, None)
            .await?;
        ProjectStatus::from_value(parse_json(resp)?)
    }

    /// Information about one source of a project.
    pub async fn project_source_info(&self, project_id: &str, source_id: &str) -> Result<Value> {
        let resource = format!(
            "/code/{}/{}.json",
            encode_segment(project_id),
            encode_segment(source_id)
        );
        let resp = self
            .send(Method::GET, &resource, &[], Body::Empty, None)
            .await?;
        parse_json(resp)
    }

    /// Text of one processed source, e.g. with `extension` `js`.
    pub async fn project_source(
        &self,
        project_id: &str,
        source_id: &str,
        extension: &str,
    ) -> Result<String> {
        let resource = format!(
            "/code/{}/{}.{}",
            encode_segment(project_id),
            encode_segment(source_id),
            encode_segment(extension)
        );
        let resp = self
            .send(Method::GET, &resource, &[], Body::Empty, None)
            .await?;
        let content = check_status(resp)?;
        Ok(String::from_utf8(content.to_vec())?)
    }

    /// Wait until the project finished processing.
    ///
    /// Fails with `ProjectMismatch` or `ProjectFailed` as soon as a finished
    /// status is inconsistent or carries an error, and with `PollTimeout`
    /// once `max_retries + 1` attempts saw the project still processing.
    pub async fn poll_project(
        &self,
        project_id: &str,
        options: &PollOptions,
    ) -> Result<ProjectStatus> {
        poll_until_finished(project_id, options, || {
            self.project_status(project_id, None)
        })
        .await
    }

    /// Download a finished project into `dest` and delete it remotely.
    ///
    /// `dest` must be an existing directory. Extraction and deletion are not
    /// atomic: when the deletion fails the extracted files stay in place and
    /// the project is left on the service.
    pub async fn download_code(
        &self,
        project_id: &str,
        dest: impl AsRef<Path>,
    ) -> Result<Vec<PathBuf>> {
        let dest = dest.as_ref().to_path_buf();
        let is_dir = tokio::fs::metadata(&dest)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(Error::config_invalid(format!(
                "output directory {} does not exist",
                dest.display()
            )));
        }

        let resource = format!("/code/{}.zip", encode_segment(project_id));
        let resp = self
            .send(Method::GET, &resource, &[], Body::Empty, None)
            .await?;
        let content = check_status(resp)?;

        let files = archive::extract(content, dest).await?;
        debug!("extracted {} files of project {project_id}", files.len());

        if let Err(err) = self.delete_project(project_id).await {
            warn!("project {project_id} was downloaded but could not be deleted: {err}");
            return Err(err);
        }
        Ok(files)
    }

    /// Delete a project.
    pub async fn delete_project(&self, project_id: &str) -> Result<Value> {
        let resource = format!("/code/{}.json", encode_segment(project_id));
        let resp = self
            .send(Method::DELETE, &resource, &[], Body::Empty, None)
            .await?;
        parse_json(resp)
    }

    /// Upload, poll and download as described by `config`.
    pub async fn process(&self, config: &ProcessConfig) -> Result<Vec<PathBuf>> {
        let resp = self
            .upload_code(&config.files_src.patterns(), &config.param_pairs())
            .await?;
        let project_id = project_id(&resp)?;

        self.poll_project(&project_id, &PollOptions::default())
            .await?;
        self.download_code(&project_id, &config.files_dest).await
    }

    /// Load a configuration document and [`process`](Self::process) it.
    pub async fn process_file(&self, path: &str) -> Result<Vec<PathBuf>> {
        let config = ProcessConfig::from_file(self.signer.context(), path).await?;
        self.process(&config).await
    }

    async fn send(
        &self,
        method: Method,
        resource: &str,
        query: &[(String, String)],
        body: Body,
        signature_parameters: Option<SignatureParameters>,
    ) -> Result<Response<Bytes>> {
        let mut url = format!("{}{resource}", self.base_url);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&SigningRequest::query_to_encoded_string(query));
        }

        let (mut parts, body) = Request::builder()
            .method(method)
            .uri(url)
            .body(body)?
            .into_parts();
        if let Some(v) = signature_parameters {
            parts.extensions.insert(v);
        }
        self.signer.sign(&mut parts).await?;

        // Multipart uploads carry the signed parameters as form fields.
        let body = match body {
            Body::Multipart(mut multipart) => {
                let mut fields: Vec<(String, String)> = parts
                    .uri
                    .query()
                    .map(|v| form_urlencoded::parse(v.as_bytes()).into_owned().collect())
                    .unwrap_or_default();
                fields.append(&mut multipart.fields);
                multipart.fields = fields;

                let mut uri = parts.uri.into_parts();
                let path = uri
                    .path_and_query
                    .as_ref()
                    .map(|v| v.path().to_string())
                    .unwrap_or_else(|| "/".to_string());
                uri.path_and_query = Some(path.parse::<PathAndQuery>()?);
                parts.uri = Uri::from_parts(uri)?;
                Body::Multipart(multipart)
            }
            body => body,
        };

        debug!("sending {} {}", parts.method, parts.uri.path());
        self.signer
            .context()
            .http_send(Request::from_parts(parts, body))
            .await
    }
}

/// Extract the project id from an upload response.
pub(crate) fn project_id(resp: &Value) -> Result<String> {
    match resp.get("id") {
        Some(Value::String(v)) if !v.is_empty() => Ok(v.clone()),
        Some(Value::Number(v)) => Ok(v.to_string()),
        _ => Err(Error::unexpected("upload response carries no project id")
            .with_payload(resp.clone())),
    }
}

fn encode_segment(v: &str) -> String {
    utf8_percent_encode(v, &QUERY_ENCODE_SET).to_string()
}

fn check_status(resp: Response<Bytes>) -> Result<Bytes> {
    let status = resp.status();
    let body = resp.into_body();
    if status.is_success() {
        return Ok(body);
    }

    let mut err = Error::transport(format!("service responded with {status}"));
    if let Ok(payload) = serde_json::from_slice::<Value>(&body) {
        err = err.with_payload(payload);
    }
    Err(err)
}

fn parse_json(resp: Response<Bytes>) -> Result<Value> {
    let body = check_status(resp)?;
    serde_json::from_slice(&body)
        .map_err(|e| Error::unexpected("service response is not valid JSON").with_source(e))
}
