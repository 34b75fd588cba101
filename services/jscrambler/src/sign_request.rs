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

use crate::constants::*;
use crate::credential::Credential;
use async_trait::async_trait;
use jscrambler_core::hash::base64_hmac_sha256;
use jscrambler_core::time::{format_iso8601, now, DateTime};
use jscrambler_core::{Context, Error, Result, SignRequest, SigningRequest};
use log::debug;

/// RequestSigner that implements the jscrambler HMAC-SHA256 query signature.
///
/// Signing adds `access_key`, `timestamp` and `signature` to the request query
/// and rewrites it sorted by name then value.
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new RequestSigner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    fn get_time(&self) -> DateTime {
        self.time.unwrap_or_else(now)
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid(
                "no valid credential found for signing",
            ));
        };

        let mut ctx = SigningRequest::build(req)?;
        ctx.query_push(ACCESS_KEY, cred.access_key_hex());
        ctx.query_push(TIMESTAMP, format_iso8601(self.get_time()));

        let string_to_sign = string_to_sign(&ctx)?;
        debug!("calculated string to sign: {string_to_sign}");

        let signature =
            base64_hmac_sha256(cred.secret_key_hex().as_bytes(), string_to_sign.as_bytes());
        ctx.query_push(SIGNATURE, signature);
        ctx.query.sort();

        ctx.apply(req)
    }
}

/// Construct the string to sign:
///
/// ```shell
/// {METHOD};{host};{path without version segment};{canonical query}
/// ```
fn string_to_sign(ctx: &SigningRequest) -> Result<String> {
    Ok(format!(
        "{};{};{};{}",
        ctx.method.as_str().to_uppercase(),
        ctx.authority.host().to_lowercase(),
        strip_version_segment(&ctx.path)?,
        SigningRequest::query_to_canonical_string(&ctx.signature_input()),
    ))
}

/// Remove the leading version segment: `/v3/code.json` becomes `/code.json`.
fn strip_version_segment(path: &str) -> Result<&str> {
    let rest = path.strip_prefix('/').unwrap_or(path);
    match rest.find('/') {
        Some(idx) => Ok(&rest[idx..]),
        None => Err(Error::request_invalid(format!(
            "request path {path} has no resource below the api version"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jscrambler_core::{ErrorKind, SignatureParameters};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const ACCESS_KEY_HEX: &str = "0123456789abcdef0123456789abcdef01234567";
    const SECRET_KEY_HEX: &str = "fedcba9876543210fedcba9876543210fedcba98";

    fn signer() -> RequestSigner {
        let time = chrono::DateTime::parse_from_rfc3339("2024-05-01T12:30:45.123456+00:00")
            .unwrap()
            .with_timezone(&chrono::Utc);
        RequestSigner::new().with_time(time)
    }

    fn cred() -> Credential {
        Credential::from_hex(ACCESS_KEY_HEX, SECRET_KEY_HEX).unwrap()
    }

    fn parts(method: http::Method, uri: &str) -> http::request::Parts {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    fn query_value(parts: &http::request::Parts, key: &str) -> Option<String> {
        form_query(parts)
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    fn form_query(parts: &http::request::Parts) -> Vec<(String, String)> {
        parts
            .uri
            .query()
            .unwrap_or_default()
            .split('&')
            .filter_map(|kv| kv.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test_case("/v3/code.json", "/code.json")]
    #[test_case("/v3/code/abc123.json", "/code/abc123.json")]
    #[test_case("/v3/code/abc123/src%2Fapp.js.json", "/code/abc123/src%2Fapp.js.json")]
    fn test_strip_version_segment(input: &str, expected: &str) {
        assert_eq!(strip_version_segment(input).unwrap(), expected);
    }

    #[test]
    fn test_strip_version_segment_without_resource() {
        let err = strip_version_segment("/v3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[tokio::test]
    async fn test_sign_get() {
        let mut req = parts(
            http::Method::GET,
            "https://api.jscrambler.com/v3/code/abc123.json",
        );
        signer()
            .sign_request(&Context::new(), &mut req, Some(&cred()))
            .await
            .unwrap();

        assert_eq!(
            req.uri.to_string(),
            "https://api.jscrambler.com/v3/code/abc123.json?\
             access_key=0123456789ABCDEF0123456789ABCDEF01234567&\
             signature=wL3pmQJ1m6hILERbNQ7vopjX1zhFYo6Qp8Ja%2F5LeFZI%3D&\
             timestamp=2024-05-01T12%3A30%3A45.123456%2B00%3A00"
        );
    }

    #[tokio::test]
    async fn test_sign_delete() {
        let mut req = parts(
            http::Method::DELETE,
            "https://api.jscrambler.com/v3/code/abc123.json",
        );
        signer()
            .sign_request(&Context::new(), &mut req, Some(&cred()))
            .await
            .unwrap();

        assert_eq!(
            query_value(&req, SIGNATURE).as_deref(),
            Some("TqGw0b7qk6K1LKOSRUmzoB0QTQfSu%2F2iydee9iaoxJk%3D")
        );
    }

    #[tokio::test]
    async fn test_sign_with_port_uses_host_only() {
        let mut req = parts(
            http::Method::GET,
            "http://localhost:8080/v3/code.json?offset=0&limit=10",
        );
        signer()
            .sign_request(&Context::new(), &mut req, Some(&cred()))
            .await
            .unwrap();

        assert_eq!(
            query_value(&req, SIGNATURE).as_deref(),
            Some("8o9WosyMk6h6t9MEBlHxEX8yZFsqmO5de7wMhyGcmPM%3D")
        );
        let keys: Vec<String> = form_query(&req).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["access_key", "limit", "offset", "signature", "timestamp"]
        );
    }

    #[tokio::test]
    async fn test_sign_post_with_signature_parameters() {
        let mut req = parts(
            http::Method::POST,
            "https://api.jscrambler.com/v3/code.json?mode=starter&rename_local=%25DEFAULT%25&exclude_list=jQuery%3B%24",
        );
        req.extensions.insert(SignatureParameters(vec![(
            "file_0".to_string(),
            "f50d848b3a153cf1e9573d9908e3bf68".to_string(),
        )]));

        signer()
            .sign_request(&Context::new(), &mut req, Some(&cred()))
            .await
            .unwrap();

        assert_eq!(
            query_value(&req, SIGNATURE).as_deref(),
            Some("quRCNBgQyv9JQ%2F0ut53NqJMnaWGiDJN0hjMcRZ1bkv8%3D")
        );
        assert_eq!(query_value(&req, "file_0"), None);
        assert_eq!(
            query_value(&req, "exclude_list").as_deref(),
            Some("jQuery%3B%24")
        );
    }

    #[tokio::test]
    async fn test_sign_is_independent_of_parameter_order() {
        let mut a = parts(
            http::Method::GET,
            "http://localhost:8080/v3/code.json?offset=0&limit=10",
        );
        let mut b = parts(
            http::Method::GET,
            "http://localhost:8080/v3/code.json?limit=10&offset=0",
        );
        for req in [&mut a, &mut b] {
            signer()
                .sign_request(&Context::new(), req, Some(&cred()))
                .await
                .unwrap();
        }

        assert_eq!(a.uri, b.uri);
    }

    #[tokio::test]
    async fn test_sign_without_credential() {
        let mut req = parts(http::Method::GET, "https://api.jscrambler.com/v3/code.json");
        let err = signer()
            .sign_request(&Context::new(), &mut req, None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }
}
