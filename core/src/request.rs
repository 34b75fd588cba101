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

use std::mem;
use std::str::FromStr;

use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::Method;
use http::Uri;
use percent_encoding::utf8_percent_encode;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

use crate::{Error, Result};

/// AsciiSet for query values.
///
/// Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
/// Space is encoded as `%20` and `/` as `%2F`.
pub static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Parameters that take part in the signature without being transmitted.
///
/// Insert them into the request extensions before signing:
///
/// ```
/// use jscrambler_core::SignatureParameters;
///
/// let mut parts = http::Request::post("https://api.jscrambler.com/v3/code.json")
///     .body(())
///     .unwrap()
///     .into_parts()
///     .0;
/// parts
///     .extensions
///     .insert(SignatureParameters(vec![("file_0".into(), "d41d8cd98f00b204e9800998ecf8427e".into())]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureParameters(pub Vec<(String, String)>);

/// Signing context for request.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path.
    pub path: String,
    /// HTTP query parameters, percent decoded.
    pub query: Vec<(String, String)>,
    /// Parameters only used as signature input.
    pub signature_parameters: Vec<(String, String)>,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),
            signature_parameters: parts
                .extensions
                .remove::<SignatureParameters>()
                .map(|v| v.0)
                .unwrap_or_default(),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    ///
    /// Query pairs are written in their current order, encoded with
    /// [`QUERY_ENCODE_SET`].
    pub fn apply(self, parts: &mut http::request::Parts) -> Result<()> {
        let query = Self::query_to_encoded_string(&self.query);

        parts.method = self.method;
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme);
            uri_parts.authority = Some(self.authority);
            uri_parts.path_and_query = {
                let paq = if query.is_empty() {
                    self.path
                } else {
                    let mut s = self.path;
                    s.reserve(query.len() + 1);
                    s.push('?');
                    s.push_str(&query);
                    s
                };

                Some(PathAndQuery::from_str(&paq)?)
            };
            Uri::from_parts(uri_parts)?
        };

        Ok(())
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Collect query pairs and signature parameters as signature input,
    /// sorted by name then value.
    pub fn signature_input(&self) -> Vec<(String, String)> {
        let mut input: Vec<(String, String)> = self
            .query
            .iter()
            .chain(self.signature_parameters.iter())
            .cloned()
            .collect();
        input.sort();
        input
    }

    /// Convert query pairs to `k=v&k=v`, values encoded with
    /// [`QUERY_ENCODE_SET`] and names kept verbatim.
    ///
    /// ```shell
    /// [(a, "b c"), (d, "e/f")] => "a=b%20c&d=e%2Ff"
    /// ```
    pub fn query_to_canonical_string(query: &[(String, String)]) -> String {
        let mut s = String::with_capacity(16);

        for (idx, (k, v)) in query.iter().enumerate() {
            if idx != 0 {
                s.push('&');
            }

            s.push_str(k);
            s.push('=');
            s.extend(utf8_percent_encode(v, &QUERY_ENCODE_SET));
        }

        s
    }

    /// Convert query pairs to a transmittable query string, names and values
    /// encoded with [`QUERY_ENCODE_SET`].
    pub fn query_to_encoded_string(query: &[(String, String)]) -> String {
        let mut s = String::with_capacity(16);

        for (idx, (k, v)) in query.iter().enumerate() {
            if idx != 0 {
                s.push('&');
            }

            s.extend(utf8_percent_encode(k, &QUERY_ENCODE_SET));
            s.push('=');
            s.extend(utf8_percent_encode(v, &QUERY_ENCODE_SET));
        }

        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn parts(uri: &str) -> http::request::Parts {
        http::Request::get(uri).body(()).unwrap().into_parts().0
    }

    #[test_case("plain", "plain"; "unreserved")]
    #[test_case("a b", "a%20b"; "space")]
    #[test_case("a/b", "a%2Fb"; "slash")]
    #[test_case("~user", "~user"; "tilde")]
    #[test_case("a+b=c&d", "a%2Bb%3Dc%26d"; "reserved")]
    #[test_case("2024-05-01T12:30:45.123456+00:00", "2024-05-01T12%3A30%3A45.123456%2B00%3A00"; "timestamp")]
    fn test_canonical_value_encoding(input: &str, expected: &str) {
        let s = SigningRequest::query_to_canonical_string(&[("k".to_string(), input.to_string())]);
        assert_eq!(s, format!("k={expected}"));
    }

    #[test]
    fn test_build_and_apply() {
        let mut p = parts("https://api.jscrambler.com/v3/code.json?b=2&a=x%20y");
        p.extensions.insert(SignatureParameters(vec![(
            "file_0".to_string(),
            "abc".to_string(),
        )]));

        let mut req = SigningRequest::build(&mut p).unwrap();
        assert_eq!(req.path, "/v3/code.json");
        assert_eq!(req.authority.host(), "api.jscrambler.com");
        assert_eq!(
            req.query,
            vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "x y".to_string())
            ]
        );
        assert_eq!(
            req.signature_input(),
            vec![
                ("a".to_string(), "x y".to_string()),
                ("b".to_string(), "2".to_string()),
                ("file_0".to_string(), "abc".to_string()),
            ]
        );
        assert!(p.extensions.get::<SignatureParameters>().is_none());

        req.query.sort();
        req.apply(&mut p).unwrap();
        assert_eq!(
            p.uri.to_string(),
            "https://api.jscrambler.com/v3/code.json?a=x%20y&b=2"
        );
    }

    #[test]
    fn test_build_without_authority() {
        let mut p = parts("/v3/code.json");
        let err = SigningRequest::build(&mut p).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::RequestInvalid);
    }
}
