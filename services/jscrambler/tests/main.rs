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

use std::collections::HashMap;
use std::env;

use anyhow::Result;
use jscrambler_core::{Body, Context, OsEnv, Signer, StaticEnv};
use jscrambler_http_send_reqwest::ReqwestHttpSend;
use jscrambler_sign::{
    DefaultCredentialProvider, RequestSigner, StaticCredentialProvider, JSCRAMBLER_ACCESS_KEY,
    JSCRAMBLER_SECRET_KEY,
};
use log::{debug, warn};

fn env_context() -> Context {
    Context::new().with_env(StaticEnv {
        envs: HashMap::from([
            (
                JSCRAMBLER_ACCESS_KEY.to_string(),
                "0123456789abcdef0123456789abcdef01234567".to_string(),
            ),
            (
                JSCRAMBLER_SECRET_KEY.to_string(),
                "fedcba9876543210fedcba9876543210fedcba98".to_string(),
            ),
        ]),
    })
}

fn query_keys(parts: &http::request::Parts) -> Vec<String> {
    parts
        .uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter_map(|kv| kv.split_once('=').map(|(k, _)| k.to_string()))
        .collect()
}

#[tokio::test]
async fn test_signer_with_env_credential() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let signer = Signer::new(
        env_context(),
        DefaultCredentialProvider::new(),
        RequestSigner::new(),
    );

    let mut parts = http::Request::get("https://api.jscrambler.com/v3/code.json?limit=5")
        .body(())?
        .into_parts()
        .0;
    signer.sign(&mut parts).await?;
    debug!("signed uri: {}", parts.uri);

    assert_eq!(
        query_keys(&parts),
        vec!["access_key", "limit", "signature", "timestamp"]
    );
    assert!(parts
        .uri
        .query()
        .unwrap_or_default()
        .contains("access_key=0123456789ABCDEF0123456789ABCDEF01234567"));
    assert_eq!(parts.uri.path(), "/v3/code.json");
    Ok(())
}

#[tokio::test]
async fn test_signer_without_credential() -> Result<()> {
    let signer = Signer::new(
        Context::new(),
        DefaultCredentialProvider::new(),
        RequestSigner::new(),
    );

    let mut parts = http::Request::get("https://api.jscrambler.com/v3/code.json")
        .body(())?
        .into_parts()
        .0;
    let err = signer.sign(&mut parts).await.unwrap_err();
    assert_eq!(err.kind(), jscrambler_core::ErrorKind::CredentialInvalid);
    Ok(())
}

#[tokio::test]
async fn test_static_provider_overrides_env() -> Result<()> {
    let signer = Signer::new(
        env_context(),
        DefaultCredentialProvider::new().push_front(StaticCredentialProvider::new("aa", "bb")?),
        RequestSigner::new(),
    );

    let mut parts = http::Request::delete("http://localhost:8080/v3/code/1.json")
        .body(())?
        .into_parts()
        .0;
    signer.sign(&mut parts).await?;

    assert!(parts
        .uri
        .query()
        .unwrap_or_default()
        .starts_with("access_key=AA&"));
    Ok(())
}

#[tokio::test]
async fn test_list_projects_against_service() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    if env::var("JSCRAMBLER_SIGN_TEST").as_deref() != Ok("on") {
        warn!("JSCRAMBLER_SIGN_TEST is not set, skipped");
        return Ok(());
    }

    let ctx = Context::new()
        .with_env(OsEnv)
        .with_http_send(ReqwestHttpSend::default());
    let signer = Signer::new(
        ctx.clone(),
        DefaultCredentialProvider::new(),
        RequestSigner::new(),
    );

    let (mut parts, body) = http::Request::get("https://api.jscrambler.com/v3/code.json?limit=1")
        .body(Body::Empty)?
        .into_parts();
    signer.sign(&mut parts).await?;

    let resp = ctx
        .http_send(http::Request::from_parts(parts, body))
        .await?;
    debug!("got response: {:?}", resp);
    assert_eq!(resp.status(), http::StatusCode::OK);
    Ok(())
}
