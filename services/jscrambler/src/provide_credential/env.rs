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
use crate::Credential;
use async_trait::async_trait;
use jscrambler_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads jscrambler credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `JSCRAMBLER_ACCESS_KEY`: the hex-encoded access key
/// - `JSCRAMBLER_SECRET_KEY`: the hex-encoded secret key
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let access_key = ctx.env_var(JSCRAMBLER_ACCESS_KEY);
        let secret_key = ctx.env_var(JSCRAMBLER_SECRET_KEY);

        match (access_key, secret_key) {
            (Some(ak), Some(sk)) => Ok(Some(Credential::from_hex(&ak, &sk)?)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jscrambler_core::{ErrorKind, StaticEnv};
    use std::collections::HashMap;

    fn ctx_with(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[tokio::test]
    async fn test_env_credential_provider() {
        let ctx = ctx_with(&[
            (JSCRAMBLER_ACCESS_KEY, "0011"),
            (JSCRAMBLER_SECRET_KEY, "2233"),
        ]);

        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.access_key(), &[0x00, 0x11]);
        assert_eq!(cred.secret_key(), &[0x22, 0x33]);
    }

    #[tokio::test]
    async fn test_env_credential_provider_partial_credentials() {
        let ctx = ctx_with(&[(JSCRAMBLER_ACCESS_KEY, "0011")]);

        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap();
        assert!(cred.is_none());
    }

    #[tokio::test]
    async fn test_env_credential_provider_bad_hex() {
        let ctx = ctx_with(&[
            (JSCRAMBLER_ACCESS_KEY, "0011"),
            (JSCRAMBLER_SECRET_KEY, "zz"),
        ]);

        let err = EnvCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }
}
