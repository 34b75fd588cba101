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

use crate::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};
use std::sync::{Arc, Mutex};

/// Signer is the main struct used to sign the request.
///
/// It caches the loaded credential and only asks the provider again once the
/// cached credential is no longer valid.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,

            loader: Arc::new(loader),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the context this signer was built with.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Signing request.
    pub async fn sign(&self, req: &mut http::request::Parts) -> Result<()> {
        let credential = self.cached()?;
        let credential = if credential.is_valid() {
            credential
        } else {
            let loaded = self.loader.provide_credential(&self.ctx).await?;
            *self.lock()? = loaded.clone();
            loaded
        };

        self.builder
            .sign_request(&self.ctx, req, credential.as_ref())
            .await
    }

    fn cached(&self) -> Result<Option<K>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<K>>> {
        self.credential
            .lock()
            .map_err(|_| Error::unexpected("credential cache lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug)]
    struct Token(String);

    impl SigningCredential for Token {
        fn is_valid(&self) -> bool {
            !self.0.is_empty()
        }
    }

    #[derive(Debug, Default)]
    struct CountingLoader {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProvideCredential for CountingLoader {
        type Credential = Token;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Token>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Token("secret".to_string())))
        }
    }

    #[derive(Debug)]
    struct QueryBuilder;

    #[async_trait]
    impl SignRequest for QueryBuilder {
        type Credential = Token;

        async fn sign_request(
            &self,
            _: &Context,
            req: &mut http::request::Parts,
            credential: Option<&Token>,
        ) -> Result<()> {
            let token = credential.ok_or_else(|| Error::credential_invalid("missing"))?;
            req.uri = format!("{}?token={}", req.uri, token.0).parse()?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_signer_caches_credential() {
        let calls = Arc::new(AtomicUsize::new(0));
        let signer = Signer::new(
            Context::new(),
            CountingLoader {
                calls: calls.clone(),
            },
            QueryBuilder,
        );

        for _ in 0..3 {
            let mut parts = http::Request::get("https://example.com/v3/code.json")
                .body(())
                .unwrap()
                .into_parts()
                .0;
            signer.sign(&mut parts).await.unwrap();
            assert_eq!(
                parts.uri.to_string(),
                "https://example.com/v3/code.json?token=secret"
            );
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
