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

use crate::provide_credential::EnvCredentialProvider;
use crate::Credential;
use async_trait::async_trait;
use jscrambler_core::{Context, ProvideCredential, ProvideCredentialChain, Result};

/// DefaultCredentialProvider is a loader that will try to load credential via default chains.
///
/// Resolution order:
///
/// 1. Providers added with [`push_front`](Self::push_front), most recent first
/// 2. Environment variables
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain<Credential>,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultCredentialProvider {
    /// Create a new `DefaultCredentialProvider` instance.
    pub fn new() -> Self {
        let chain = ProvideCredentialChain::new().push(EnvCredentialProvider::new());

        Self { chain }
    }

    /// Add a credential provider to the front of the default chain.
    ///
    /// # Example
    ///
    /// ```
    /// use jscrambler_sign::{DefaultCredentialProvider, StaticCredentialProvider};
    ///
    /// # fn main() -> jscrambler_core::Result<()> {
    /// let provider = DefaultCredentialProvider::new()
    ///     .push_front(StaticCredentialProvider::new("ab01", "cd02")?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn push_front(
        mut self,
        provider: impl ProvideCredential<Credential = Credential> + 'static,
    ) -> Self {
        self.chain = self.chain.push_front(provider);
        self
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::StaticCredentialProvider;
    use jscrambler_core::StaticEnv;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_default_provider_without_env() {
        let _ = env_logger::builder().is_test(true).try_init();

        let cred = DefaultCredentialProvider::new()
            .provide_credential(&Context::new())
            .await
            .unwrap();
        assert!(cred.is_none());
    }

    #[tokio::test]
    async fn test_default_provider_with_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (JSCRAMBLER_ACCESS_KEY.to_string(), "aa".to_string()),
                (JSCRAMBLER_SECRET_KEY.to_string(), "bb".to_string()),
            ]),
        });

        let cred = DefaultCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.access_key_hex(), "AA");
    }

    #[tokio::test]
    async fn test_push_front_takes_priority() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (JSCRAMBLER_ACCESS_KEY.to_string(), "aa".to_string()),
                (JSCRAMBLER_SECRET_KEY.to_string(), "bb".to_string()),
            ]),
        });

        let cred = DefaultCredentialProvider::new()
            .push_front(StaticCredentialProvider::new("01", "02").unwrap())
            .provide_credential(&ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.access_key_hex(), "01");
    }
}
