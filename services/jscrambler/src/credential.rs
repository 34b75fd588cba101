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

use jscrambler_core::utils::Redact;
use jscrambler_core::{Error, Result, SigningCredential};
use std::fmt::{Debug, Formatter};

/// Credential that holds the decoded access key and secret key.
///
/// Keys are handed out hex-encoded by the service dashboard and decoded once
/// at construction; they are re-encoded as uppercase hex on the wire.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Credential {
    access_key: Vec<u8>,
    secret_key: Vec<u8>,
}

impl Credential {
    /// Create a credential from raw key bytes.
    pub fn new(access_key: impl Into<Vec<u8>>, secret_key: impl Into<Vec<u8>>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Create a credential from hex-encoded keys.
    pub fn from_hex(access_key: &str, secret_key: &str) -> Result<Self> {
        let access_key = hex::decode(access_key.trim()).map_err(|e| {
            Error::credential_invalid("access key is not valid hex").with_source(e)
        })?;
        let secret_key = hex::decode(secret_key.trim()).map_err(|e| {
            Error::credential_invalid("secret key is not valid hex").with_source(e)
        })?;

        Ok(Self::new(access_key, secret_key))
    }

    /// Decoded access key.
    pub fn access_key(&self) -> &[u8] {
        &self.access_key
    }

    /// Decoded secret key.
    pub fn secret_key(&self) -> &[u8] {
        &self.secret_key
    }

    /// Access key as sent in the `access_key` parameter.
    pub fn access_key_hex(&self) -> String {
        hex::encode_upper(&self.access_key)
    }

    /// Secret key as used for the HMAC key.
    pub(crate) fn secret_key_hex(&self) -> String {
        hex::encode_upper(&self.secret_key)
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key", &Redact::from(self.access_key.as_slice()))
            .field("secret_key", &Redact::from(self.secret_key.as_slice()))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.access_key.is_empty() && !self.secret_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jscrambler_core::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_hex() {
        let cred = Credential::from_hex("0a1B2c", "ff00").unwrap();

        assert_eq!(cred.access_key(), &[0x0a, 0x1b, 0x2c]);
        assert_eq!(cred.secret_key(), &[0xff, 0x00]);
        assert_eq!(cred.access_key_hex(), "0A1B2C");
        assert_eq!(cred.secret_key_hex(), "FF00");
        assert!(cred.is_valid());
    }

    #[test]
    fn test_from_invalid_hex() {
        let err = Credential::from_hex("xyz", "ff00").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);

        let err = Credential::from_hex("ff00", "abc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }

    #[test]
    fn test_empty_credential_is_invalid() {
        assert!(!Credential::default().is_valid());
        assert!(!Credential::new(vec![1], Vec::new()).is_valid());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let cred = Credential::from_hex(
            "0123456789abcdef0123456789abcdef01234567",
            "fedcba9876543210fedcba9876543210fedcba98",
        )
        .unwrap();

        let s = format!("{cred:?}");
        assert!(!s.contains("0123456789ABCDEF"));
        assert!(s.contains("012***567"));
        assert!(s.contains("FED***A98"));
    }
}
