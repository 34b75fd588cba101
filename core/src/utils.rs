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

//! Utility functions and types.

use std::borrow::Cow;
use std::fmt::Debug;

/// Redacts a secret so it can be logged.
///
/// - Empty input is shown as `EMPTY`.
/// - Input shorter than 12 characters is entirely redacted.
/// - Otherwise only the first three and the last three characters are kept.
///
/// Binary keys are redacted over their uppercase hex form, which is the form
/// users see in their account dashboard.
pub struct Redact<'a>(Cow<'a, str>);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(Cow::Borrowed(value.as_str()))
    }
}

impl<'a> From<&'a [u8]> for Redact<'a> {
    fn from(value: &'a [u8]) -> Self {
        Redact(Cow::Owned(hex::encode_upper(value)))
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        match value {
            None => Redact(Cow::Borrowed("")),
            Some(v) => Redact(Cow::Borrowed(v)),
        }
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.0.len();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12 {
            f.write_str("***")
        } else {
            f.write_str(&self.0[..3])?;
            f.write_str("***")?;
            f.write_str(&self.0[length - 3..])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact() {
        let cases = vec![
            ("Short", "***"),
            ("Hello World!", "Hel***ld!"),
            ("", "EMPTY"),
            ("0123456789AB", "012***9AB"),
        ];

        for (input, expected) in cases {
            assert_eq!(
                format!("{:?}", Redact::from(input)),
                expected,
                "Failed on input: {}",
                input
            );
        }
    }

    #[test]
    fn test_redact_bytes() {
        let key: &[u8] = &[0xde, 0xad, 0xbe, 0xef, 0x01, 0x02, 0x03, 0x04];
        assert_eq!(format!("{:?}", Redact::from(key)), "DEA***304");

        let short: &[u8] = &[0xab];
        assert_eq!(format!("{:?}", Redact::from(short)), "***");
    }
}
