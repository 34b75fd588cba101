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

//! JScrambler API request signing.
//!
//! Every call to the jscrambler web API carries three extra query
//! parameters: the uppercase hex `access_key`, an ISO-8601 `timestamp` and a
//! base64 HMAC-SHA256 `signature` over the method, host, resource path and
//! the sorted parameters.
//!
//! ## Example
//!
//! ```no_run
//! use jscrambler_core::{Context, OsEnv, Signer};
//! use jscrambler_sign::{DefaultCredentialProvider, RequestSigner};
//!
//! #[tokio::main]
//! async fn main() -> jscrambler_core::Result<()> {
//!     let ctx = Context::new().with_env(OsEnv);
//!     let signer = Signer::new(ctx, DefaultCredentialProvider::new(), RequestSigner::new());
//!
//!     let mut parts = http::Request::get("https://api.jscrambler.com/v3/code.json")
//!         .body(())
//!         .unwrap()
//!         .into_parts()
//!         .0;
//!     signer.sign(&mut parts).await?;
//!     println!("signed uri: {}", parts.uri);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod constants;
pub use constants::{JSCRAMBLER_ACCESS_KEY, JSCRAMBLER_SECRET_KEY};

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::RequestSigner;

mod provide_credential;
pub use provide_credential::*;
