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

use jscrambler::sign::{DefaultCredentialProvider, RequestSigner};
use jscrambler::{default_context, Body, Config, Result, Signer};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Create a default context implementation
    let ctx = default_context();

    // Create credential loader reading JSCRAMBLER_ACCESS_KEY and JSCRAMBLER_SECRET_KEY
    let loader = DefaultCredentialProvider::new();

    // Create the signer
    let signer = Signer::new(ctx.clone(), loader, RequestSigner::new());

    // Build a request
    let base_url = Config::default().from_env(&ctx).base_url();
    let (mut parts, body) = http::Request::builder()
        .method(http::Method::GET)
        .uri(format!("{base_url}/code.json?limit=5"))
        .body(Body::Empty)?
        .into_parts();

    // Sign the request
    signer.sign(&mut parts).await?;

    // Execute the request
    let resp = ctx.http_send(http::Request::from_parts(parts, body)).await?;
    println!("Response status: {}", resp.status());
    println!("{}", String::from_utf8_lossy(resp.body()));

    Ok(())
}
