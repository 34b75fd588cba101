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

/// Env value holding the hex-encoded access key.
pub const JSCRAMBLER_ACCESS_KEY: &str = "JSCRAMBLER_ACCESS_KEY";
/// Env value holding the hex-encoded secret key.
pub const JSCRAMBLER_SECRET_KEY: &str = "JSCRAMBLER_SECRET_KEY";

// Query parameters added by the signer.
pub const ACCESS_KEY: &str = "access_key";
pub const TIMESTAMP: &str = "timestamp";
pub const SIGNATURE: &str = "signature";
