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

//! In-memory zip archives of uploaded sources and downloaded results.
//!
//! Archive work is blocking and runs on tokio's blocking pool.

use bytes::Bytes;
use jscrambler_core::{Error, Result};
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Cursor};
use std::path::{Component, Path, PathBuf};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Expand glob patterns into the list of matched paths, in pattern order.
///
/// Paths sharing an archive entry name are kept once.
pub fn collect_sources(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();

    for pattern in patterns {
        let entries = glob::glob(pattern).map_err(|e| {
            Error::config_invalid(format!("invalid source pattern {pattern}")).with_source(e)
        })?;
        for entry in entries {
            let path = entry.map_err(|e| {
                Error::unexpected(format!("failed to read source matched by {pattern}"))
                    .with_source(e)
            })?;
            if seen.insert(entry_name(&path)?) {
                paths.push(path);
            }
        }
    }

    if paths.is_empty() {
        return Err(Error::config_invalid(format!(
            "no files matched {}",
            patterns.join(", ")
        )));
    }
    Ok(paths)
}

/// Name of `path` inside an archive.
///
/// `.` is dropped, `..` is resolved lexically, the root or drive prefix is
/// stripped and components are joined with `/`.
pub fn entry_name(path: &Path) -> Result<String> {
    let mut parts: Vec<&str> = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(Error::config_invalid(format!(
                        "path {} escapes its root",
                        path.display()
                    )));
                }
            }
            Component::Normal(v) => parts.push(v.to_str().ok_or_else(|| {
                Error::config_invalid(format!("path {} is not valid utf-8", path.display()))
            })?),
        }
    }

    if parts.is_empty() {
        return Err(Error::config_invalid(format!(
            "path {} has no file name",
            path.display()
        )));
    }
    Ok(parts.join("/"))
}

/// Pack files and directories into a deflated zip.
pub fn pack(paths: &[PathBuf]) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for path in paths {
        let name = entry_name(path)?;
        if path.is_dir() {
            zip.add_directory(name, options).map_err(zip_error)?;
        } else {
            zip.start_file(name, options).map_err(zip_error)?;
            let mut file = fs::File::open(path)?;
            io::copy(&mut file, &mut zip)?;
        }
    }

    Ok(zip.finish().map_err(zip_error)?.into_inner())
}

/// Extract every entry of a zip under `dest`, returning the written files.
pub fn unpack(content: &[u8], dest: &Path) -> Result<Vec<PathBuf>> {
    let mut archive = ZipArchive::new(Cursor::new(content)).map_err(zip_error)?;
    let mut files = Vec::with_capacity(archive.len());

    for idx in 0..archive.len() {
        let mut entry = archive.by_index(idx).map_err(zip_error)?;
        let Some(name) = entry.enclosed_name() else {
            return Err(Error::unexpected(format!(
                "archive entry {} has an unsafe name",
                entry.name()
            )));
        };
        let target = dest.join(name);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&target)?;
        io::copy(&mut entry, &mut file)?;
        files.push(target);
    }

    Ok(files)
}

/// Collect the sources matched by `patterns` and pack them.
pub async fn build(patterns: Vec<String>) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || {
        let paths = collect_sources(&patterns)?;
        debug!("packing {} paths", paths.len());
        pack(&paths)
    })
    .await
    .map_err(|e| Error::unexpected("archive task failed").with_source(e))?
}

/// Extract a downloaded archive under `dest`.
pub async fn extract(content: Bytes, dest: PathBuf) -> Result<Vec<PathBuf>> {
    tokio::task::spawn_blocking(move || unpack(&content, &dest))
        .await
        .map_err(|e| Error::unexpected("archive task failed").with_source(e))?
}

fn zip_error(err: ZipError) -> Error {
    Error::unexpected("invalid zip archive").with_source(err)
}
