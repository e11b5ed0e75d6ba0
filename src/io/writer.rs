// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Atomic text file output

use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `contents` to `path` through a temporary file in the same
/// directory, so the destination either holds the full export or is left
/// untouched.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(file.as_file());
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }
    file.persist(path).map_err(|e| e.error)?;

    tracing::debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
