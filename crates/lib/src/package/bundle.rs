//! Reproducible zip writing shared by the archive and script packagers.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::PackageError;

/// Write `entries` into an in-memory zip.
///
/// Entries are sorted by name and stamped with the zip epoch
/// (1980-01-01 00:00:00) so identical inputs give identical bytes.
pub(crate) fn zip_entries(mut entries: Vec<(String, Vec<u8>)>) -> Result<Vec<u8>, PackageError> {
  entries.sort_by(|a, b| a.0.cmp(&b.0));

  let options = SimpleFileOptions::default()
    .compression_method(CompressionMethod::Deflated)
    .last_modified_time(DateTime::default())
    .unix_permissions(0o644);

  let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
  for (name, data) in &entries {
    writer.start_file(name.as_str(), options)?;
    writer.write_all(data)?;
  }

  Ok(writer.finish()?.into_inner())
}
