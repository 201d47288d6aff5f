use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `content` to `path` atomically.
///
/// The bytes go to a uniquely named temp file in the same directory and are
/// renamed into place, so readers never observe a half-written artifact and
/// concurrent writers of the same path never share a temp file.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  fs::create_dir_all(dir)?;

  let mut temp = NamedTempFile::new_in(dir)?;
  temp.write_all(content)?;
  temp.as_file().sync_all()?;
  temp.persist(path).map_err(|e| e.error)?;
  Ok(())
}
