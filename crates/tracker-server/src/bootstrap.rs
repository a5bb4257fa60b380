//! Startup steps that run before the server accepts requests.

use std::{io, path::Path};

use anyhow::Context as _;
use tracker_core::store::TrackerStore;

/// Delete the database file and its WAL sidecars so every process start
/// begins from an empty store. Files that do not exist are fine.
pub fn reset_database(path: &Path) -> io::Result<()> {
  let base = path.as_os_str().to_owned();
  for suffix in ["", "-wal", "-shm"] {
    let mut file = base.clone();
    file.push(suffix);
    match std::fs::remove_file(&file) {
      Ok(()) => tracing::debug!(file = ?file, "removed previous database file"),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(e) => return Err(e),
    }
  }
  Ok(())
}

/// Import every usable placemark in the document at `kml_path`.
///
/// An unreadable file is an error. A malformed document or a failed import
/// is logged and leaves the store with no locations; the server still
/// starts. Returns the number of locations imported.
pub async fn import_placemarks<S>(store: &S, kml_path: &Path) -> anyhow::Result<usize>
where
  S: TrackerStore,
{
  let bytes = tokio::fs::read(kml_path)
    .await
    .with_context(|| format!("failed to read placemark file {kml_path:?}"))?;

  let parsed = match tracker_kml::parse(&bytes) {
    Ok(parsed) => parsed,
    Err(e) => {
      tracing::warn!(error = %e, path = ?kml_path, "placemark file unusable; starting with no locations");
      return Ok(0);
    }
  };

  for skipped in &parsed.skipped {
    tracing::warn!(placemark = %skipped.name, reason = %skipped.reason, "skipping placemark");
  }

  match store.import_locations(parsed.locations).await {
    Ok(imported) => {
      tracing::info!(imported, skipped = parsed.skipped.len(), "imported placemarks");
      Ok(imported)
    }
    Err(e) => {
      tracing::warn!(error = %e, "placemark import failed; starting with no locations");
      Ok(0)
    }
  }
}
