//! CSV writer that only ever replaces the final output atomically
//!
//! Rows go to a temporary file next to the final path. `finish` flushes and
//! syncs it, then renames it over the final path. Dropping the sink without
//! calling `finish` deletes the temporary file and leaves any previous output
//! untouched.

use crate::output::row::{Row, HEADERS};
use crate::GrabberError;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Line terminator for the platform: CRLF on Windows, LF elsewhere
pub fn line_terminator() -> Terminator {
    if cfg!(windows) {
        Terminator::CRLF
    } else {
        Terminator::Any(b'\n')
    }
}

/// Exclusive owner of the temporary output file for one run
pub struct CsvSink {
    writer: csv::Writer<NamedTempFile>,
    final_path: PathBuf,
    rows_written: u64,
}

impl CsvSink {
    /// Creates the temporary file beside `final_path` and writes the header
    ///
    /// # Returns
    ///
    /// * `Ok(CsvSink)` - Ready to accept rows
    /// * `Err(GrabberError)` - The temporary file could not be created; fatal
    ///   for the run
    pub fn create(final_path: &Path) -> Result<Self, GrabberError> {
        let dir = final_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let stem = final_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_string());
        let extension = final_path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let prefix = format!("{}.", stem);
        let suffix = format!(".tmp{}", extension);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(&suffix);

        // Temp files default to 0600; the output takes the umask default instead
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }

        let temp = builder
            .tempfile_in(dir)
            .map_err(|source| GrabberError::TempFile {
                dir: dir.display().to_string(),
                source,
            })?;

        tracing::debug!("Writing rows to {}", temp.path().display());

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Always)
            .terminator(line_terminator())
            .from_writer(temp);
        writer.write_record(HEADERS)?;

        Ok(Self {
            writer,
            final_path: final_path.to_path_buf(),
            rows_written: 0,
        })
    }

    /// Appends one row
    pub fn write(&mut self, row: &Row) -> Result<(), GrabberError> {
        self.writer.serialize(row)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Path of the temporary file currently being written
    pub fn temp_path(&self) -> &Path {
        self.writer.get_ref().path()
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flushes, syncs and atomically moves the temporary file over the final
    /// path
    pub fn finish(self) -> Result<PathBuf, GrabberError> {
        let temp = self
            .writer
            .into_inner()
            .map_err(|e| {
                GrabberError::Io(std::io::Error::new(e.error().kind(), e.error().to_string()))
            })?;
        temp.as_file().sync_all()?;

        temp.persist(&self.final_path)
            .map_err(|e| GrabberError::Persist {
                path: self.final_path.display().to_string(),
                source: e.error,
            })?;

        tracing::info!(
            "Wrote {} rows to {}",
            self.rows_written,
            self.final_path.display()
        );

        Ok(self.final_path)
    }
}
