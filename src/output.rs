use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use log::info;

use crate::config::OutputTarget;
use crate::error::{Result, ScrapeError};
use crate::record::SupplierRecord;

/// Pretty JSON array. Existing files are truncated without warning.
pub fn write_records(records: &[SupplierRecord], target: &OutputTarget) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            let stdout = io::stdout();
            write_json(records, stdout.lock(), Path::new("-"))?;
            info!("Wrote {} suppliers to stdout", records.len());
            Ok(())
        }
        OutputTarget::File(path) => {
            let file = File::create(path).map_err(|source| ScrapeError::Output {
                path: path.clone(),
                source,
            })?;
            write_json(records, BufWriter::new(file), path)?;
            info!("Saved {} suppliers to {}", records.len(), path.display());
            Ok(())
        }
    }
}

fn write_json<W: Write>(records: &[SupplierRecord], mut writer: W, path: &Path) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records).map_err(|err| {
        if err.is_io() {
            ScrapeError::Output {
                path: path.to_path_buf(),
                source: err.into(),
            }
        } else {
            ScrapeError::from(err)
        }
    })?;
    writeln!(writer)
        .and_then(|_| writer.flush())
        .map_err(|source| ScrapeError::Output {
            path: path.to_path_buf(),
            source,
        })
}
