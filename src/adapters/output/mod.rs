//! Bundle output
//!
//! A [`BundleSink`] receives each generated bundle. [`FileSink`] writes one
//! timestamped JSON file per bundle; [`WriterSink`] streams to any writer
//! (the CLI uses it for `--stdout`).

use crate::domain::context::ResultExt;
use crate::domain::{Bundle, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Destination for generated bundles
pub trait BundleSink {
    /// Writes one bundle, returning the file written if there is one
    ///
    /// # Errors
    ///
    /// Returns an error if the bundle cannot be serialized or written.
    fn write(&mut self, bundle: &Bundle) -> Result<Option<PathBuf>>;
}

fn serialize(bundle: &Bundle, pretty: bool) -> Result<String> {
    let json = if pretty {
        bundle.to_json_pretty()?
    } else {
        serde_json::to_string(bundle)?
    };
    Ok(json)
}

/// Writes `ips_sample_<YYYYmmdd_HHMMSS>[_<n>].json` files into a directory
///
/// The timestamp is the bundle's own, so seeded runs with a pinned
/// reference time produce the same file names. Numbered sinks append a
/// 1-based sequence number so bundles of one batch never collide.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    pretty: bool,
    numbered: bool,
    written: usize,
}

impl FileSink {
    pub fn new(dir: impl AsRef<Path>, pretty: bool) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            pretty,
            numbered: false,
            written: 0,
        }
    }

    /// Appends a sequence number to every file name
    pub fn numbered(mut self, numbered: bool) -> Self {
        self.numbered = numbered;
        self
    }

    /// File name for the next bundle
    pub fn file_name(&self, bundle: &Bundle) -> String {
        let stamp = bundle.timestamp.format("%Y%m%d_%H%M%S");
        if self.numbered {
            format!("ips_sample_{stamp}_{}.json", self.written + 1)
        } else {
            format!("ips_sample_{stamp}.json")
        }
    }
}

impl BundleSink for FileSink {
    fn write(&mut self, bundle: &Bundle) -> Result<Option<PathBuf>> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create output directory {}", self.dir.display()))?;

        let path = self.dir.join(self.file_name(bundle));
        let json = serialize(bundle, self.pretty)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

        self.written += 1;
        tracing::debug!(bundle_id = %bundle.id, path = %path.display(), "Bundle written");
        Ok(Some(path))
    }
}

/// Writes each bundle to a writer, one document per line when compact
pub struct WriterSink<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, pretty: bool) -> Self {
        Self { writer, pretty }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> BundleSink for WriterSink<W> {
    fn write(&mut self, bundle: &Bundle) -> Result<Option<PathBuf>> {
        let json = serialize(bundle, self.pretty)?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::enrichment::NoopEnricher;
    use crate::core::BundleComposer;
    use crate::domain::ResourceCounts;
    use crate::facts::FactProvider;
    use crate::locale::Locale;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn bundle() -> Bundle {
        let facts = FactProvider::seeded(Locale::base(), 8)
            .with_reference_time(Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap());
        BundleComposer::new(facts, Arc::new(NoopEnricher))
            .generate_bundle(&ResourceCounts::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_file_sink_names_by_timestamp() {
        let dir = TempDir::new().unwrap();
        let bundle = bundle().await;

        let mut sink = FileSink::new(dir.path(), true);
        let path = sink.write(&bundle).unwrap().unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "ips_sample_20250304_050607.json"
        );
        let written: Bundle =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, bundle);
    }

    #[tokio::test]
    async fn test_numbered_file_sink() {
        let dir = TempDir::new().unwrap();
        let bundle = bundle().await;

        let mut sink = FileSink::new(dir.path().join("nested"), false).numbered(true);
        let first = sink.write(&bundle).unwrap().unwrap();
        let second = sink.write(&bundle).unwrap().unwrap();

        assert!(first.ends_with("ips_sample_20250304_050607_1.json"));
        assert!(second.ends_with("ips_sample_20250304_050607_2.json"));
    }

    #[tokio::test]
    async fn test_writer_sink() {
        let bundle = bundle().await;
        let mut sink = WriterSink::new(Vec::new(), false);
        assert_eq!(sink.write(&bundle).unwrap(), None);

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("{\"resourceType\":\"Bundle\""));
    }
}
