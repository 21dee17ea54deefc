//! Corpus streaming: buffered line and record iteration over a plain or
//! zstd-compressed NDJSON file, with byte-accurate progress reporting.
//!
//! Every scan re-opens the path, so multi-pass profiles simply scan again.
//! Malformed lines are counted and skipped; resource failures (missing file,
//! read or decompression error) abort the scan with the path attached.

use crate::record::{parse_post, Post};
use crate::util::open_with_backoff;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use zstd::stream::read::Decoder;

/// Running tally of what a scan saw. Merged across parallel batches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Non-blank lines visited.
    pub lines: u64,
    /// Lines that decoded into a record.
    pub records: u64,
    /// Lines that failed JSON decoding.
    pub decode_failures: u64,
    /// Decoded records missing a field the query needed.
    pub schema_failures: u64,
}

impl ScanStats {
    pub fn merge(&mut self, other: ScanStats) {
        self.lines += other.lines;
        self.records += other.records;
        self.decode_failures += other.decode_failures;
        self.schema_failures += other.schema_failures;
    }

    /// Records the query actually consumed.
    pub fn usable(&self) -> u64 {
        self.records - self.schema_failures
    }
}

/// A restartable view of one corpus file.
#[derive(Clone, Debug)]
pub struct Corpus {
    path: PathBuf,
    read_buf_bytes: usize,
}

impl Corpus {
    pub fn new(path: impl Into<PathBuf>, read_buf_bytes: usize) -> Self {
        Self { path: path.into(), read_buf_bytes: read_buf_bytes.max(8 * 1024) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// On-disk size (compressed size for `.zst`), for progress bars.
    pub fn size_bytes(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    fn is_zst(&self) -> bool {
        matches!(self.path.extension().and_then(|e| e.to_str()), Some("zst" | "zstd"))
    }

    /// Stream raw lines with `\r?\n` stripped; blank lines are skipped.
    pub fn for_each_line(&self, mut on_line: impl FnMut(&str) -> Result<()>) -> Result<()> {
        self.scan(None, &mut on_line)
    }

    /// Same, but reports on-disk byte deltas to `on_progress` as the scan
    /// advances.
    pub fn for_each_line_with_progress(
        &self,
        mut on_progress: impl FnMut(u64),
        mut on_line: impl FnMut(&str) -> Result<()>,
    ) -> Result<()> {
        self.scan(Some(&mut on_progress), &mut on_line)
    }

    /// Stream decoded posts. Decode failures bump `stats` and are skipped;
    /// `on_record` gets the stats back so it can mark schema failures.
    pub fn for_each_record(
        &self,
        stats: &mut ScanStats,
        on_record: impl FnMut(&Post, &mut ScanStats) -> Result<()>,
    ) -> Result<()> {
        self.for_each_record_with_progress(stats, |_| {}, on_record)
    }

    pub fn for_each_record_with_progress(
        &self,
        stats: &mut ScanStats,
        mut on_progress: impl FnMut(u64),
        mut on_record: impl FnMut(&Post, &mut ScanStats) -> Result<()>,
    ) -> Result<()> {
        self.scan(Some(&mut on_progress), &mut |line| {
            stats.lines += 1;
            match parse_post(line) {
                Ok(post) => {
                    stats.records += 1;
                    on_record(&post, stats)
                }
                Err(e) => {
                    stats.decode_failures += 1;
                    tracing::debug!(error = %e, "skipping undecodable line");
                    Ok(())
                }
            }
        })
    }

    fn scan(
        &self,
        mut on_progress: Option<&mut dyn FnMut(u64)>,
        on_line: &mut dyn FnMut(&str) -> Result<()>,
    ) -> Result<()> {
        let file = open_with_backoff(&self.path, 16, 50)
            .with_context(|| format!("open {}", self.path.display()))?;
        let counter = Arc::new(AtomicU64::new(0));
        let counted = CountingReader { inner: file, counter: Arc::clone(&counter) };

        let mut reader: Box<dyn BufRead> = if self.is_zst() {
            let mut decoder = Decoder::new(counted)
                .with_context(|| format!("decode {}", self.path.display()))?;
            decoder.window_log_max(31)?;
            Box::new(BufReader::with_capacity(self.read_buf_bytes, decoder))
        } else {
            Box::new(BufReader::with_capacity(self.read_buf_bytes, counted))
        };

        let mut buf = String::with_capacity(16 * 1024);
        let mut reported = 0u64;
        loop {
            buf.clear();
            let n = reader
                .read_line(&mut buf)
                .with_context(|| format!("read {}", self.path.display()))?;
            if n == 0 {
                break;
            }
            if buf.ends_with('\n') {
                buf.pop();
                if buf.ends_with('\r') {
                    buf.pop();
                }
            }
            if let Some(f) = on_progress.as_mut() {
                let seen = counter.load(Ordering::Relaxed);
                if seen > reported {
                    f(seen - reported);
                    reported = seen;
                }
            }
            if buf.trim().is_empty() {
                continue;
            }
            on_line(&buf)?;
        }
        if let Some(f) = on_progress.as_mut() {
            let seen = counter.load(Ordering::Relaxed);
            if seen > reported {
                f(seen - reported);
            }
        }
        Ok(())
    }
}

/// A `Read` wrapper that counts on-disk bytes read, so progress tracks the
/// raw file even through the zstd decoder.
struct CountingReader<R: Read> {
    inner: R,
    counter: Arc<AtomicU64>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}
