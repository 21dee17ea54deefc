use crate::config::{AnalyzeOptions, Profile};
use crate::counting::top_tokens;
use crate::date::CalendarDay;
use crate::extract::{EmojiExtractor, MentionExtractor};
use crate::source::{Corpus, ScanStats};
use crate::util::init_tracing_once;
use crate::volume;
use anyhow::{anyhow, Result};
use std::path::Path;

/// Ordered query rows plus the scan accounting that produced them.
///
/// Empty `rows` with a populated `stats` is the legitimate outcome of a
/// readable corpus containing no usable records; unreadable corpora surface
/// as errors instead.
#[derive(Clone, Debug)]
pub struct Ranked<T> {
    pub rows: Vec<T>,
    pub stats: ScanStats,
}

/// Entry point: a consuming builder over [`AnalyzeOptions`] with one
/// operation per query.
#[derive(Clone)]
pub struct PostPulse {
    pub(crate) opts: AnalyzeOptions,
}

impl PostPulse {
    pub fn new() -> Self {
        Self { opts: AnalyzeOptions::default() }
    }

    // -------- Builder methods --------
    pub fn corpus(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_corpus(path); self }
    pub fn profile(mut self, profile: Profile) -> Self { self.opts = self.opts.with_profile(profile); self }
    pub fn top_k(mut self, k: usize) -> Self { self.opts = self.opts.with_top_k(k); self }
    pub fn chunk_records(mut self, n: usize) -> Self { self.opts = self.opts.with_chunk_records(n); self }
    pub fn parallelism(mut self, threads: usize) -> Self { self.opts = self.opts.with_parallelism(threads); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }

    // -------- Queries --------

    /// Top posting days, each paired with its most prolific author.
    pub fn top_dates(self) -> Result<Ranked<(CalendarDay, String)>> {
        let corpus = self.prepare()?;
        let (rows, stats) = volume::top_dates(&corpus, &self.opts)?;
        self.report("top_dates", rows.len(), &stats);
        Ok(Ranked { rows, stats })
    }

    /// Most used emoji code points across all post bodies.
    pub fn top_emojis(self) -> Result<Ranked<(String, u64)>> {
        let corpus = self.prepare()?;
        let extractor = EmojiExtractor::new();
        let (rows, stats) = top_tokens(&corpus, &self.opts, "top emojis", &extractor)?;
        self.report("top_emojis", rows.len(), &stats);
        Ok(Ranked { rows, stats })
    }

    /// Most mentioned handles (`@name`, returned without the `@`).
    pub fn top_mentions(self) -> Result<Ranked<(String, u64)>> {
        let corpus = self.prepare()?;
        let extractor = MentionExtractor::new();
        let (rows, stats) = top_tokens(&corpus, &self.opts, "top mentions", &extractor)?;
        self.report("top_mentions", rows.len(), &stats);
        Ok(Ranked { rows, stats })
    }

    fn prepare(&self) -> Result<Corpus> {
        init_tracing_once();
        if let Some(n) = self.opts.parallelism {
            if n > 0 {
                rayon::ThreadPoolBuilder::new().num_threads(n).build_global().ok();
            }
        }
        let path = self
            .opts
            .corpus
            .clone()
            .ok_or_else(|| anyhow!("corpus path is required"))?;
        Ok(Corpus::new(path, self.opts.read_buffer_bytes))
    }

    fn report(&self, query: &str, rows: usize, stats: &ScanStats) {
        if stats.records == 0 {
            tracing::warn!(
                query,
                lines = stats.lines,
                decode_failures = stats.decode_failures,
                "no usable records in corpus"
            );
        } else {
            tracing::info!(
                query,
                rows,
                records = stats.records,
                decode_failures = stats.decode_failures,
                schema_failures = stats.schema_failures,
                "query complete"
            );
        }
    }
}

impl Default for PostPulse {
    fn default() -> Self {
        Self::new()
    }
}
