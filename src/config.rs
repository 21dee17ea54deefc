use std::path::{Path, PathBuf};

/// Performance profile: one trade-off dial (memory vs. wall-clock vs.
/// simplicity), not three designs. Every profile returns the same rows for
/// the same corpus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Profile {
    /// Simplest correct form: full tables, selection at the end.
    #[default]
    Baseline,
    /// Capacity-K candidate ranking, cooperative memory throttling, and a
    /// two-pass date query.
    LowMemory,
    /// Batched parallel counting for the flat queries; single combined pass
    /// with an inline candidate ranking for the date query.
    LowLatency,
}

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct AnalyzeOptions {
    pub corpus: Option<PathBuf>,      // input file (.jsonl, .ndjson, .json or .zst)
    pub profile: Profile,
    pub top_k: usize,                 // ranking size
    pub chunk_records: usize,         // lines per parallel batch
    pub parallelism: Option<usize>,   // Some(N) to set rayon threads, None to use default
    pub progress: bool,               // show progress bar
    pub progress_label: Option<String>, // optional label for progress bar

    // IO tuning
    pub read_buffer_bytes: usize,     // BufReader capacity
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            corpus: None,
            profile: Profile::default(),
            top_k: 10,
            chunk_records: 64 * 1024,
            parallelism: None,
            progress: true,
            progress_label: None,

            read_buffer_bytes: 256 * 1024,
        }
    }
}

impl AnalyzeOptions {
    pub fn with_corpus(mut self, path: impl AsRef<Path>) -> Self {
        self.corpus = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }
    pub fn with_chunk_records(mut self, n: usize) -> Self {
        self.chunk_records = n.max(1);
        self
    }
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }

    /// Label shown on progress bars: the configured override, or the
    /// driver's default.
    pub fn effective_label(&self, default_label: &str) -> String {
        self.progress_label.clone().unwrap_or_else(|| default_label.to_string())
    }
}
