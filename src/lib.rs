mod config;
mod date;
mod source;
mod record;

mod progress;
mod counting;
mod util;
mod mem;
mod pipeline;

mod topk;
mod extract;
mod volume;

pub use crate::config::{AnalyzeOptions, Profile};
pub use crate::date::{day_from_timestamp, CalendarDay};
pub use crate::pipeline::{PostPulse, Ranked};

// Expose the aggregation engine for library callers building their own scans.
pub use crate::topk::{top_k_of, BoundedTopK, ExactTopK, NestedCounter, TopKAggregator};

// Expose the tokenizer seam and both extractors.
pub use crate::extract::{EmojiExtractor, MentionExtractor, Tokenizer};

// Expose the record source so multi-pass callers can stream posts directly.
pub use crate::record::{parse_post, Post, PostUser};
pub use crate::source::{Corpus, ScanStats};

// Export robust file ops and tracing init so binaries can import from crate root.
pub use crate::util::{init_tracing_once, open_with_backoff};

// Expose progress helpers.
pub use crate::progress::make_progress_bar_labeled;
