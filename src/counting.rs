//! Flat single-level counting drivers behind the emoji and mention queries.

use crate::config::{AnalyzeOptions, Profile};
use crate::extract::Tokenizer;
use crate::mem::maybe_throttle_low_memory;
use crate::progress::scan_bar;
use crate::record::parse_post;
use crate::source::{Corpus, ScanStats};
use crate::topk::{ExactTopK, TopKAggregator};
use anyhow::Result;
use rayon::prelude::*;

pub(crate) fn top_tokens<T: Tokenizer + Sync>(
    corpus: &Corpus,
    opts: &AnalyzeOptions,
    default_label: &str,
    tokenizer: &T,
) -> Result<(Vec<(String, u64)>, ScanStats)> {
    match opts.profile {
        Profile::Baseline => top_tokens_sequential(
            corpus,
            opts,
            default_label,
            tokenizer,
            TopKAggregator::exact(),
            false,
        ),
        Profile::LowMemory => top_tokens_sequential(
            corpus,
            opts,
            default_label,
            tokenizer,
            TopKAggregator::bounded(opts.top_k),
            true,
        ),
        Profile::LowLatency => top_tokens_parallel(corpus, opts, default_label, tokenizer),
    }
}

/// One sequential scan feeding whichever aggregation mode the profile chose.
fn top_tokens_sequential<T: Tokenizer>(
    corpus: &Corpus,
    opts: &AnalyzeOptions,
    default_label: &str,
    tokenizer: &T,
    mut agg: TopKAggregator<String>,
    throttle: bool,
) -> Result<(Vec<(String, u64)>, ScanStats)> {
    let mut stats = ScanStats::default();
    let label = opts.effective_label(default_label);
    let pb = scan_bar(opts.progress, corpus.size_bytes(), &label);

    corpus.for_each_record_with_progress(
        &mut stats,
        |delta| {
            if let Some(pb) = &pb {
                pb.inc(delta);
            }
        },
        |post, _stats| {
            tokenizer.for_each_token(post.content(), &mut |tok| agg.observe(tok.to_string()));
            if throttle {
                maybe_throttle_low_memory(0.10);
            }
            Ok(())
        },
    )?;

    if let Some(pb) = pb {
        pb.finish_with_message(format!("{label}: scan done"));
    }
    tracing::debug!(distinct = agg.distinct(), "token scan complete");
    Ok((agg.finish(opts.top_k), stats))
}

/// Batched scan: lines are collected `chunk_records` at a time and counted on
/// the rayon pool into partial tables merged by per-key sum.
fn top_tokens_parallel<T: Tokenizer + Sync>(
    corpus: &Corpus,
    opts: &AnalyzeOptions,
    default_label: &str,
    tokenizer: &T,
) -> Result<(Vec<(String, u64)>, ScanStats)> {
    let mut stats = ScanStats::default();
    let mut total = ExactTopK::<String>::new();
    let mut batch: Vec<String> = Vec::with_capacity(opts.chunk_records);
    let label = opts.effective_label(default_label);
    let pb = scan_bar(opts.progress, corpus.size_bytes(), &label);

    corpus.for_each_line_with_progress(
        |delta| {
            if let Some(pb) = &pb {
                pb.inc(delta);
            }
        },
        |line| {
            batch.push(line.to_string());
            if batch.len() >= opts.chunk_records {
                let (part, part_stats) = count_batch(&batch, tokenizer);
                total.merge(part);
                stats.merge(part_stats);
                batch.clear();
            }
            Ok(())
        },
    )?;
    if !batch.is_empty() {
        let (part, part_stats) = count_batch(&batch, tokenizer);
        total.merge(part);
        stats.merge(part_stats);
    }

    if let Some(pb) = pb {
        pb.finish_with_message(format!("{label}: scan done"));
    }
    tracing::debug!(distinct = total.distinct(), "parallel token scan complete");
    Ok((total.finish(opts.top_k), stats))
}

fn count_batch<T: Tokenizer + Sync>(
    lines: &[String],
    tokenizer: &T,
) -> (ExactTopK<String>, ScanStats) {
    lines
        .par_chunks(2048)
        .map(|chunk| {
            let mut part = ExactTopK::new();
            let mut stats = ScanStats::default();
            for line in chunk {
                stats.lines += 1;
                match parse_post(line) {
                    Ok(post) => {
                        stats.records += 1;
                        tokenizer
                            .for_each_token(post.content(), &mut |tok| part.observe(tok.to_string()));
                    }
                    Err(_) => stats.decode_failures += 1,
                }
            }
            (part, stats)
        })
        .reduce(
            || (ExactTopK::new(), ScanStats::default()),
            |(mut table, mut stats), (part, part_stats)| {
                table.merge(part);
                stats.merge(part_stats);
                (table, stats)
            },
        )
}
