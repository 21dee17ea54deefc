//! Date-volume drivers: the top posting days and each day's leading author.

use crate::config::{AnalyzeOptions, Profile};
use crate::date::CalendarDay;
use crate::mem::maybe_throttle_low_memory;
use crate::progress::scan_bar;
use crate::source::{Corpus, ScanStats};
use crate::topk::{BoundedTopK, NestedCounter, TopKAggregator};
use ahash::AHashSet;
use anyhow::Result;

pub(crate) fn top_dates(
    corpus: &Corpus,
    opts: &AnalyzeOptions,
) -> Result<(Vec<(CalendarDay, String)>, ScanStats)> {
    match opts.profile {
        Profile::Baseline => combined_pass(corpus, opts, TopKAggregator::exact()),
        Profile::LowLatency => combined_pass(corpus, opts, TopKAggregator::bounded(opts.top_k)),
        Profile::LowMemory => two_pass(corpus, opts),
    }
}

/// One pass maintaining day totals and the per-day author table together.
fn combined_pass(
    corpus: &Corpus,
    opts: &AnalyzeOptions,
    mut days: TopKAggregator<CalendarDay>,
) -> Result<(Vec<(CalendarDay, String)>, ScanStats)> {
    let mut stats = ScanStats::default();
    let mut by_author = NestedCounter::<CalendarDay, String>::new();
    let label = opts.effective_label("top dates");
    let pb = scan_bar(opts.progress, corpus.size_bytes(), &label);

    corpus.for_each_record_with_progress(
        &mut stats,
        |delta| {
            if let Some(pb) = &pb {
                pb.inc(delta);
            }
        },
        |post, st| {
            let (day, author) = match post.day_and_author() {
                Some(v) => v,
                None => {
                    st.schema_failures += 1;
                    return Ok(());
                }
            };
            days.observe(day);
            by_author.observe(day, author.to_string());
            Ok(())
        },
    )?;
    if let Some(pb) = pb {
        pb.finish_with_message(format!("{label}: scan done"));
    }

    let rows = days
        .finish(opts.top_k)
        .into_iter()
        .filter_map(|(day, _total)| by_author.leader(&day).map(|(author, _)| (day, author)))
        .collect();
    Ok((rows, stats))
}

/// Two passes: rank days with the capped candidate structure, then one more
/// full scan counting authors only on the winning days. Trades an extra I/O
/// pass for never holding the full day-by-author table.
fn two_pass(
    corpus: &Corpus,
    opts: &AnalyzeOptions,
) -> Result<(Vec<(CalendarDay, String)>, ScanStats)> {
    let label = opts.effective_label("top dates");

    let mut stats = ScanStats::default();
    let mut days = BoundedTopK::<CalendarDay>::new(opts.top_k);
    let pb = scan_bar(
        opts.progress,
        corpus.size_bytes(),
        &format!("{label} (pass 1/2)"),
    );
    corpus.for_each_record_with_progress(
        &mut stats,
        |delta| {
            if let Some(pb) = &pb {
                pb.inc(delta);
            }
        },
        |post, st| {
            let (day, _author) = match post.day_and_author() {
                Some(v) => v,
                None => {
                    st.schema_failures += 1;
                    return Ok(());
                }
            };
            days.observe(day);
            maybe_throttle_low_memory(0.10);
            Ok(())
        },
    )?;
    if let Some(pb) = pb {
        pb.finish_with_message("day ranking done");
    }

    let top_days = days.finish();
    if top_days.is_empty() {
        return Ok((Vec::new(), stats));
    }

    let targets: AHashSet<CalendarDay> = top_days.iter().map(|(day, _)| *day).collect();
    let mut by_author = NestedCounter::<CalendarDay, String>::new();
    let mut resolve_stats = ScanStats::default();
    let pb = scan_bar(
        opts.progress,
        corpus.size_bytes(),
        &format!("{label} (pass 2/2)"),
    );
    corpus.for_each_record_with_progress(
        &mut resolve_stats,
        |delta| {
            if let Some(pb) = &pb {
                pb.inc(delta);
            }
        },
        |post, st| {
            let (day, author) = match post.day_and_author() {
                Some(v) => v,
                None => {
                    st.schema_failures += 1;
                    return Ok(());
                }
            };
            if targets.contains(&day) {
                by_author.observe(day, author.to_string());
            }
            Ok(())
        },
    )?;
    if let Some(pb) = pb {
        pb.finish_with_message("author resolution done");
    }
    tracing::debug!(
        lines = resolve_stats.lines,
        days = by_author.distinct(),
        "author resolution pass complete"
    );

    let rows = top_days
        .into_iter()
        .filter_map(|(day, _total)| by_author.leader(&day).map(|(author, _)| (day, author)))
        .collect();
    Ok((rows, stats))
}
