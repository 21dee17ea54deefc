use anyhow::{bail, Result};
use postpulse::{PostPulse, Profile};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let corpus = match args.next() {
        Some(path) => path,
        None => bail!("usage: postpulse <corpus.jsonl[.zst]> [baseline|low-memory|low-latency]"),
    };
    let profile = match args.next().as_deref() {
        None | Some("baseline") => Profile::Baseline,
        Some("low-memory") => Profile::LowMemory,
        Some("low-latency") => Profile::LowLatency,
        Some(other) => bail!("unknown profile: {other}"),
    };

    let base = PostPulse::new().corpus(&corpus).profile(profile);

    let dates = base.clone().progress_label("Top dates").top_dates()?;
    println!("Top dates (most active author):");
    for (day, author) in &dates.rows {
        println!("  {day}  {author}");
    }

    let emojis = base.clone().progress_label("Top emojis").top_emojis()?;
    println!("Top emojis:");
    for (emoji, count) in &emojis.rows {
        println!("  {emoji}  {count}");
    }

    let mentions = base.progress_label("Top mentions").top_mentions()?;
    println!("Top mentions:");
    for (handle, count) in &mentions.rows {
        println!("  @{handle}  {count}");
    }

    Ok(())
}
