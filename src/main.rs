//! # chatstat CLI
//!
//! Command-line interface for the chatstat library.

use std::fs;
use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use chatstat::ChatstatError;
use chatstat::cli::Args;
use chatstat::config::{StatsConfig, WordGroupSet};
use chatstat::history::{HistoryStore, PersistOutcome};
use chatstat::normalizer::NameResolver;
use chatstat::parser::{ChatParser, ParsedChat};
use chatstat::stats::{RankedEntry, Report};

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chatstat=info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ChatstatError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    let config = args.load_config()?;
    let group_sets = args.word_group_sets(&config);

    println!("📦 chatstat v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Inputs:  {}", args.inputs.len());
    println!("👤 Names:   {}", args.resolver_mode());
    if let Some(path) = &config.history_path {
        println!("🗄️  History: {}", path.display());
    }
    if let Some(dir) = &args.json {
        println!("💾 JSON:    {}", dir.display());
    }
    println!();

    let mut resolver = args.build_resolver(&config)?;
    let parser = ChatParser::with_config(config.clone());

    for input in &args.inputs {
        let chat = parse_one(&parser, input, resolver.as_mut())?;
        print_report(&chat, &config, &args, &group_sets);

        if let Some(path) = &config.history_path {
            let outcome = HistoryStore::new(path).persist_stats(&chat.name, &chat.stats)?;
            match outcome {
                PersistOutcome::Written => println!("🗄️  Added to history"),
                PersistOutcome::AlreadyPresent => println!("🗄️  Already in history"),
                PersistOutcome::StoreMissing => {
                    println!("🗄️  History file not found, skipped");
                }
            }
        }

        if let Some(dir) = &args.json {
            let path = write_snapshot(dir, &chat)?;
            println!("💾 Snapshot saved to {}", path.display());
        }
        println!();
    }

    println!(
        "✅ Done! {} chat(s) in {:.2}s",
        args.inputs.len(),
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn parse_one(
    parser: &ChatParser,
    input: &Path,
    resolver: &mut dyn NameResolver,
) -> Result<ParsedChat, ChatstatError> {
    println!("⏳ Parsing {}...", input.display());
    let parse_start = Instant::now();
    let chat = parser.parse_file(input, resolver)?;
    let summary = &chat.summary;

    println!(
        "   Found {} messages in {} lines ({:.2}s)",
        summary.recorded,
        summary.lines_read,
        parse_start.elapsed().as_secs_f64()
    );
    if summary.dropped > 0 {
        println!("   ⚠️  {} messages with unreadable date or time dropped", summary.dropped);
    }
    if summary.excluded > 0 {
        println!("   🚫 {} messages from excluded senders", summary.excluded);
    }
    Ok(chat)
}

fn print_report(
    chat: &ParsedChat,
    config: &StatsConfig,
    args: &Args,
    group_sets: &[WordGroupSet],
) {
    let stats = &chat.stats;
    let report = Report::new(stats);

    println!();
    println!("📊 {}", chat.name);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Messages:  {}", stats.message_count());
    println!("   People:    {}", stats.people().len());
    println!("   Words:     {} distinct", stats.words().len());
    println!("   Media:     {}", stats.media().total());

    if stats.is_empty() {
        return;
    }

    println!();
    println!("👥 Messages per person:");
    print_ranked(&report.people_ranked());

    println!();
    println!("🔤 Top words:");
    print_ranked(&report.top_words_excluding(args.top, &config.stop_words));

    println!();
    println!("💬 Top bigrams:");
    print_ranked(&report.top_bigrams(args.top));

    println!();
    println!("💬 Top trigrams:");
    print_ranked(&report.top_trigrams(args.top));

    println!();
    println!("📅 Busiest dates:");
    for entry in report.top_dates(args.top_dates) {
        println!("   {:<12} {}", entry.key.format("%d.%m.%Y").to_string(), entry.count);
    }

    println!();
    println!("🕐 Messages per hour:");
    for (hour, count) in report.hour_series() {
        if count > 0 {
            println!("   {:02}:00  {}", hour, count);
        }
    }

    println!();
    println!("↩️  Who answers whom:");
    for person in stats.people().keys() {
        let next = report.next_message_distribution(person);
        if next.is_empty() {
            continue;
        }
        let line: Vec<String> = next
            .iter()
            .take(3)
            .map(|e| format!("{} ({})", e.key, e.count))
            .collect();
        println!("   {} → {}", person, line.join(", "));
    }

    for set in group_sets {
        println!();
        println!("🗂️  {}:", set.title);
        let usage = report.word_group_distribution(&set.groups);
        if usage.is_empty() {
            println!("   (no matches)");
        }
        for entry in usage {
            println!("   {:<16} {:<16} {}", entry.label, entry.person, entry.count);
        }
    }
}

fn print_ranked(entries: &[RankedEntry]) {
    for entry in entries {
        println!("   {:<24} {}", entry.key, entry.count);
    }
}

fn write_snapshot(dir: &Path, chat: &ParsedChat) -> Result<std::path::PathBuf, ChatstatError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", chat.name));
    fs::write(&path, serde_json::to_string_pretty(chat)?)?;
    Ok(path)
}
