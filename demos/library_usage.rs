//! Example: Using chatstat as a library
//!
//! This example demonstrates how to use chatstat in your own projects.
//!
//! Run with: cargo run --example library_usage

use chatstat::prelude::*;

const CHAT: &str = "\
Messages and calls are end-to-end encrypted.
5.5.2024, 8:02 - +972 50-123-4567: בוקר טוב לכולם
5.5.2024, 8:05 - Avi: בוקר טוב
mom are you coming tonight
5.5.2024, 8:06 - Spam Bot: click here to win
5.5.2024, 8:10 - +972 50-123-4567: <המדיה לא נכללה>
6.5.2024, 21:40 - Noa: lol lool
6.5.2024, 21:41 - Avi: lol
";

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== chatstat Library Usage Examples ===\n");

    // Example 1: Resolve names from a prepared mapping
    println!("1. Parsing with a name mapping:");
    let mut resolver = MappingResolver::new()
        .with_name("+972 50-123-4567", "Dana")
        .with_name("Spam Bot", "dont");
    let chat = ChatParser::new().parse_str("family", CHAT, &mut resolver)?;

    println!("   Recorded: {}", chat.summary.recorded);
    println!("   Excluded: {}", chat.summary.excluded);
    println!("   Orphan lines: {}", chat.summary.orphan_lines);

    // Example 2: Resolve names with a closure
    println!("\n2. Parsing with a closure resolver:");
    let mut upper = |raw: &str| -> Result<Resolution> { Ok(Resolution::Name(raw.to_uppercase())) };
    let shouting = ChatParser::new().parse_str("family", CHAT, &mut upper)?;
    for entry in Report::new(&shouting.stats).people_ranked() {
        println!("   {}: {}", entry.key, entry.count);
    }

    // Example 3: Rankings
    println!("\n3. Top words and phrases:");
    let report = Report::new(&chat.stats);
    for entry in report.top_words(5) {
        println!("   {}: {}", entry.key, entry.count);
    }
    for entry in report.top_bigrams(3) {
        println!("   \"{}\": {}", entry.key, entry.count);
    }

    // Example 4: Per-person views
    println!("\n4. Per person:");
    for (person, words) in report.top_words_by_person(3) {
        let words: Vec<_> = words.iter().map(|e| e.key.as_str()).collect();
        println!("   {}: {}", person, words.join(", "));
    }
    for entry in report.next_message_distribution("Dana") {
        println!("   Dana was followed by {} {} time(s)", entry.key, entry.count);
    }

    // Example 5: Word groups
    println!("\n5. Word groups:");
    let mut sets = StatsConfig::default().word_groups;
    sets.push(WordGroupSet::new("Laughs", vec![WordGroup::new(["lol", "lool", "loool"])]));
    for set in &sets {
        println!("   {}:", set.title);
        for usage in report.word_group_distribution(&set.groups) {
            println!("     {} / {}: {}", usage.label, usage.person, usage.count);
        }
    }

    // Example 6: Activity series
    println!("\n6. Messages per hour:");
    for (hour, count) in report.hour_series().into_iter().filter(|(_, c)| *c > 0) {
        println!("   {:02}:00 {}", hour, count);
    }

    // Example 7: Serialization
    println!("\n7. JSON snapshot:");
    let json = serde_json::to_string_pretty(&chat.stats.people())?;
    println!("{}", json);

    println!("\n=== Examples complete! ===");
    Ok(())
}
