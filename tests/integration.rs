//! Integration tests for parsing real chat files

use chatstat::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::Once;

static INIT: Once = Once::new();

fn fixtures_dir() -> &'static str {
    "tests/fixtures"
}

fn ensure_fixtures() {
    INIT.call_once(|| {
        let dir = fixtures_dir();
        if !Path::new(dir).exists() {
            fs::create_dir_all(dir).unwrap();
        }

        // Family chat: phone-number senders, multiline messages, media
        let family = "\
Messages and calls are end-to-end encrypted. No one outside of this chat can read them.
12.8.2023, 7:58 - +972 50-123-4567: בוקר טוב
12.8.2023, 8:01 - Avi: בוקר טוב אמא
מה שלומך היום
12.8.2023, 8:03 - +972 50-123-4567: <המדיה לא נכללה>
12.8.2023, 8:04 - +972 50-123-4567: שלום שלום עולם
1.1.2024, 0:00 - Noa: happy new year
1.1.2024, 0:01 - Avi: happy new year!!
";
        fs::write(format!("{dir}/chat_family.txt"), family).unwrap();

        // Group chat with a bot that should be excluded
        let group = "\
3.4.2024, 18:00 - Dana: who is coming tonight
3.4.2024, 18:01 - Reminder Bot: don't forget the meeting
reply STOP to unsubscribe
3.4.2024, 18:02 - Avi: me
3.4.2024, 18:05 - Dana: great see you
";
        fs::write(format!("{dir}/chat_group.txt"), group).unwrap();

        // Broken headers
        let broken = "\
30.2.2024, 10:00 - Dana: february thirtieth
1.3.2024, 24:30 - Avi: hour out of range
1.3.2024, 10:00 - Noa: the only valid one
";
        fs::write(format!("{dir}/chat_broken.txt"), broken).unwrap();
    });
}

fn fixture(name: &str) -> String {
    ensure_fixtures();
    format!("{}/{}", fixtures_dir(), name)
}

fn family_resolver() -> MappingResolver {
    MappingResolver::new().with_name("+972 50-123-4567", "Mom")
}

// =========================================================================
// Full file parsing
// =========================================================================

#[test]
fn test_parse_family_chat() {
    let chat = ChatParser::new()
        .parse_file(fixture("chat_family.txt"), &mut family_resolver())
        .unwrap();

    assert_eq!(chat.name, "chat_family");
    assert_eq!(chat.summary.recorded, 6);
    assert_eq!(chat.summary.orphan_lines, 1);
    assert_eq!(chat.summary.dropped, 0);

    let stats = &chat.stats;
    assert_eq!(stats.people().get("Mom"), 3);
    assert_eq!(stats.people().get("Avi"), 2);
    assert_eq!(stats.people().get("Noa"), 1);
    assert!(!stats.people().contains("+972 50-123-4567"));

    assert_eq!(stats.years().get(&2023), 4);
    assert_eq!(stats.years().get(&2024), 2);
    assert_eq!(stats.months().get(&8), 4);
    assert_eq!(stats.hours().get(&0), 2);
    assert_eq!(stats.media().count_for("Mom"), 1);
}

#[test]
fn test_people_table_matches_recorded_messages() {
    let chat = ChatParser::new()
        .parse_file(fixture("chat_family.txt"), &mut family_resolver())
        .unwrap();

    assert_eq!(chat.stats.message_count(), chat.summary.recorded as u64);
    assert_eq!(chat.stats.hours().total(), chat.summary.recorded as u64);
    assert_eq!(chat.stats.dates().total(), chat.summary.recorded as u64);
}

#[test]
fn test_phrase_totals_match_per_person_sums() {
    let chat = ChatParser::new()
        .parse_file(fixture("chat_family.txt"), &mut family_resolver())
        .unwrap();

    for table in [chat.stats.words(), chat.stats.bigrams(), chat.stats.trigrams()] {
        for (phrase, counts) in table {
            assert_eq!(counts.per_person().total(), counts.total(), "{phrase}");
        }
    }
}

#[test]
fn test_hebrew_tokenization() {
    let chat = ChatParser::new()
        .parse_file(fixture("chat_family.txt"), &mut family_resolver())
        .unwrap();
    let stats = &chat.stats;

    assert_eq!(stats.words().count_for("שלום", "Mom"), 2);
    assert_eq!(stats.words().count_for("עולם", "Mom"), 1);
    assert_eq!(stats.bigrams().count_for("שלום שלום", "Mom"), 1);
    assert_eq!(stats.bigrams().count_for("שלום עולם", "Mom"), 1);
    assert_eq!(stats.trigrams().count_for("שלום שלום עולם", "Mom"), 1);
}

#[test]
fn test_multiline_message_counted_once() {
    let chat = ChatParser::new()
        .parse_file(fixture("chat_family.txt"), &mut family_resolver())
        .unwrap();
    let stats = &chat.stats;

    // Avi's first message spans two lines
    assert_eq!(stats.trigrams().count_for("טוב אמא מה", "Avi"), 1);
    assert_eq!(stats.words().count_for("היום", "Avi"), 1);
    assert_eq!(stats.hours().get(&8), 3);
}

#[test]
fn test_media_only_in_media_table() {
    let chat = ChatParser::new()
        .parse_file(fixture("chat_family.txt"), &mut family_resolver())
        .unwrap();

    assert_eq!(chat.stats.words().total("המדיה"), 0);
    assert_eq!(chat.stats.words().total("נכללה"), 0);
    assert_eq!(chat.stats.media().total(), 1);
}

#[test]
fn test_each_label_resolved_once() {
    let mut asked: Vec<String> = Vec::new();
    let mut resolver = |raw: &str| -> Result<Resolution> {
        asked.push(raw.to_string());
        Ok(Resolution::Name(raw.to_string()))
    };

    ChatParser::new()
        .parse_file(fixture("chat_family.txt"), &mut resolver)
        .unwrap();

    assert_eq!(asked, vec!["+972 50-123-4567", "Avi", "Noa"]);
}

#[test]
fn test_fresh_mapping_per_chat() {
    let mut calls = 0;
    let mut resolver = |raw: &str| -> Result<Resolution> {
        calls += 1;
        Ok(Resolution::Name(raw.to_string()))
    };

    let parser = ChatParser::new();
    parser.parse_file(fixture("chat_family.txt"), &mut resolver).unwrap();
    parser.parse_file(fixture("chat_family.txt"), &mut resolver).unwrap();

    assert_eq!(calls, 6);
}

#[test]
fn test_excluded_sender_leaves_no_trace() {
    let mut resolver = MappingResolver::new().with_name("Reminder Bot", "dont");
    let chat = ChatParser::new()
        .parse_file(fixture("chat_group.txt"), &mut resolver)
        .unwrap();
    let stats = &chat.stats;

    assert_eq!(chat.summary.excluded, 1);
    assert_eq!(chat.summary.recorded, 3);
    assert!(!stats.people().contains("Reminder Bot"));
    assert_eq!(stats.words().total("meeting"), 0);
    assert_eq!(stats.words().total("unsubscribe"), 0);

    // Dana -> Avi -> Dana, skipping the bot
    assert_eq!(stats.transitions().count("Dana", "Avi"), 1);
    assert_eq!(stats.transitions().count("Avi", "Dana"), 1);
    assert_eq!(stats.transitions().total(), 2);
}

#[test]
fn test_broken_headers_dropped() {
    let chat = ChatParser::new()
        .parse_file(fixture("chat_broken.txt"), &mut MappingResolver::new())
        .unwrap();

    assert_eq!(chat.summary.dropped, 2);
    assert_eq!(chat.summary.recorded, 1);
    assert_eq!(chat.stats.people().get("Noa"), 1);
    assert!(chat.stats.transitions().is_empty());
}

#[test]
fn test_history_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::create(dir.path().join("history.json")).unwrap();

    let chat = ChatParser::new()
        .parse_file(fixture("chat_family.txt"), &mut family_resolver())
        .unwrap();

    assert_eq!(
        store.persist_stats(&chat.name, &chat.stats).unwrap(),
        PersistOutcome::Written
    );
    let written = fs::read_to_string(store.path()).unwrap();

    assert_eq!(
        store.persist_stats(&chat.name, &chat.stats).unwrap(),
        PersistOutcome::AlreadyPresent
    );
    assert_eq!(fs::read_to_string(store.path()).unwrap(), written);

    let doc = store.load().unwrap();
    assert_eq!(doc["chat_family"]["name_dict"]["Mom"], 3);
    assert_eq!(doc["chat_family"]["year_dict"]["2023"], 4);
}

#[test]
fn test_report_over_parsed_chat() {
    let chat = ChatParser::new()
        .parse_file(fixture("chat_family.txt"), &mut family_resolver())
        .unwrap();
    let report = Report::new(&chat.stats);

    let top = report.top_words(2);
    assert_eq!(top[0].key, "happy");
    assert_eq!(top[0].count, 2);

    let people = report.people_ranked();
    assert_eq!(people[0].key, "Mom");

    let by_person = report.top_words_by_person(3);
    assert_eq!(by_person.len(), 3);
    assert!(by_person.values().all(|words| !words.is_empty()));
}
