use epgp_audit::domain::{PlayerName, TransactionRecord};
use epgp_audit::{TrafficLog, TrafficLogError};

fn record_block(
    target: &str,
    giver: &str,
    message: &str,
    nums: [&str; 4],
    item: Option<(i64, &str)>,
    timestamp: &str,
) -> String {
    let mut block = String::from("\t{\n");
    for (i, s) in [target, giver, message].iter().enumerate() {
        block.push_str(&format!("\t\t\"{}\", -- [{}]\n", s, i + 1));
    }
    for (i, n) in nums.iter().enumerate() {
        block.push_str(&format!("\t\t\"{}\", -- [{}]\n", n, i + 4));
    }
    if let Some((id, name)) = item {
        block.push_str(&format!(
            "\t\t\"|cff9d9d9d|Hitem:{}::::::::60|h[{}]|h|r\", -- [8]\n",
            id, name
        ));
    }
    block.push_str(&format!("\t\t\"{}\", -- [9]\n", timestamp));
    block.push_str("\t},\n");
    block
}

fn wrap(records: &str) -> String {
    format!(
        "header noise\nmore noise\nCCEPGP_TRAFFIC = {{\n{}}}\n",
        records
    )
}

fn player(name: &str) -> PlayerName {
    PlayerName::sanitize(name)
}

#[tokio::test]
async fn parses_records_grouped_by_player() {
    let log = wrap(&format!(
        "{}{}{}",
        record_block(
            "Bob",
            "Officer",
            "BWL - Firemaw",
            ["100", "200", "50", "80"],
            Some((19019, "Thunderfury")),
            "1612345678",
        ),
        record_block(
            "Anna",
            "Officer",
            "MC - Ragnaros",
            ["10", "20", "50", "50"],
            None,
            "1612345900",
        ),
        record_block(
            "Bob",
            "Officer",
            "weekly decay",
            ["200", "180", "80", "77"],
            None,
            "1612432078",
        ),
    ));

    let traffic = TrafficLog::parse(log.as_bytes()).await.unwrap();
    assert_eq!(traffic.player_count(), 2);
    assert_eq!(traffic.record_count(), 3);
    assert!(traffic.skipped.is_empty());

    let bob = traffic.for_player(&player("Bob"));
    assert_eq!(bob.len(), 2);
    assert_eq!(bob[0].giver, "Officer");
    assert_eq!(bob[0].message, "BWL - Firemaw");
    assert_eq!(bob[0].ep_before, 100);
    assert_eq!(bob[0].ep_after, 200);
    assert_eq!(bob[0].gp_before, 50);
    assert_eq!(bob[0].gp_after, 80);
    assert_eq!(bob[0].timestamp.timestamp(), 1_612_345_678);
    let item = bob[0].item.as_ref().unwrap();
    assert_eq!(item.id, 19019);
    assert_eq!(item.name, "Thunderfury");
    assert!(bob[1].item.is_none());

    let anna = traffic.for_player(&player("Anna"));
    assert_eq!(anna.len(), 1);
    assert!(anna[0].item.is_none());
}

#[tokio::test]
async fn blank_numeric_payload_reads_as_unknown_sentinel() {
    let log = wrap(&record_block(
        "Bob",
        "Officer",
        "free EP",
        ["", "25", "", "50"],
        None,
        "1612345678",
    ));

    let traffic = TrafficLog::parse(log.as_bytes()).await.unwrap();
    let bob = traffic.for_player(&player("Bob"));
    assert_eq!(bob[0].ep_before, TransactionRecord::UNKNOWN);
    assert_eq!(bob[0].ep_after, 25);
    assert_eq!(bob[0].gp_before, TransactionRecord::UNKNOWN);
    assert_eq!(bob[0].gp_after, 50);
}

#[tokio::test]
async fn non_numeric_payload_skips_record_and_continues() {
    let log = wrap(&format!(
        "{}{}",
        record_block(
            "Bob",
            "Officer",
            "corrupted",
            ["100", "garbage", "50", "80"],
            None,
            "1612345678",
        ),
        record_block(
            "Anna",
            "Officer",
            "fine",
            ["10", "20", "50", "60"],
            None,
            "1612345900",
        ),
    ));

    let traffic = TrafficLog::parse(log.as_bytes()).await.unwrap();
    assert_eq!(traffic.record_count(), 1);
    assert_eq!(traffic.for_player(&player("Anna")).len(), 1);
    assert_eq!(traffic.skipped.len(), 1);
    assert_eq!(traffic.skipped[0].target, "Bob");
    assert!(traffic.skipped[0].reason.contains("EP-after"));
}

#[tokio::test]
async fn timestamp_found_after_one_line_retry() {
    // An extra structural line sits where the timestamp usually is.
    let log = wrap(
        "\t{\n\
         \t\t\"Bob\", -- [1]\n\
         \t\t\"Officer\", -- [2]\n\
         \t\t\"note\", -- [3]\n\
         \t\t\"100\", -- [4]\n\
         \t\t\"200\", -- [5]\n\
         \t\t\"50\", -- [6]\n\
         \t\t\"80\", -- [7]\n\
         \t\t\"extra field\", -- no digits on this line\n\
         \t\t\"1612345678\", -- [9]\n\
         \t},\n",
    );

    let traffic = TrafficLog::parse(log.as_bytes()).await.unwrap();
    let bob = traffic.for_player(&player("Bob"));
    assert_eq!(bob.len(), 1);
    assert_eq!(bob[0].timestamp.timestamp(), 1_612_345_678);
}

#[tokio::test]
async fn missing_timestamp_aborts_whole_parse() {
    let log = wrap(&format!(
        "{}{}",
        "\t{\n\
         \t\t\"Bob\", -- no\n\
         \t\t\"Officer\", -- no\n\
         \t\t\"note\", -- no\n\
         \t\t\"x\", -- no\n\
         \t\t\"x\", -- no\n\
         \t\t\"x\", -- no\n\
         \t\t\"x\", -- no\n\
         \t\t\"aaa\", -- no\n\
         \t\t\"bbb\", -- no\n\
         \t},\n",
        record_block(
            "Anna",
            "Officer",
            "never reached",
            ["10", "20", "50", "60"],
            None,
            "1612345900",
        ),
    ));

    let result = TrafficLog::parse(log.as_bytes()).await;
    match result {
        Err(TrafficLogError::MissingTimestamp { target, .. }) => assert_eq!(target, "Bob"),
        other => panic!("expected MissingTimestamp, got {:?}", other.map(|t| t.record_count())),
    }
}

#[tokio::test]
async fn log_without_marker_is_empty() {
    let traffic = TrafficLog::parse("no table here\nat all\n".as_bytes())
        .await
        .unwrap();
    assert_eq!(traffic.player_count(), 0);
}

#[tokio::test]
async fn records_sorted_by_timestamp_within_player() {
    let log = wrap(&format!(
        "{}{}",
        record_block(
            "Bob",
            "Officer",
            "later",
            ["0", "0", "70", "90"],
            None,
            "1612432078",
        ),
        record_block(
            "Bob",
            "Officer",
            "earlier",
            ["0", "0", "50", "70"],
            None,
            "1612345678",
        ),
    ));

    let traffic = TrafficLog::parse(log.as_bytes()).await.unwrap();
    let bob = traffic.for_player(&player("Bob"));
    assert_eq!(bob[0].message, "earlier");
    assert_eq!(bob[1].message, "later");
}

#[tokio::test]
async fn extra_trailing_fields_are_discarded() {
    // Future schema additions between the timestamp and the closing bracket
    // must not break the parse.
    let log = wrap(
        "\t{\n\
         \t\t\"Bob\", -- [1]\n\
         \t\t\"Officer\", -- [2]\n\
         \t\t\"note\", -- [3]\n\
         \t\t\"100\", -- [4]\n\
         \t\t\"200\", -- [5]\n\
         \t\t\"50\", -- [6]\n\
         \t\t\"80\", -- [7]\n\
         \t\t\"1612345678\", -- [8]\n\
         \t\t\"future field one\",\n\
         \t\t\"future field two\",\n\
         \t},\n",
    );

    let traffic = TrafficLog::parse(log.as_bytes()).await.unwrap();
    assert_eq!(traffic.record_count(), 1);
}

#[tokio::test]
async fn non_ascii_target_matches_sanitized_standings_name() {
    let log = wrap(&record_block(
        "Ausländer",
        "Officer",
        "BWL",
        ["0", "0", "50", "80"],
        None,
        "1612345678",
    ));

    let traffic = TrafficLog::parse(log.as_bytes()).await.unwrap();
    assert_eq!(traffic.for_player(&player("Auslnder")).len(), 1);
}
