use quadrant_core::model::delegate::Delegate;
use quadrant_core::tags::extract::{dedup_markers, extract_markers, scan_all_markers};
use quadrant_core::tags::normalize::{
    assign_delegate, move_to_quadrant, normalize, remove_time_period, set_time_period,
    toggle_time_period, user_prose,
};
use quadrant_core::{classify_record, Quadrant, RawRecord, Record, TimePeriod};
use uuid::Uuid;

fn classified(title: &str, notes: &str, container: &str) -> Record {
    let raw = RawRecord::new(title, notes, container);
    let quadrant = classify_record(&raw);
    Record::from_raw(&raw, quadrant)
}

#[test]
fn fresh_classification_scenario() {
    let record = classified("Buy milk", "Buy milk\n\n#DoNow #today", "Inbox");
    let normalized = normalize(&record);

    assert_eq!(normalized.quadrant, Some(Quadrant::DoNow));
    assert_eq!(normalized.notes, "Buy milk\n\n#DoNow\n#today");
    assert_eq!(normalized.structured_tags, vec!["#today"]);
}

#[test]
fn quadrant_move_scenario() {
    let record = normalize(&classified("Trip", "Plan trip #thisweek", "Inbox"));
    assert_eq!(record.quadrant, Some(Quadrant::Schedule));
    assert_eq!(record.notes, "Plan trip\n\n#Schedule\n#thisweek");

    let moved = move_to_quadrant(&record, Quadrant::Bin);
    assert_eq!(moved.quadrant, Some(Quadrant::Bin));
    assert!(moved.notes.contains("#Bin"));
    assert!(!moved.notes.contains("#Schedule"));
    assert!(moved.notes.contains("#thisweek"));
    assert_eq!(moved.structured_tags, vec!["#thisweek"]);
}

const MESSY_NOTES: [&str; 7] = [
    "Buy milk\n\n#DoNow #today",
    "##DoNow\n\n  #DoNow  ",
    "  spaced   out \n\n\n\n text # #work #Work #today",
    "#Bin\n#Schedule #challenge prose after",
    "# Do Now #this week call #bob\n\nsecond paragraph",
    "issue#42 follow-up #Delegate",
    "learn C# #DoNow #csharp",
];

#[test]
fn normalize_is_idempotent_on_messy_input() {
    for notes in MESSY_NOTES {
        let once = normalize(&classified("t", notes, "Inbox"));
        let twice = normalize(&once);
        assert_eq!(once, twice, "{notes:?}");
    }
}

#[test]
fn text_markers_equal_tags_plus_quadrant_marker() {
    for notes in MESSY_NOTES {
        let once = normalize(&classified("t", notes, "Inbox"));
        let quadrant = once.quadrant.unwrap();

        let mut expected: Vec<String> = once
            .structured_tags
            .iter()
            .map(|tag| tag.to_lowercase())
            .collect();
        expected.push(quadrant.marker().to_lowercase());
        expected.sort();

        let mut in_text: Vec<String> = dedup_markers(scan_all_markers(&once.notes))
            .into_iter()
            .map(|marker| marker.to_lowercase())
            .collect();
        in_text.sort();

        assert_eq!(in_text, expected, "{notes:?}");
        assert_eq!(extract_markers(&once.notes), once.structured_tags, "{notes:?}");
    }
}

#[test]
fn hash_glued_to_a_word_stays_prose() {
    let normalized = normalize(&classified("x", "learn C# #DoNow", "Inbox"));
    assert_eq!(normalized.notes, "learn C#\n\n#DoNow");
    assert!(normalized.structured_tags.is_empty());
}

#[test]
fn structured_tags_and_text_end_up_in_sync() {
    let mut record = classified("Call", "Call Bob #DoNow", "Inbox");
    record.structured_tags = vec!["bob".to_string(), "#Today".to_string(), "not a tag".to_string()];

    let normalized = normalize(&record);
    assert_eq!(normalized.structured_tags, vec!["#bob", "#today"]);
    assert_eq!(normalized.notes, "Call Bob\n\n#DoNow\n#bob #today");
    for tag in &normalized.structured_tags {
        assert!(normalized.notes.contains(tag.as_str()));
    }
}

#[test]
fn text_markers_win_over_a_shorter_tag_list() {
    let mut record = classified("x", "Report #Schedule #finance", "Inbox");
    record.structured_tags.clear();

    let normalized = normalize(&record);
    assert_eq!(normalized.structured_tags, vec!["#finance"]);
}

#[test]
fn duplicates_collapse_case_insensitively() {
    let normalized = normalize(&classified("x", "a #Work b #work #WORK #Delegate", "Inbox"));
    assert_eq!(normalized.notes, "a b\n\n#Delegate\n#Work");
}

#[test]
fn prose_lines_are_trimmed_and_blank_runs_collapsed() {
    let normalized = normalize(&classified(
        "x",
        "Line one\n  indented #x\n\n\n\nLine two #Bin",
        "Inbox",
    ));
    assert_eq!(normalized.notes, "Line one\nindented\n\nLine two\n\n#Bin\n#x");
    assert_eq!(user_prose(&normalized.notes), "Line one\nindented\n\nLine two");
}

#[test]
fn unassigned_records_keep_tags_without_quadrant_marker() {
    let record = Record::from_raw(&RawRecord::new("x", "note #idea", "Inbox"), None);
    assert_eq!(normalize(&record).notes, "note\n\n#idea");
}

#[test]
fn time_period_set_replaces_and_remove_clears_all() {
    let record = normalize(&classified("x", "Task #DoNow #today #thismonth #home", "Inbox"));

    let weekly = set_time_period(&record, TimePeriod::ThisWeek);
    assert_eq!(weekly.notes, "Task\n\n#DoNow\n#home #thisweek");
    assert_eq!(weekly.time_periods(), vec![TimePeriod::ThisWeek]);

    let cleared = remove_time_period(&record);
    assert_eq!(cleared.notes, "Task\n\n#DoNow\n#home");
    assert!(cleared.time_periods().is_empty());
}

#[test]
fn toggle_time_period_flips() {
    let record = normalize(&classified("x", "Task #DoNow", "Inbox"));

    let on = toggle_time_period(&record, TimePeriod::Today);
    assert!(on.has_tag("#today"));

    let off = toggle_time_period(&on, TimePeriod::Today);
    assert!(!off.has_tag("#today"));
    assert_eq!(off.notes, "Task\n\n#DoNow");
}

#[test]
fn delegate_marker_is_swapped_not_stacked() {
    let john = Delegate::new(Uuid::new_v4(), "JohnD", "John Doe");
    let ann = Delegate::new(Uuid::new_v4(), "Ann", "Ann Lee");
    let directory = vec![ann.clone(), john.clone()];

    let record = normalize(&classified("x", "Fix bug #Delegate #johnd #work", "Inbox"));
    let reassigned = assign_delegate(&record, &directory, Some(&ann));
    assert_eq!(reassigned.notes, "Fix bug\n\n#Delegate\n#work #Ann");

    let cleared = assign_delegate(&reassigned, &directory, None);
    assert_eq!(cleared.notes, "Fix bug\n\n#Delegate\n#work");
}
