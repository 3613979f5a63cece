use quadrant_core::{classify, classify_record, Quadrant, RawRecord};

#[test]
fn fresh_record_with_do_now_marker() {
    assert_eq!(
        classify("Buy milk\n\n#DoNow #today", "Buy milk", "Inbox"),
        Some(Quadrant::DoNow)
    );
}

#[test]
fn unmarked_record_is_unassigned() {
    assert_eq!(classify("Just a note", "Just a note", "Inbox"), None);
    assert_eq!(classify("", "", ""), None);
}

#[test]
fn highest_rank_wins_regardless_of_position() {
    let cases = [
        ("#Bin #Schedule #Delegate #DoNow", Quadrant::DoNow),
        ("#Bin #Schedule #Delegate", Quadrant::Delegate),
        ("#Bin #schedule", Quadrant::Schedule),
        ("#bin #challenge", Quadrant::Bin),
    ];
    for (text, expected) in cases {
        assert_eq!(classify(text, "", ""), Some(expected), "{text}");
    }
}

#[test]
fn every_quadrant_accepts_sloppy_spellings() {
    for quadrant in Quadrant::ALL {
        let word = &quadrant.marker()[1..];
        for text in [
            format!("#{word}"),
            format!("##{word}"),
            format!("# {word}"),
            format!("# #{word}"),
            format!("#{}", word.to_lowercase()),
            format!("#{}", word.to_uppercase()),
        ] {
            assert_eq!(classify(&text, "", ""), Some(quadrant), "{text}");
        }
    }
}

#[test]
fn markers_inside_longer_words_do_not_count() {
    assert_eq!(classify("#Binder #DoNowish #scheduled", "", ""), None);
}

#[test]
fn period_marker_means_schedule() {
    assert_eq!(classify("#today", "", "Inbox"), Some(Quadrant::Schedule));
    assert_eq!(classify("#this quarter", "", ""), Some(Quadrant::Schedule));
    assert_eq!(classify("#today #Delegate", "", ""), Some(Quadrant::Delegate));
}

#[test]
fn period_named_container_without_markers_is_unassigned() {
    for container in ["today", "This Week", "this month", " this quarter "] {
        assert_eq!(classify("call mum", "call mum", container), None, "{container}");
    }
}

#[test]
fn classify_record_reads_title_and_container() {
    let raw = RawRecord::new("Ship it #DoNow", "no markers here", "Backlog");
    assert_eq!(classify_record(&raw), Some(Quadrant::DoNow));

    let raw = RawRecord::new("Plan", "", "#thismonth");
    assert_eq!(classify_record(&raw), Some(Quadrant::Schedule));

    let raw = RawRecord::new("Plan", "", "this month");
    assert_eq!(classify_record(&raw), None);
}
