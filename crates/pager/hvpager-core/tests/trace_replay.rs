use hvpager::{
    replay, HeadlessSurface, HeadlessWidget, Pager, PagerConfig, RecordingPresentation, Step,
    TraceEvent,
};

fn fresh_pager() -> Pager<HeadlessSurface, HeadlessWidget, RecordingPresentation> {
    Pager::new(
        PagerConfig::default(),
        HeadlessSurface::default(),
        HeadlessWidget::default(),
        RecordingPresentation::default(),
    )
    .expect("default config is valid")
}

fn load_trace(name: &str) -> Vec<TraceEvent> {
    hvpager_test_fixtures::traces::load(name).expect("trace fixture should parse")
}

#[test]
fn every_fixture_trace_replays() {
    for name in hvpager_test_fixtures::traces::keys() {
        let events = load_trace(&name);
        let frames = replay(&mut fresh_pager(), &events)
            .unwrap_or_else(|e| panic!("trace {name} failed: {e}"));
        assert_eq!(frames.len(), events.len());
    }
}

#[test]
fn load_and_advance_trace() {
    let events = load_trace("load-and-advance");
    let frames = replay(&mut fresh_pager(), &events).unwrap();

    let loaded = &frames[0].snapshot;
    assert_eq!(loaded.step, Step::Hero);
    assert!(loaded.locked);

    assert_eq!(frames[1].consumed, Some(true));
    assert_eq!(frames[1].snapshot.step, Step::Vision1);
    assert!(frames[2].snapshot.pending.is_some());

    let last = &frames.last().unwrap().snapshot;
    assert_eq!(last.step, Step::Vision1);
    assert!(last.pending.is_none());
    assert!(last.locked);
}

#[test]
fn slogan_release_and_return_trace() {
    let events = load_trace("slogan-release-and-return");
    let frames = replay(&mut fresh_pager(), &events).unwrap();

    let released = frames
        .iter()
        .position(|f| f.snapshot.released)
        .expect("trace releases to the body");
    assert_eq!(frames[released].consumed, Some(false));
    assert_eq!(frames[released].snapshot.step, Step::Slogan);

    let relocked = &frames[frames.len() - 2].snapshot;
    assert!(!relocked.released);
    assert!(relocked.locked);
    assert!(!relocked.armed_for_release);

    let settled = &frames.last().unwrap().snapshot;
    assert!(settled.armed_for_release);
    assert_eq!(settled.offset, 0.0);
}

#[test]
fn menu_during_gesture_trace() {
    let events = load_trace("menu-during-gesture");
    let frames = replay(&mut fresh_pager(), &events).unwrap();

    // Rejected while the gesture slide is in flight.
    assert_eq!(frames[2].consumed, Some(false));
    assert_eq!(frames[2].snapshot.pending.map(|p| p.to), Some(Step::Vision1));
    // Accepted once it has finished.
    assert_eq!(frames[4].consumed, Some(true));
    assert_eq!(frames[4].snapshot.step, Step::Vision1);
}

#[test]
fn snapshots_serialise() {
    let events = load_trace("load-and-advance");
    let frames = replay(&mut fresh_pager(), &events).unwrap();
    let json = serde_json::to_value(&frames).unwrap();
    assert_eq!(json[1]["snapshot"]["step"], "vision1");
}
