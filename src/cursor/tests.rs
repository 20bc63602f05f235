use super::*;
use crate::test_support::{catalog_of, numbered_catalog};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn advance_wraps_forward_from_last() {
    assert_eq!(advance(4, 1, 5).unwrap(), 0);
}

#[test]
fn advance_wraps_backward_from_first() {
    assert_eq!(advance(0, -1, 5).unwrap(), 4);
}

#[test]
fn advance_steps_without_wrap_inside_range() {
    for p in 0..4 {
        assert_eq!(advance(p, 1, 5).unwrap(), p + 1);
    }
    assert_eq!(advance(3, -1, 5).unwrap(), 2);
}

#[test]
fn advance_single_track_always_lands_on_zero() {
    assert_eq!(advance(0, 1, 1).unwrap(), 0);
    assert_eq!(advance(0, -1, 1).unwrap(), 0);
}

#[test]
fn advance_multi_step_wraps_by_euclidean_remainder() {
    assert_eq!(advance(1, 7, 5).unwrap(), 3);
    assert_eq!(advance(1, -7, 5).unwrap(), 4);
    assert_eq!(advance(0, -10, 5).unwrap(), 0);
    assert_eq!(advance(2, 0, 5).unwrap(), 2);
}

#[test]
fn advance_on_empty_catalog_fails_fast() {
    assert!(matches!(advance(0, 1, 0), Err(PlayerError::EmptyCatalog)));
}

proptest! {
    #[test]
    fn forward_then_back_is_identity(len in 1usize..500, seed in any::<usize>()) {
        let p = seed % len;
        let there = advance(p, 1, len).unwrap();
        prop_assert_eq!(advance(there, -1, len).unwrap(), p);
    }

    #[test]
    fn advance_stays_in_range(len in 1usize..500, seed in any::<usize>(), delta in -2000isize..2000) {
        let p = seed % len;
        prop_assert!(advance(p, delta, len).unwrap() < len);
    }
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<(usize, String)>>>);

impl NowPlayingObserver for Recorder {
    fn track_changed(&self, position: usize, track: &TrackRecord) {
        self.0.borrow_mut().push((position, track.title.clone()));
    }
}

#[test]
fn set_current_track_updates_position_and_returns_record() {
    let mut cursor = PlaybackCursor::new(catalog_of(&["a", "b", "c"]));
    assert_eq!(cursor.position(), 0);

    let track = cursor.set_current_track(2).unwrap();
    assert_eq!(track.title, "c");
    assert_eq!(cursor.position(), 2);
    assert_eq!(cursor.current().title, "c");
}

#[test]
fn set_current_track_rejects_out_of_range_and_keeps_position() {
    let mut cursor = PlaybackCursor::new(numbered_catalog(3));
    cursor.set_current_track(1).unwrap();

    let err = cursor.set_current_track(3).unwrap_err();
    assert!(matches!(
        err,
        PlayerError::PositionOutOfRange { position: 3, len: 3 }
    ));
    assert_eq!(cursor.position(), 1);
}

#[test]
fn step_wraps_in_both_directions() {
    let mut cursor = PlaybackCursor::new(numbered_catalog(3));
    assert_eq!(cursor.step(-1).unwrap().title, "t2");
    assert_eq!(cursor.step(1).unwrap().title, "t0");
    assert_eq!(cursor.step(1).unwrap().title, "t1");
}

#[test]
fn observers_are_seeded_on_subscribe_and_see_every_change() {
    let recorder = Recorder::default();
    let mut cursor = PlaybackCursor::new(catalog_of(&["a", "b"]));
    cursor.subscribe(Box::new(recorder.clone()));

    cursor.step(1).unwrap();
    cursor.step(1).unwrap();
    let _ = cursor.set_current_track(9);

    assert_eq!(
        *recorder.0.borrow(),
        vec![
            (0, "a".to_string()),
            (1, "b".to_string()),
            (0, "a".to_string()),
        ]
    );
}
