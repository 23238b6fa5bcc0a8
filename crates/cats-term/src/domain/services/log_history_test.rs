use super::*;
use crate::domain::models::Tone;

fn block(n: usize) -> DisplayBlock {
    return DisplayBlock::text(&format!("block {n}"), Tone::Plain);
}

fn filled(count: usize) -> LogHistory {
    let mut history = LogHistory::default();
    for n in 0..count {
        history.write(block(n));
    }
    return history;
}

#[test]
fn it_starts_empty() {
    let mut history = LogHistory::default();
    assert_eq!(history.cursor(), None);
    assert_eq!(history.previous(), None);
    assert_eq!(history.next(), None);
    assert_eq!(history.replay().count(), 0);
}

#[test]
fn it_moves_cursor_to_latest_write() {
    let history = filled(3);
    assert_eq!(history.cursor(), Some(2));
    assert_eq!(history.current(), Some(&block(2)));
}

#[test]
fn it_navigates_back_and_forth_to_the_same_block() {
    for k in [1, 2, 10, 1000] {
        let mut history = filled(k);
        let last = history.current().cloned();

        for _ in 0..k - 1 {
            assert!(history.previous().is_some());
        }
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(history.previous(), None);

        for _ in 0..k - 1 {
            assert!(history.next().is_some());
        }
        assert_eq!(history.next(), None);
        assert_eq!(history.current().cloned(), last);
    }
}

#[test]
fn it_evicts_oldest_past_capacity() {
    let history = filled(1001);
    assert_eq!(history.len(), 1000);
    assert_eq!(history.replay().next(), Some(&block(1)));
    assert_eq!(history.current(), Some(&block(1000)));
    assert_eq!(history.cursor(), Some(999));
}

#[test]
fn it_replays_prefix_in_order() {
    let mut history = filled(5);
    history.previous();
    history.previous();

    let replayed: Vec<DisplayBlock> = history.replay().cloned().collect();
    assert_eq!(replayed, vec![block(0), block(1), block(2)]);
}

#[test]
fn it_clears() {
    let mut history = filled(4);
    history.clear();
    assert!(history.is_empty());
    assert_eq!(history.cursor(), None);
    assert_eq!(history.current(), None);
}

#[test]
fn it_keeps_at_least_one_slot() {
    let mut history = LogHistory::new(0);
    history.write(block(0));
    history.write(block(1));
    assert_eq!(history.capacity(), 1);
    assert_eq!(history.current(), Some(&block(1)));
}
