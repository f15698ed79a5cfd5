use sprout_core::op::{lit, rule};

use super::frame::FrameArena;
use super::grammars::GrammarId;

#[test]
fn push_binds_arguments_by_position() {
    let names = vec!["item".to_string(), "sep".to_string()];
    let args = vec![lit("a"), lit(",")];
    let mut arena = FrameArena::new();

    let idx = arena.push(&names, &args, GrammarId::ROOT);
    assert_eq!(arena.current(), Some(idx));

    let frame = arena.current_frame().unwrap();
    assert_eq!(frame.lookup("item"), Some(&args[0]));
    assert_eq!(frame.lookup("sep"), Some(&args[1]));
    assert_eq!(frame.lookup("other"), None);
    assert_eq!(frame.parent, None);
}

#[test]
fn frames_chain_to_the_supplying_environment() {
    let outer_names = vec!["y".to_string()];
    let outer_args = vec![lit("ab")];
    let inner_names = vec!["x".to_string()];
    let inner_args = vec![rule("y")];
    let mut arena = FrameArena::new();

    let outer = arena.push(&outer_names, &outer_args, GrammarId::ROOT);
    let inner = arena.push(&inner_names, &inner_args, GrammarId(1));

    let frame = *arena.current_frame().unwrap();
    assert_eq!(frame.parent, Some(outer));
    assert_eq!(frame.grammar, GrammarId(1));

    // Evaluating an argument moves below the top without freeing anything.
    arena.restore(frame.parent);
    assert_eq!(arena.current(), Some(outer));
    assert_eq!(arena.depth(), 2);

    arena.restore(Some(inner));
    assert_eq!(arena.current_frame().unwrap().lookup("x"), Some(&inner_args[0]));
}

#[test]
fn pop_to_releases_frames_and_restores_environment() {
    let names = vec!["x".to_string()];
    let args = vec![lit("a")];
    let mut arena = FrameArena::new();

    let first = arena.push(&names, &args, GrammarId::ROOT);
    let mark = arena.mark();
    arena.push(&names, &args, GrammarId::ROOT);
    arena.push(&names, &args, GrammarId::ROOT);
    assert_eq!(arena.depth(), 3);

    arena.pop_to(mark);
    assert_eq!(arena.depth(), 1);
    assert_eq!(arena.current(), Some(first));

    arena.clear();
    assert_eq!(arena.depth(), 0);
    assert!(arena.current_frame().is_none());
}
