//! End-to-end linearization scenarios against a fixed dependency graph:
//!
//!   X:[]  A:[X]  D:[B,C]  E:[D,F]  F:[B]  B:[A]  Y:[X]  C:[A]
//!
//! Expected values are taken from the graph's canonical linearization, which
//! is independent of ingestion order as long as that order respects
//! forward references (an event may declare a predecessor not yet added).

use std::cell::RefCell;
use std::rc::Rc;

use toposync::{Command, Timeline};

const EXPECTED_LINEAR: [&str; 8] = ["X", "A", "Y", "B", "C", "D", "F", "E"];
const EXPECTED_RANKS: [(&str, u32); 8] = [("X", 0), ("A", 1), ("Y", 1), ("B", 2), ("C", 2), ("D", 3), ("F", 3), ("E", 4)];

fn feed(t: &mut Timeline, order: &[(&str, &[&str])]) {
	for (name, after) in order {
		t.add(*name, after.to_vec()).unwrap();
	}
}

fn assert_canonical(t: &Timeline) {
	let linear: Vec<String> = t.iter().map(ToString::to_string).collect();
	assert_eq!(linear, EXPECTED_LINEAR);
	for (name, rank) in EXPECTED_RANKS {
		assert_eq!(t.rank(name).unwrap(), rank, "rank of {name}");
	}
	let mut tips = t.tips();
	tips.sort();
	assert_eq!(tips.iter().map(ToString::to_string).collect::<Vec<_>>(), vec!["E", "Y"]);
}

#[test]
fn ingestion_order_one_reaches_the_canonical_linearization() {
	let mut t = Timeline::new();
	let order: Vec<(&str, &[&str])> = vec![("X", &[]), ("A", &["X"]), ("D", &["B", "C"]), ("E", &["D", "F"]), ("F", &["B"]), ("B", &["A"]), ("Y", &["X"]), ("C", &["A"])];
	feed(&mut t, &order);
	assert_canonical(&t);
}

#[test]
fn a_different_forward_reference_respecting_order_reaches_the_same_linearization() {
	let mut t = Timeline::new();
	let order: Vec<(&str, &[&str])> = vec![("F", &["B"]), ("E", &["D", "F"]), ("X", &[]), ("A", &["X"]), ("B", &["A"]), ("D", &["B", "C"]), ("C", &["A"]), ("Y", &["X"])];
	feed(&mut t, &order);
	assert_canonical(&t);
}

#[test]
fn command_stream_for_order_one_matches_recorded_output() {
	let log = Rc::new(RefCell::new(Vec::new()));
	let log_clone = Rc::clone(&log);

	let mut t = Timeline::new();
	t.set_notify(Some(move |cmd: Command| {
		log_clone.borrow_mut().push(match cmd {
			Command::Ins { name, position } => format!("ins {name}@{position}"),
			Command::Mov { from, to } => format!("mov {from}->{to}"),
		});
	}));

	let order: Vec<(&str, &[&str])> = vec![("X", &[]), ("A", &["X"]), ("D", &["B", "C"]), ("E", &["D", "F"]), ("F", &["B"]), ("B", &["A"]), ("Y", &["X"]), ("C", &["A"])];
	feed(&mut t, &order);

	let commands = log.borrow();
	assert_eq!(commands[0], "ins X@0");
	assert_eq!(commands[1], "ins A@1");
	assert_eq!(commands[2], "ins D@0");
	assert_eq!(commands[3], "ins E@3");
	assert_eq!(commands[4], "ins F@1");
	// Adding B cascades rank propagation through D, E, and F's pending
	// dependency on it; none of the resulting raw moves happen to chain,
	// so compression is a no-op for this call.
	assert_eq!(&commands[5..9], ["ins B@5", "mov 1->5", "mov 3->5", "mov 0->3"]);
	assert_eq!(commands[9], "ins Y@2");
	assert_eq!(commands[10], "ins C@4");
}

#[test]
fn concurrency_matches_the_expected_pairs() {
	let mut t = Timeline::new();
	let order: Vec<(&str, &[&str])> = vec![("X", &[]), ("A", &["X"]), ("D", &["B", "C"]), ("E", &["D", "F"]), ("F", &["B"]), ("B", &["A"]), ("Y", &["X"]), ("C", &["A"])];
	feed(&mut t, &order);

	assert!(t.is_concurrent("Y", "E").unwrap());
	assert!(!t.is_concurrent("A", "D").unwrap());
	assert!(t.is_concurrent("C", "F").unwrap());
}

#[test]
fn duplicate_name_is_rejected_and_leaves_the_timeline_unchanged() {
	let mut t = Timeline::new();
	t.add("A", vec!["X"]).unwrap();
	let len_before = t.len();
	let err = t.add("A", vec!["X"]).unwrap_err();
	assert!(matches!(err, toposync::TimelineError::DuplicateName(ref n) if n == "A"));
	assert_eq!(t.len(), len_before);
}

#[test]
fn unknown_name_queries_fail_with_unknown() {
	let t = Timeline::new();
	assert!(matches!(t.rank("nope"), Err(toposync::TimelineError::Unknown(_))));
	assert!(matches!(t.index("nope"), Err(toposync::TimelineError::Unknown(_))));
}

#[test]
fn a_three_cycle_among_resolved_events_is_rejected() {
	let mut t = Timeline::new();
	t.add("A", Vec::<&str>::new()).unwrap();
	t.add("B", vec!["A"]).unwrap();
	t.add("C", vec!["B"]).unwrap();
	// There is no way to add a resolved edge A -> C using this API once A,
	// B, and C already exist without creating a second event named "A"; the
	// cycle path exercised here instead arrives through pending resolution:
	// D depends on a not-yet-seen "E", and E's later arrival closes the
	// loop back through D's already-resolved chain.
	t.add("D", vec!["C", "e-not-yet-seen"]).unwrap();
	let err = t.add("e-not-yet-seen", vec!["D"]);
	assert!(matches!(err, Err(toposync::TimelineError::Cycle(_))));
}
