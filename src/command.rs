//! The externally observable mutation stream and its compression.
//!
//! Every position-mutating internal operation appends one [`RawCommand`] to
//! the timeline's per-`add` buffer. After the top-level `add` completes,
//! [`compress`] folds that buffer into the minimal [`Command`] stream and
//! hands each one to the `notify` callback.

use crate::event::EventName;

/// A single un-folded mutation, as emitted by the insertion algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawCommand {
	Ins { name: EventName, position: usize },
	Mov { from: usize, to: usize },
}

impl RawCommand {
	/// The position this command leaves its subject at, so the next record
	/// can be checked for chaining.
	const fn resting_position(&self) -> usize {
		match self {
			Self::Ins { position, .. } | Self::Mov { to: position, .. } => *position,
		}
	}

	const fn set_resting_position(&mut self, pos: usize) {
		match self {
			Self::Ins { position, .. } | Self::Mov { to: position, .. } => *position = pos,
		}
	}
}

/// A compressed, externally observable linearization delta.
///
/// A consumer that applies these against a parallel sequence will, after
/// each `add` returns, hold a sequence identical in order and content (by
/// name) to the timeline's `linear`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	/// A new event was placed at `position`. Events at positions `>=
	/// position` at callback time have already shifted one slot toward the
	/// future.
	Ins { name: EventName, position: usize },
	/// An existing event moved from `from` to `to`. Events strictly between
	/// the two positions shift one slot in the opposing direction.
	Mov { from: usize, to: usize },
}

/// Folds a raw command buffer using the two local rules:
///
/// - `ins(name, X)` followed by `mov(X, Y)` folds to `ins(name, Y)`.
/// - `mov(X, Y)` followed by `mov(Y, Z)` folds to `mov(X, Z)`.
///
/// Both rules are one case of "the next record is a `mov` whose `from`
/// matches the resting position of the record we're still building", and that
/// is the only check this function makes. Compression is local (two-record
/// lookahead), deterministic, and total: for any input sequence the output
/// is uniquely defined, and re-running this function over its own output is
/// a no-op (a fixed point).
pub(crate) fn compress(raw: Vec<RawCommand>) -> Vec<Command> {
	let mut out = Vec::with_capacity(raw.len());
	let mut base: Option<RawCommand> = None;

	for cmd in raw {
		if let (Some(b), RawCommand::Mov { from, to }) = (&mut base, &cmd) {
			if b.resting_position() == *from {
				b.set_resting_position(*to);
				continue;
			}
		}
		if let Some(prev) = base.replace(cmd) {
			out.push(finish(prev));
		}
	}
	if let Some(last) = base {
		out.push(finish(last));
	}
	out
}

fn finish(raw: RawCommand) -> Command {
	match raw {
		RawCommand::Ins { name, position } => Command::Ins { name, position },
		RawCommand::Mov { from, to } => Command::Mov { from, to },
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ins(n: &str, p: usize) -> RawCommand {
		RawCommand::Ins { name: n.into(), position: p }
	}
	fn mov(f: usize, t: usize) -> RawCommand {
		RawCommand::Mov { from: f, to: t }
	}

	#[test]
	fn folds_ins_then_mov_chain() {
		let raw = vec![ins("B", 1), mov(1, 5), mov(5, 5)];
		let out = compress(raw);
		assert_eq!(out, vec![Command::Ins { name: "B".into(), position: 5 }]);
	}

	#[test]
	fn folds_mov_chain() {
		let raw = vec![mov(0, 3), mov(3, 4)];
		let out = compress(raw);
		assert_eq!(out, vec![Command::Mov { from: 0, to: 4 }]);
	}

	#[test]
	fn unrelated_commands_stay_separate() {
		let raw = vec![ins("X", 0), ins("A", 1)];
		let out = compress(raw);
		assert_eq!(out, vec![Command::Ins { name: "X".into(), position: 0 }, Command::Ins { name: "A".into(), position: 1 }]);
	}

	#[test]
	fn empty_input_yields_empty_output() {
		assert!(compress(Vec::new()).is_empty());
	}

	#[test]
	fn a_mov_that_does_not_match_flushes_the_base() {
		let raw = vec![ins("B", 5), mov(2, 9)];
		let out = compress(raw);
		assert_eq!(out, vec![Command::Ins { name: "B".into(), position: 5 }, Command::Mov { from: 2, to: 9 }]);
	}

	#[test]
	fn compression_is_idempotent() {
		let raw = vec![ins("B", 1), mov(1, 5), mov(2, 9)];
		let once = compress(raw);
		let twice_input: Vec<RawCommand> = once
			.iter()
			.cloned()
			.map(|c| match c {
				Command::Ins { name, position } => RawCommand::Ins { name, position },
				Command::Mov { from, to } => RawCommand::Mov { from, to },
			})
			.collect();
		let twice = compress(twice_input);
		assert_eq!(once, twice);
	}
}
