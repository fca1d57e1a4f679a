//! The edge-integration routine: folding one new causal edge into an
//! already-linearized timeline while preserving rank and lexicographic
//! invariants.
//!
//! Every operation here is iterative rather than recursive: `visit` walks a
//! successor fan-out that can be arbitrarily deep in a long-lived gossip log,
//! and a recursive walk would risk overflowing the call stack on exactly the
//! inputs this crate exists to handle.

use indexmap::IndexSet;

use crate::error::TimelineError;
use crate::event::{EventIndex, EventName};
use crate::timeline::Timeline;

impl Timeline {
	/// Integrates the edge `self_idx -> cause_idx` (`self_idx` comes after
	/// `cause_idx`): propagates rank forward through everything reachable
	/// from `self_idx`, then repositions every event touched so `linear`
	/// keeps matching rank and lexicographic order.
	///
	/// `root` names the event whose top-level `add` call is driving this
	/// integration, purely so a [`TimelineError::Cycle`], if raised, can
	/// report something the caller recognizes.
	pub(crate) fn edge_to_past(&mut self, self_idx: EventIndex, cause_idx: EventIndex, root: &EventName) -> Result<(), TimelineError> {
		self.event_mut(cause_idx).cycl = true;
		let cause_rank = self.event(cause_idx).rank;
		// `?` here deliberately skips clearing `cycl` on error: the source
		// leaves it set and the timeline partially mutated when a cycle is
		// detected, and this implementation preserves that rather than
		// attempting a rollback. See `DESIGN.md`.
		let visited = self.visit(self_idx, cause_rank, root)?;
		self.event_mut(cause_idx).cycl = false;

		let si = self.event(self_idx).indx;
		let ci = self.event(cause_idx).indx;
		if si < ci {
			self.jump(self_idx, ci);
		} else {
			self.rise(self_idx);
		}

		// Rise every touched event, furthest from the front first, so each
		// one only ever has to move past events that have already settled.
		let mut ordered: Vec<EventIndex> = visited.into_iter().collect();
		ordered.sort_by(|a, b| self.event(*b).indx.cmp(&self.event(*a).indx));
		for v in ordered {
			self.rise(v);
			self.event_mut(v).vstd = false;
		}
		Ok(())
	}

	/// Propagates `base_rank` forward through `start` and everything
	/// reachable via `succ`, using an explicit stack of frames (one frame
	/// per depth level) in place of recursion.
	///
	/// A node's rank is only raised, never lowered, to `base_rank + depth`
	/// when its current rank would otherwise violate "predecessor rank <
	/// successor rank" at that depth; when a node's rank does not need to
	/// rise, its successors are left unvisited (their existing ranks already
	/// satisfy the invariant relative to this new edge).
	///
	/// Returns every event touched (including `start`). Fails with
	/// [`TimelineError::Cycle`] the moment traversal reaches an event
	/// currently flagged as the cause of this integration, i.e. reachable
	/// from itself through the edge being added.
	fn visit(&mut self, start: EventIndex, base_rank: u32, root: &EventName) -> Result<IndexSet<EventIndex>, TimelineError> {
		let mut visited: IndexSet<EventIndex> = IndexSet::new();
		let mut stack: Vec<Vec<EventIndex>> = vec![vec![start]];

		while let Some(frame) = stack.last_mut() {
			let Some(c) = frame.pop() else {
				stack.pop();
				continue;
			};
			let depth = u32::try_from(stack.len()).unwrap_or(u32::MAX);

			self.event_mut(c).vstd = true;
			visited.insert(c);
			if self.event(c).cycl {
				tracing::warn!(event = %self.event(c).name, "cycle detected while integrating edge for '{root}'");
				return Err(TimelineError::Cycle(root.to_string()));
			}

			let floor = base_rank + depth;
			if self.event(c).rank + 1 <= floor {
				tracing::trace!(event = %self.event(c).name, old_rank = self.event(c).rank, new_rank = floor, "rank raised");
				self.event_mut(c).rank = floor;
				let children: Vec<EventIndex> = self.event(c).succ.iter().copied().collect();
				stack.push(children);
			}
		}
		Ok(visited)
	}

	/// Moves `e` forward past every immediate successor in `linear` whose
	/// rank is lower, or whose rank ties and name sorts earlier, stopping as
	/// soon as neither condition holds.
	pub(crate) fn rise(&mut self, e: EventIndex) {
		let len1 = self.linear.len() - 1;
		let si = self.event(e).indx;
		let mut pos = si;

		while pos < len1 && self.event(self.linear[pos + 1]).rank < self.event(e).rank {
			pos += 1;
		}
		while pos < len1 && self.event(self.linear[pos + 1]).rank == self.event(e).rank && self.event(self.linear[pos + 1]).name < self.event(e).name {
			pos += 1;
		}

		if si < pos {
			self.jump(e, pos);
		}
	}

	/// Moves `e` from its current position directly to `new_pos` (which
	/// must be greater than its current position), decrementing the index
	/// of everything it jumps over.
	pub(crate) fn jump(&mut self, e: EventIndex, new_pos: usize) {
		let old = self.event(e).indx;
		debug_assert!(new_pos > old, "jump only ever moves an event forward");
		tracing::debug!(event = %self.event(e).name, from = old, to = new_pos, "jump");
		for &idx in &self.linear[(old + 1)..=new_pos] {
			self.event_mut(idx).indx -= 1;
		}
		self.raw_move(old, new_pos);
		self.event_mut(e).indx = new_pos;
	}
}
