//! The `Timeline`: an append-only arena of [`Event`]s plus the bookkeeping
//! (`linear`, `pending`, `tips`, `by_name`) that `add` keeps consistent on
//! every call.

use std::collections::HashMap;

use indexmap::IndexSet;
use smallvec::SmallVec;

use crate::command::{compress, Command, RawCommand};
use crate::error::TimelineError;
use crate::event::{DepList, Dependency, Event, EventIndex, EventName};

/// Callback invoked once per compressed [`Command`] an `add` call produces.
type Notify = Box<dyn FnMut(Command)>;

/// An incrementally-linearized, deterministically-ordered DAG of named
/// events.
///
/// Events are added one at a time, each declaring the names of events it
/// comes "after". `Timeline` maintains a total order (`linear`) over every
/// event added so far such that causal order is always respected: if `b`
/// declares `a` as a predecessor, `a` precedes `b` in `linear`. Concurrent
/// events (no causal relationship) are ordered lexicographically by name.
///
/// The arena (`arena`) only ever grows by pushing; every [`EventIndex`]
/// handed out remains valid for the life of the `Timeline`.
pub struct Timeline {
	pub(crate) arena: Vec<Event>,
	pub(crate) linear: Vec<EventIndex>,
	by_name: HashMap<EventName, EventIndex>,
	pending: HashMap<EventName, IndexSet<EventIndex>>,
	pub(crate) tips: IndexSet<EventIndex>,
	notify: Option<Notify>,
	pub(crate) cmds: Vec<RawCommand>,
}

impl Default for Timeline {
	fn default() -> Self {
		Self::new()
	}
}

impl Timeline {
	/// Creates an empty timeline.
	#[must_use]
	pub fn new() -> Self {
		Self {
			arena: Vec::new(),
			linear: Vec::new(),
			by_name: HashMap::new(),
			pending: HashMap::new(),
			tips: IndexSet::new(),
			notify: None,
			cmds: Vec::new(),
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.linear.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.linear.is_empty()
	}

	#[must_use]
	pub fn contains(&self, name: &str) -> bool {
		self.by_name.contains_key(name)
	}

	/// Installs (or clears) the callback invoked with each [`Command`] an
	/// `add` call produces, in order, after `add` has finished mutating the
	/// timeline but before it returns.
	pub fn set_notify<F>(&mut self, callback: Option<F>)
	where
		F: FnMut(Command) + 'static,
	{
		self.notify = callback.map(|f| Box::new(f) as Notify);
	}

	#[must_use]
	pub fn get(&self, pos: usize) -> Option<&EventName> {
		self.linear.get(pos).map(|&idx| &self.event(idx).name)
	}

	/// The current position of `name` in the linearization.
	///
	/// # Errors
	/// Returns [`TimelineError::Unknown`] if `name` has never been added.
	pub fn index(&self, name: &str) -> Result<usize, TimelineError> {
		Ok(self.event(self.resolve(name)?).indx)
	}

	/// The rank assigned to `name` (its longest-path distance from any root,
	/// plus one).
	///
	/// # Errors
	/// Returns [`TimelineError::Unknown`] if `name` has never been added.
	pub fn rank(&self, name: &str) -> Result<u32, TimelineError> {
		Ok(self.event(self.resolve(name)?).rank)
	}

	/// The names with no known successor, sorted ascending.
	#[must_use]
	pub fn tips(&self) -> Vec<EventName> {
		let mut names: Vec<EventName> = self.tips.iter().map(|&idx| self.event(idx).name.clone()).collect();
		names.sort();
		names
	}

	/// Iterates the current linearization front to back.
	pub fn iter(&self) -> Iter<'_> {
		Iter { timeline: self, inner: self.linear.iter() }
	}

	/// Whether `a` and `b` are concurrent: neither is (transitively) a cause
	/// of the other.
	///
	/// # Errors
	/// Returns [`TimelineError::Unknown`] if either name has never been
	/// added.
	pub fn is_concurrent(&self, a: &str, b: &str) -> Result<bool, TimelineError> {
		let pa0 = self.resolve(a)?;
		let pb0 = self.resolve(b)?;
		if pa0 == pb0 {
			return Ok(false);
		}
		if self.event(pa0).rank == self.event(pb0).rank {
			return Ok(true);
		}
		let (pa, pb) = if self.event(pa0).indx <= self.event(pb0).indx { (pa0, pb0) } else { (pb0, pa0) };
		let pb_rank = self.event(pb).rank;

		let mut visited: IndexSet<EventIndex> = IndexSet::new();
		let mut pending = vec![pa];
		while let Some(x) = pending.pop() {
			if x == pb {
				return Ok(false);
			}
			if visited.contains(&x) {
				continue;
			}
			visited.insert(x);
			if self.event(x).rank > pb_rank {
				continue;
			}
			for &s in &self.event(x).succ {
				if !visited.contains(&s) {
					pending.push(s);
				}
			}
		}
		Ok(true)
	}

	/// Adds a new event named `name`, declared to come after each name in
	/// `after`.
	///
	/// `after` entries equal to `name` itself, and duplicate entries, are
	/// silently dropped: an event cannot depend on itself, and declaring
	/// the same cause twice has no additional effect. Names in `after` that
	/// have not been added yet are recorded as pending and resolved the
	/// moment a matching `add` call arrives.
	///
	/// # Errors
	/// Returns [`TimelineError::DuplicateName`] if `name` was already added
	/// (the timeline is left untouched). Returns [`TimelineError::Cycle`] if
	/// integrating the declared edges would close a cycle among already
	/// resolved events; in that case the timeline is left in a partially
	/// mutated state, see `DESIGN.md`.
	pub fn add<N, I, S>(&mut self, name: N, after: I) -> Result<EventName, TimelineError>
	where
		N: Into<EventName>,
		I: IntoIterator<Item = S>,
		S: Into<EventName>,
	{
		let name: EventName = name.into();
		let _span = tracing::debug_span!("timeline_add", event = %name).entered();
		if self.by_name.contains_key(name.as_str()) {
			return Err(TimelineError::DuplicateName(name.to_string()));
		}
		self.cmds.clear();

		let mut causes: IndexSet<EventName> = IndexSet::new();
		for raw in after {
			let cause: EventName = raw.into();
			if cause != name {
				causes.insert(cause);
			}
		}

		let new_idx = EventIndex(self.arena.len());
		self.by_name.insert(name.clone(), new_idx);

		let mut prev: DepList = SmallVec::new();
		for cause_name in causes {
			if let Some(&cause_idx) = self.by_name.get(cause_name.as_str()) {
				self.event_mut(cause_idx).push_succ(new_idx);
				self.tips.shift_remove(&cause_idx);
				prev.push(Dependency::Resolved(cause_idx));
			} else {
				self.pending.entry(cause_name.clone()).or_default().insert(new_idx);
				prev.push(Dependency::Unresolved(cause_name));
			}
		}
		self.arena.push(Event::new(name.clone(), prev));

		// Provisional placement only: at the greatest resolved predecessor's
		// current position (displacing it forward by one), or the front if
		// there are no resolved predecessors yet. `edge_to_past` below
		// immediately corrects this into the causally correct slot; see
		// `DESIGN.md`.
		let pos = self
			.event(new_idx)
			.prev
			.iter()
			.filter_map(Dependency::resolved)
			.map(|idx| self.event(idx).indx)
			.max()
			.unwrap_or(0);

		for &idx in &self.linear[pos..] {
			self.event_mut(idx).indx += 1;
		}
		self.event_mut(new_idx).indx = pos;
		self.linear.insert(pos, new_idx);
		if self.notify.is_some() {
			self.cmds.push(RawCommand::Ins { name: name.clone(), position: pos });
		}

		let anchors: Vec<EventIndex> = self.event(new_idx).prev.iter().filter_map(Dependency::resolved).collect();
		if anchors.is_empty() {
			if self.linear.len() > 1 {
				self.rise(new_idx);
			}
		} else {
			for cause_idx in anchors {
				self.edge_to_past(new_idx, cause_idx, &name)?;
			}
		}

		if let Some(waiters) = self.pending.remove(&name) {
			for e_idx in waiters {
				self.edge_to_past(e_idx, new_idx, &name)?;
				self.event_mut(new_idx).push_succ(e_idx);
				for dep in &mut self.event_mut(e_idx).prev {
					if let Dependency::Unresolved(n) = dep {
						if *n == name {
							*dep = Dependency::Resolved(new_idx);
							break;
						}
					}
				}
			}
		}

		if self.event(new_idx).succ.is_empty() {
			self.tips.insert(new_idx);
		}

		let compressed = compress(std::mem::take(&mut self.cmds));
		if let Some(notify) = self.notify.as_mut() {
			for cmd in compressed {
				notify(cmd);
			}
		}

		Ok(name)
	}

	/// Physically relocates the event at `old` to `to`, recording a raw
	/// `Mov` command if anything is listening. Does not touch any `indx`
	/// field; callers are responsible for keeping `indx` consistent with
	/// the new physical order.
	pub(crate) fn raw_move(&mut self, old: usize, to: usize) {
		let h = self.linear.remove(old);
		self.linear.insert(to, h);
		if self.notify.is_some() {
			self.cmds.push(RawCommand::Mov { from: old, to });
		}
	}

	pub(crate) fn event(&self, idx: EventIndex) -> &Event {
		&self.arena[idx.raw()]
	}

	pub(crate) fn event_mut(&mut self, idx: EventIndex) -> &mut Event {
		&mut self.arena[idx.raw()]
	}

	pub(crate) fn resolve(&self, name: &str) -> Result<EventIndex, TimelineError> {
		self.by_name.get(name).copied().ok_or_else(|| TimelineError::Unknown(name.to_string()))
	}
}

impl std::ops::Index<usize> for Timeline {
	type Output = EventName;

	fn index(&self, pos: usize) -> &EventName {
		&self.event(self.linear[pos]).name
	}
}

/// Front-to-back iterator over a timeline's current linearization.
pub struct Iter<'a> {
	timeline: &'a Timeline,
	inner: std::slice::Iter<'a, EventIndex>,
}

impl<'a> Iterator for Iter<'a> {
	type Item = &'a EventName;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|&idx| &self.timeline.event(idx).name)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<'a> DoubleEndedIterator for Iter<'a> {
	fn next_back(&mut self) -> Option<Self::Item> {
		self.inner.next_back().map(|&idx| &self.timeline.event(idx).name)
	}
}

impl<'a> ExactSizeIterator for Iter<'a> {}

impl<'a> IntoIterator for &'a Timeline {
	type Item = &'a EventName;
	type IntoIter = Iter<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
