//! Event records and the arena index that identifies them.
//!
//! Events live in a single owning [`crate::Timeline::arena`]; everything
//! else (`succ`, resolved `prev` entries, `pending`, `tips`, `linear`) is a
//! non-owning [`EventIndex`] into that arena. Cycles of references between
//! predecessors and successors are data, not ownership: the arena owns, the
//! indices borrow.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Opaque event identifier, totally ordered by lexicographic byte comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventName(String);

impl EventName {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl<S: Into<String>> From<S> for EventName {
	fn from(s: S) -> Self {
		Self(s.into())
	}
}

impl fmt::Display for EventName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.pad(&self.0)
	}
}

impl std::borrow::Borrow<str> for EventName {
	fn borrow(&self) -> &str {
		&self.0
	}
}

/// Stable, non-owning reference into [`crate::Timeline::arena`].
///
/// Indices never dangle: the arena only ever grows by pushing, so an index
/// handed out for one event remains valid for the lifetime of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventIndex(pub(crate) usize);

impl EventIndex {
	pub(crate) const fn raw(self) -> usize {
		self.0
	}
}

/// A declared predecessor, before or after it has been matched to an
/// [`EventIndex`].
///
/// Modeled as a tagged variant from the outset rather than mutating a
/// homogeneous placeholder list in place (see `DESIGN.md`, resolution of
/// the "`prev` representation" open question).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
	/// The predecessor name has not been `add`-ed yet.
	Unresolved(EventName),
	/// The predecessor has been `add`-ed and is now addressable by index.
	Resolved(EventIndex),
}

impl Dependency {
	pub(crate) const fn resolved(&self) -> Option<EventIndex> {
		match self {
			Self::Resolved(idx) => Some(*idx),
			Self::Unresolved(_) => None,
		}
	}
}

/// Typical fan-out/fan-in for `prev`/`succ` is small; the common case stays
/// on the stack.
pub(crate) type DepList = SmallVec<[Dependency; 4]>;
pub(crate) type SuccList = SmallVec<[EventIndex; 4]>;

/// One record per distinct event name.
///
/// `rank` and `indx` evolve over the event's lifetime as later `add` calls
/// integrate new edges; `name` and the *set* of declared dependencies never
/// change once created (only `Unresolved` entries within `prev` flip to
/// `Resolved`). `vstd`/`cycl` are transient algorithmic flags that are false
/// outside of an in-flight `add`.
#[derive(Debug, Clone)]
pub struct Event {
	pub name: EventName,
	pub prev: DepList,
	pub succ: SuccList,
	pub rank: u32,
	pub indx: usize,
	pub(crate) vstd: bool,
	pub(crate) cycl: bool,
}

impl Event {
	pub(crate) fn new(name: EventName, prev: DepList) -> Self {
		Self {
			name,
			prev,
			succ: SuccList::new(),
			rank: 0,
			indx: 0,
			vstd: false,
			cycl: false,
		}
	}

	/// Pushes `successor` onto `succ` unless it is already present.
	///
	/// An event can only declare a given cause once (self-loops and
	/// duplicates are filtered on ingestion), but `succ` is appended to from
	/// two independent call sites, initial edge resolution and pending
	/// resolution, so the guard keeps invariant 5 (`tips == { e : e.succ is
	/// empty }`) meaningful even if both call sites ever raced for the same
	/// pair within one `add`.
	pub(crate) fn push_succ(&mut self, successor: EventIndex) {
		if !self.succ.contains(&successor) {
			self.succ.push(successor);
		}
	}
}
