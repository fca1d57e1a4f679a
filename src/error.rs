use thiserror::Error;

/// Errors surfaced by [`crate::Timeline`]. None of these are caught
/// internally; every fallible operation on a `Timeline` propagates one of
/// these variants to the caller via `Result`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
	#[error("event '{0}' was already added")]
	DuplicateName(String),

	#[error("event '{0}' is not known to this timeline")]
	Unknown(String),

	/// Detected mid-traversal, during the visit wave of edge integration.
	/// The source acknowledges, and this implementation preserves, that
	/// prior mutations within the same `add` call are **not** undone when
	/// this error is raised: the timeline is left in a partially mutated
	/// state. See `DESIGN.md` for the rationale.
	#[error("adding '{0}' would close a cycle")]
	Cycle(String),
}
