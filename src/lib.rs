//! Incremental, deterministic topological linearization for gossip-replicated
//! event DAGs.
//!
//! Events arrive in arbitrary order, each declaring the names of the events
//! it causally depends on, including names that haven't been seen yet.
//! [`Timeline`] maintains a total order over every event added so far that is
//! consistent with that dependency graph and identical across participants
//! regardless of delivery order, along with a per-event [rank][Timeline::rank]
//! (longest dependency chain length) and a minimal stream of position-mutation
//! commands describing how the order changed.
//!
//! ```
//! use toposync::Timeline;
//!
//! let mut t = Timeline::new();
//! t.add("X", Vec::<&str>::new()).unwrap();
//! t.add("A", vec!["X"]).unwrap();
//! t.add("B", vec!["A"]).unwrap();
//! assert_eq!(t.iter().map(ToString::to_string).collect::<Vec<_>>(), vec!["X", "A", "B"]);
//! assert_eq!(t.rank("B").unwrap(), 2);
//! ```
//!
//! What this crate does not do: gossip or replication, persistent storage,
//! cryptographic verification of event identity, or recovery from a detected
//! dependency cycle (a cycle aborts the `add` call but is not undone).

mod algorithm;
mod command;
mod error;
mod event;
mod timeline;

pub mod dot;

pub use command::Command;
pub use error::TimelineError;
pub use event::EventName;
pub use timeline::{Iter, Timeline};
