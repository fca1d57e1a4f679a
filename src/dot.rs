//! Graphviz `.dot` rendering of a [`Timeline`]'s current linearization.
//!
//! An external collaborator, not part of the core: nothing in `timeline.rs`
//! or `algorithm.rs` depends on this module. Edges point from an event to
//! its *causes* (the same "hash pointers to the past" direction the feeds
//! themselves use), which reads backwards from the usual "parent before
//! child" convention.

use std::fmt::Write as _;

use crate::event::Dependency;
use crate::Timeline;

/// Renders `timeline` as a Graphviz `digraph` source string.
///
/// Nodes are labeled with their name and current rank; edges run from an
/// event to each resolved predecessor. A second, disconnected subgraph
/// carries a purely cosmetic time axis.
#[must_use]
pub fn render(timeline: &Timeline) -> String {
	let mut out = String::new();
	out.push_str("digraph {\n");
	out.push_str("  rankdir=RL;\n");
	out.push_str("  splines=true;\n");
	out.push_str("  subgraph dag {\n");
	out.push_str("    node[shape=Mrecord];\n");

	for name in timeline.iter() {
		let rank = timeline.rank(name.as_str()).unwrap_or(0);
		let _ = writeln!(out, "    \"{name}\" [label=\"{name}\\nr={rank}\"]");
		if let Ok(idx) = timeline.resolve(name.as_str()) {
			for dep in &timeline.event(idx).prev {
				if let Dependency::Resolved(cause_idx) = dep {
					let cause_name = &timeline.event(*cause_idx).name;
					let _ = writeln!(out, "    \"{name}\" -> \"{cause_name}\"");
				}
			}
		}
	}

	out.push_str("  }\n");
	out.push_str("  subgraph time {\n");
	out.push_str("    node[shape=plain];\n");
	out.push_str("    \" t\" -> \" \" [dir=back];\n");
	out.push_str("  }\n");
	out.push('}');
	out
}
