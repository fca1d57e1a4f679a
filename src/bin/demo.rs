//! Ingests a small, illustrative dependency graph into a [`Timeline`],
//! printing the command stream, final linearization, and per-event ranks,
//! and, if requested, a Graphviz `.dot` rendering of the result.
//!
//! This binary is an external collaborator: it exercises the library
//! through its public API only.

use clap::Parser;
use toposync::{Command, Timeline};

#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Demonstrates incremental DAG linearization", long_about = None)]
struct Config {
	/// Write a Graphviz `.dot` rendering of the final timeline here.
	#[arg(long, env = "TOPOSYNC_DOT_PATH")]
	dot_path: Option<std::path::PathBuf>,
}

impl Config {
	fn new() -> Self {
		Self::parse()
	}

	#[cfg(test)]
	fn test() -> Self {
		Self { dot_path: None }
	}
}

/// The graph from the original demonstration: X is a genesis event, Y and A
/// each depend on it, B depends on A, C depends on A, D depends on both B
/// and C, F depends on B, and E depends on both D and F.
fn demo_graph() -> Vec<(&'static str, Vec<&'static str>)> {
	vec![
		("X", vec![]),
		("A", vec!["X"]),
		("D", vec!["B", "C"]),
		("E", vec!["D", "F"]),
		("F", vec!["B"]),
		("B", vec!["A"]),
		("Y", vec!["X"]),
		("C", vec!["A"]),
	]
}

fn main() {
	tracing_subscriber::fmt::init();
	let config = Config::new();

	println!("dependency graph, in ingestion order:");
	let graph = demo_graph();
	for (name, after) in &graph {
		println!("  {name} {after:?}");
	}

	let mut timeline = Timeline::new();
	timeline.set_notify(Some(|cmd: Command| match cmd {
		Command::Ins { name, position } => println!("    ins '{name}' at {position}"),
		Command::Mov { from, to } => println!("    mov  {from}  to {to}"),
	}));

	println!("\ncommands for creating the timeline:");
	for (name, after) in graph {
		println!("  adding {name}");
		timeline.add(name, after).expect("demo graph is internally consistent");
	}

	println!("\ntimeline (other valid linearizations may exist for a different ingestion order):");
	let names: Vec<String> = timeline.iter().map(ToString::to_string).collect();
	println!("  {names:?}");
	println!("  note the lexicographic order within the same rank");

	println!("\nname  rank  successor(s)");
	for name in timeline.iter() {
		let rank = timeline.rank(name.as_str()).expect("name came from this timeline");
		println!("  {name:<4}  {rank:>4}");
	}

	println!("\ntips: {:?}", timeline.tips());

	if let Some(path) = config.dot_path {
		let rendered = toposync::dot::render(&timeline);
		if let Err(err) = std::fs::write(&path, rendered) {
			eprintln!("failed to write {}: {err}", path.display());
		} else {
			println!("\nwrote {}", path.display());
		}
	}
}
