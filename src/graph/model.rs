use std::collections::HashSet;

use log::{debug, warn};

use super::types::{GraphSnapshot, IncomingUpdate, Key, Link, Node, Position};

/// Append-only store for the session graph.
///
/// Nodes and links keep arrival order across merges. Nothing is deduplicated
/// or validated: a link to an unknown node is kept and only counted. The
/// viewer is single threaded and owns the model through its session; a
/// threaded host would put it behind one `Mutex`.
#[derive(Debug, Default)]
pub struct GraphModel {
	snapshot: GraphSnapshot,
	merges: usize,
	/// Keys of every node merged so far.
	keys: HashSet<Key>,
	/// Indices of links with at least one endpoint not in `keys`.
	unresolved: Vec<usize>,
}

fn resolves(keys: &HashSet<Key>, link: &Link) -> bool {
	keys.contains(&link.source) && keys.contains(&link.target)
}

impl GraphModel {
	/// An empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append an update and return the resulting snapshot.
	pub fn merge(&mut self, update: IncomingUpdate) -> &GraphSnapshot {
		let (added_nodes, added_links) = (update.new_nodes.len(), update.new_links.len());
		let first_new_link = self.snapshot.links.len();
		self.keys
			.extend(update.new_nodes.iter().filter_map(Node::key));
		self.snapshot.nodes.extend(update.new_nodes);
		self.snapshot.links.extend(update.new_links);
		self.merges += 1;

		// Only links that were dangling before, or just arrived, can change.
		let (keys, links) = (&self.keys, &self.snapshot.links);
		self.unresolved.retain(|&i| !resolves(keys, &links[i]));
		self.unresolved
			.extend((first_new_link..links.len()).filter(|&i| !resolves(keys, &links[i])));

		debug!(
			"merge #{}: +{} nodes, +{} links (total {} / {})",
			self.merges,
			added_nodes,
			added_links,
			self.snapshot.nodes.len(),
			self.snapshot.links.len()
		);

		let dangling = self.dangling_links();
		if dangling > 0 {
			warn!("{dangling} link(s) reference nodes not present in the graph");
		}

		&self.snapshot
	}

	/// The live graph, reflecting the latest merge.
	pub fn current_snapshot(&self) -> &GraphSnapshot {
		&self.snapshot
	}

	/// Number of updates merged so far.
	pub fn merge_count(&self) -> usize {
		self.merges
	}

	/// Links whose source or target does not resolve to any node key.
	pub fn dangling_links(&self) -> usize {
		self.unresolved.len()
	}

	/// Copy layout positions back into the model by node index.
	///
	/// Positions are the only node fields that change after a merge. Entries
	/// beyond the current node count are ignored. Returns how many nodes were
	/// updated.
	pub fn sync_positions(&mut self, positions: &[Option<Position>]) -> usize {
		let mut updated = 0;
		for (node, pos) in self.snapshot.nodes.iter_mut().zip(positions) {
			if let Some(pos) = pos {
				node.set_position(*pos);
				updated += 1;
			}
		}
		updated
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn update(names: &[&str], links: &[(&str, &str)]) -> IncomingUpdate {
		IncomingUpdate::new(
			names.iter().map(|n| Node::named(n, 1)).collect(),
			links.iter().map(|(s, t)| Link::new(*s, *t)).collect(),
		)
	}

	fn names(model: &GraphModel) -> Vec<String> {
		model
			.current_snapshot()
			.nodes
			.iter()
			.filter_map(|n| n.name.clone())
			.collect()
	}

	#[test]
	fn starts_empty() {
		let model = GraphModel::new();
		assert_eq!(model.current_snapshot(), &GraphSnapshot::default());
		assert_eq!(model.merge_count(), 0);
	}

	#[test]
	fn merges_append_in_arrival_order() {
		let mut model = GraphModel::new();
		model.merge(update(&["A", "B"], &[("A", "B")]));
		let snap = model.merge(update(&["C", "A"], &[("C", "A"), ("B", "C")]));

		assert_eq!(snap.nodes.len(), 4);
		assert_eq!(names(&model), ["A", "B", "C", "A"]);
		let links: Vec<String> = model
			.current_snapshot()
			.links
			.iter()
			.map(|l| format!("{}->{}", l.source, l.target))
			.collect();
		assert_eq!(links, ["A->B", "C->A", "B->C"]);
		assert_eq!(model.merge_count(), 2);
	}

	#[test]
	fn repeated_reads_are_equal() {
		let mut model = GraphModel::new();
		model.merge(update(&["A"], &[]));
		let first = model.current_snapshot().clone();
		assert_eq!(&first, model.current_snapshot());
	}

	#[test]
	fn dangling_links_are_kept_and_counted() {
		let mut model = GraphModel::new();
		model.merge(update(&["A"], &[("A", "Z"), ("Y", "A")]));
		assert_eq!(model.current_snapshot().links.len(), 2);
		assert_eq!(model.dangling_links(), 2);

		model.merge(update(&["Z"], &[]));
		assert_eq!(model.dangling_links(), 1);
	}

	#[test]
	fn dangling_count_tracks_a_full_recount() {
		let batches = [
			update(&["A"], &[("A", "B"), ("C", "D")]),
			update(&["B"], &[("B", "E")]),
			update(&["C", "E"], &[("E", "A")]),
			update(&["D"], &[("D", "F"), ("A", "A")]),
		];
		let mut model = GraphModel::new();
		for batch in batches {
			model.merge(batch);
			let snap = model.current_snapshot();
			let known: HashSet<Key> = snap.nodes.iter().filter_map(Node::key).collect();
			let recount = snap.links.iter().filter(|l| !resolves(&known, l)).count();
			assert_eq!(model.dangling_links(), recount);
		}
		assert_eq!(model.dangling_links(), 1);
	}

	#[test]
	fn links_resolve_by_explicit_id() {
		let mut node = Node::named("Alpha", 1);
		node.id = Some(Key::from(7));
		let mut model = GraphModel::new();
		model.merge(IncomingUpdate::new(
			vec![node, Node::named("B", 1)],
			vec![Link::new(7, "B"), Link::new("Alpha", "B")],
		));
		assert_eq!(model.dangling_links(), 1);
	}

	#[test]
	fn nameless_nodes_are_accepted() {
		let mut model = GraphModel::new();
		model.merge(IncomingUpdate::new(vec![Node::default()], vec![]));
		assert_eq!(model.current_snapshot().nodes.len(), 1);
	}

	#[test]
	fn sync_positions_updates_by_index() {
		let mut model = GraphModel::new();
		model.merge(update(&["A", "B"], &[]));
		let updated = model.sync_positions(&[
			None,
			Some(Position::new(1.0, 2.0, 3.0)),
			Some(Position::new(9.0, 9.0, 9.0)),
		]);

		assert_eq!(updated, 1);
		let nodes = &model.current_snapshot().nodes;
		assert_eq!(nodes[0].position(), None);
		assert_eq!(nodes[1].position(), Some(Position::new(1.0, 2.0, 3.0)));
	}
}
