use std::collections::HashMap;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};
use thiserror::Error;

use super::layout::LayoutSettings;
use super::types::{EdgeAttributes, EdgeView, NodeAttributes, NodeView};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
	#[error("node `{0}` already exists")]
	DuplicateNode(String),
	#[error("node `{0}` does not exist")]
	MissingNode(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Clone, Debug, Default)]
pub struct StoredNode {
	pub id: String,
	pub attributes: NodeAttributes,
}

/// Nodes and edges of the sandbox. Positions live in the force simulation,
/// everything else in the node's user data. Iteration follows insertion order.
pub struct GraphStore {
	graph: ForceGraph<StoredNode, ()>,
	index: HashMap<String, DefaultNodeIdx>,
	order: Vec<String>,
	edges: Vec<EdgeView>,
	node_mass: f32,
}

impl GraphStore {
	pub fn new(layout: &LayoutSettings) -> Self {
		Self {
			graph: ForceGraph::new(layout.simulation_parameters()),
			index: HashMap::new(),
			order: Vec::new(),
			edges: Vec::new(),
			node_mass: layout.node_mass,
		}
	}

	pub fn add_node(
		&mut self,
		id: impl Into<String>,
		x: f64,
		y: f64,
		attributes: NodeAttributes,
	) -> Result<()> {
		let id = id.into();
		if self.index.contains_key(&id) {
			return Err(StoreError::DuplicateNode(id));
		}
		let idx = self.graph.add_node(NodeData {
			x: x as f32,
			y: y as f32,
			mass: self.node_mass,
			is_anchor: false,
			user_data: StoredNode {
				id: id.clone(),
				attributes,
			},
		});
		self.index.insert(id.clone(), idx);
		self.order.push(id);
		Ok(())
	}

	pub fn add_edge(&mut self, source: &str, target: &str, attributes: EdgeAttributes) -> Result<()> {
		let src = self.idx(source)?;
		let tgt = self.idx(target)?;
		self.graph.add_edge(src, tgt, EdgeData::default());
		self.edges.push(EdgeView {
			source: source.to_string(),
			target: target.to_string(),
			attributes,
		});
		Ok(())
	}

	#[cfg(test)]
	pub fn node(&self, id: &str) -> Option<NodeView> {
		let idx = *self.index.get(id)?;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(NodeView {
					id: node.data.user_data.id.clone(),
					x: node.x() as f64,
					y: node.y() as f64,
					attributes: node.data.user_data.attributes.clone(),
				});
			}
		});
		found
	}

	pub fn nodes(&self) -> Vec<NodeView> {
		let mut by_idx = HashMap::with_capacity(self.order.len());
		self.graph.visit_nodes(|node| {
			by_idx.insert(
				node.index(),
				NodeView {
					id: node.data.user_data.id.clone(),
					x: node.x() as f64,
					y: node.y() as f64,
					attributes: node.data.user_data.attributes.clone(),
				},
			);
		});
		self.order
			.iter()
			.filter_map(|id| by_idx.remove(self.index.get(id)?))
			.collect()
	}

	pub fn edges(&self) -> &[EdgeView] {
		&self.edges
	}

	pub fn node_count(&self) -> usize {
		self.order.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn update_node(&mut self, id: &str, f: impl FnOnce(&mut NodeAttributes)) -> Result<()> {
		let idx = self.idx(id)?;
		let mut f = Some(f);
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				if let Some(f) = f.take() {
					f(&mut node.data.user_data.attributes);
				}
			}
		});
		Ok(())
	}

	pub fn set_position(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
		let idx = self.idx(id)?;
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = x as f32;
				node.data.y = y as f32;
			}
		});
		Ok(())
	}

	/// Anchored nodes keep their position while the simulation runs.
	pub fn set_anchor(&mut self, id: &str, anchored: bool) -> Result<()> {
		let idx = self.idx(id)?;
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.is_anchor = anchored;
			}
		});
		Ok(())
	}

	pub fn step_layout(&mut self, dt: f32) {
		self.graph.update(dt);
	}

	fn idx(&self, id: &str) -> Result<DefaultNodeIdx> {
		self.index
			.get(id)
			.copied()
			.ok_or_else(|| StoreError::MissingNode(id.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn store() -> GraphStore {
		GraphStore::new(&LayoutSettings::default())
	}

	#[test]
	fn rejects_duplicate_ids() {
		let mut store = store();
		store
			.add_node("john", 0.0, 0.0, NodeAttributes::default())
			.unwrap();
		assert_eq!(
			store.add_node("john", 1.0, 1.0, NodeAttributes::default()),
			Err(StoreError::DuplicateNode("john".into()))
		);
		assert_eq!(store.node_count(), 1);
	}

	#[test]
	fn rejects_edges_to_unknown_nodes() {
		let mut store = store();
		store
			.add_node("john", 0.0, 0.0, NodeAttributes::default())
			.unwrap();
		assert_eq!(
			store.add_edge("john", "mary", EdgeAttributes::default()),
			Err(StoreError::MissingNode("mary".into()))
		);
		assert_eq!(store.edge_count(), 0);
	}

	#[test]
	fn iterates_in_insertion_order() {
		let mut store = store();
		for id in ["c", "a", "b"] {
			store
				.add_node(id, 0.0, 0.0, NodeAttributes::default())
				.unwrap();
		}
		let ids: Vec<_> = store.nodes().into_iter().map(|n| n.id).collect();
		assert_eq!(ids, ["c", "a", "b"]);
	}

	#[test]
	fn updates_attributes_and_position() {
		let mut store = store();
		store
			.add_node("john", 0.0, 0.0, NodeAttributes::default())
			.unwrap();
		store
			.add_node("mary", 5.0, 5.0, NodeAttributes::default())
			.unwrap();
		store.update_node("john", |a| a.highlighted = true).unwrap();
		store.set_position("john", 3.5, -2.0).unwrap();

		let john = store.node("john").unwrap();
		assert!(john.attributes.highlighted);
		assert_eq!((john.x, john.y), (3.5, -2.0));

		let mary = store.node("mary").unwrap();
		assert!(!mary.attributes.highlighted);
		assert_eq!((mary.x, mary.y), (5.0, 5.0));
	}

	#[test]
	fn missing_node_updates_fail() {
		let mut store = store();
		assert!(store.set_position("ghost", 0.0, 0.0).is_err());
		assert!(store.update_node("ghost", |_| {}).is_err());
		assert!(store.node("ghost").is_none());
	}
}
