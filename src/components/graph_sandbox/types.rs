/// How a node is painted. Each variant maps to a paint program in the
/// registry; unregistered types fall back to the default circle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeType {
	#[default]
	Circle,
	Border,
	Image,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeType {
	#[default]
	Line,
	Arrow,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeAttributes {
	pub label: Option<String>,
	pub color: String,
	pub size: f64,
	pub node_type: NodeType,
	pub image: Option<String>,
	pub highlighted: bool,
}

impl Default for NodeAttributes {
	fn default() -> Self {
		Self {
			label: None,
			color: "#666666".into(),
			size: 10.0,
			node_type: NodeType::default(),
			image: None,
			highlighted: false,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeAttributes {
	pub edge_type: EdgeType,
	pub label: Option<String>,
	pub size: f64,
}

impl Default for EdgeAttributes {
	fn default() -> Self {
		Self {
			edge_type: EdgeType::default(),
			label: None,
			size: 1.0,
		}
	}
}

/// Snapshot of a node as read from the store.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeView {
	pub id: String,
	pub x: f64,
	pub y: f64,
	pub attributes: NodeAttributes,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeView {
	pub source: String,
	pub target: String,
	pub attributes: EdgeAttributes,
}

#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: String,
	pub position: Option<(f64, f64)>,
	pub attributes: NodeAttributes,
}

#[derive(Clone, Debug)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	pub attributes: EdgeAttributes,
}

#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}
