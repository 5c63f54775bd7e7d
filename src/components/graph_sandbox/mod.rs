mod camera;
mod color;
mod component;
mod gl;
mod interaction;
mod layout;
mod programs;
mod render;
mod settings;
mod state;
mod store;
mod types;

pub use component::GraphSandbox;
pub use settings::SandboxSettings;
pub use types::{EdgeAttributes, EdgeType, GraphData, GraphLink, GraphNode, NodeAttributes, NodeType};
