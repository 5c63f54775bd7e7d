pub mod graph_sandbox;
