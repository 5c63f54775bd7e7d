use leptos::prelude::*;

use crate::components::graph_sandbox::{
	EdgeAttributes, EdgeType, GraphData, GraphLink, GraphNode, GraphSandbox, NodeAttributes,
	NodeType, SandboxSettings,
};

const RED: &str = "#FA4F40";
const BLUE: &str = "#727EE0";
const GREEN: &str = "#5DB346";

fn person(name: &str) -> GraphNode {
	picture(name, RED, "/public/user.svg")
}

fn city(name: &str) -> GraphNode {
	picture(name, BLUE, "/public/city.svg")
}

fn picture(name: &str, color: &str, image: &str) -> GraphNode {
	GraphNode {
		id: name.into(),
		position: None,
		attributes: NodeAttributes {
			label: Some(name.into()),
			color: color.into(),
			size: 15.0,
			node_type: NodeType::Image,
			image: Some(image.into()),
			..NodeAttributes::default()
		},
	}
}

fn dish(name: &str) -> GraphNode {
	GraphNode {
		id: name.into(),
		position: None,
		attributes: NodeAttributes {
			label: Some(name.into()),
			color: GREEN.into(),
			size: 15.0,
			node_type: NodeType::Border,
			..NodeAttributes::default()
		},
	}
}

fn link(source: &str, target: &str, edge_type: EdgeType, label: &str) -> GraphLink {
	GraphLink {
		source: source.into(),
		target: target.into(),
		attributes: EdgeAttributes {
			edge_type,
			label: Some(label.into()),
			size: 5.0,
		},
	}
}

/// People, the cities they live in and the food they like.
fn seed_data() -> GraphData {
	GraphData {
		nodes: vec![
			person("John"),
			person("Mary"),
			person("Suzan"),
			city("Nantes"),
			city("New-York"),
			dish("Sushis"),
			dish("Falafels"),
			dish("Kouign Amann"),
		],
		links: vec![
			link("John", "Mary", EdgeType::Line, "works with"),
			link("Mary", "Suzan", EdgeType::Line, "works with"),
			link("Mary", "Nantes", EdgeType::Arrow, "lives in"),
			link("John", "New-York", EdgeType::Arrow, "lives in"),
			link("Suzan", "New-York", EdgeType::Arrow, "lives in"),
			link("Nantes", "New-York", EdgeType::Line, "plane"),
			link("John", "Sushis", EdgeType::Arrow, "likes"),
			link("Mary", "Falafels", EdgeType::Arrow, "likes"),
			link("Suzan", "Kouign Amann", EdgeType::Arrow, "likes"),
			link("Kouign Amann", "Nantes", EdgeType::Arrow, "comes from"),
		],
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(seed_data);
	let (layout_running, set_layout_running) = signal(true);
	let settings = SandboxSettings {
		render_edge_labels: true,
		..SandboxSettings::default()
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<GraphSandbox
					data=graph_data
					layout_running=layout_running
					settings=settings
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"Graph Sandbox"</h1>
					<p class="subtitle">
						"Drag nodes to move them. Click the stage to add a node linked to its two nearest neighbours. Scroll to zoom, drag the background to pan."
					</p>
					<button on:click=move |_| set_layout_running.update(|running| *running = !*running)>
						{move || if layout_running.get() { "Stop layout" } else { "Start layout" }}
					</button>
				</div>
			</div>
		</ErrorBoundary>
	}
}
