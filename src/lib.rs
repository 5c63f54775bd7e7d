//! Graph Sandbox: an interactive force-directed graph editor for the
//! browser. Nodes are painted with WebGL2, edges and labels with Canvas 2D.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

mod components;
mod pages;

// rand reaches the browser's crypto RNG through getrandom's wasm_js backend
#[cfg(target_arch = "wasm32")]
use getrandom as _;

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Routes `log` output to the browser console and reports panics there.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Sandbox page at `/`, anything else is a 404.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		<Title text="Graph Sandbox" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
