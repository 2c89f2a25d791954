use leptos::prelude::*;

use crate::components::connector_scene::{ConnectorScene, ConnectorSpec, NodeSpec, SceneData};

fn node(
	id: &str,
	label: &str,
	icon: &str,
	color: &str,
	(x_frac, y_frac): (f64, f64),
	enter_delay: f64,
) -> NodeSpec {
	NodeSpec {
		id: id.to_string(),
		label: Some(label.to_string()),
		icon: Some(icon.to_string()),
		color: color.to_string(),
		x_frac,
		y_frac,
		z: None,
		enter_delay,
	}
}

fn link(start: &str, end: &str, color: &str, delay: f64) -> ConnectorSpec {
	ConnectorSpec {
		start_id: start.to_string(),
		end_id: end.to_string(),
		color: color.to_string(),
		thickness: 2.0,
		delay,
	}
}

/// Scene data for the integrations section: a central hub with the services
/// it syncs, each link drawing in slightly after its endpoint appears.
fn integrations_scene() -> SceneData {
	let mut hub = node("hub", "Relay", "⚡", "#e8590c", (0.5, 0.5), 0.0);
	hub.z = Some(2);

	SceneData {
		nodes: vec![
			hub,
			node("crm", "CRM", "👥", "#1f77b4", (0.14, 0.22), 0.10),
			node("billing", "Billing", "💳", "#2ca02c", (0.12, 0.72), 0.20),
			node("mail", "Email", "✉", "#9467bd", (0.50, 0.10), 0.30),
			node("warehouse", "Warehouse", "🗄", "#d62728", (0.86, 0.26), 0.40),
			node("chat", "Chat", "💬", "#17becf", (0.88, 0.74), 0.50),
			node("docs", "Docs", "📄", "#bcbd22", (0.52, 0.90), 0.60),
		],
		connectors: vec![
			link("crm", "hub", "#1f77b4", 0.45),
			link("billing", "hub", "#2ca02c", 0.60),
			link("mail", "hub", "#9467bd", 0.75),
			link("hub", "warehouse", "#d62728", 0.90),
			link("hub", "chat", "#17becf", 1.05),
			link("hub", "docs", "#bcbd22", 1.20),
		],
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let scene = Signal::derive(integrations_scene);

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

			<main class="landing">
				<section class="hero">
					<h1>"Every tool. One flow."</h1>
					<p class="subtitle">
						"Relay keeps your stack in sync, so your team never copies data by hand again."
					</p>
					<a class="cta" href="#integrations">"See it in motion"</a>
				</section>

				<section class="integrations" id="integrations">
					<h2>"Your stack, already connected"</h2>
					<p class="subtitle">
						"Scroll down and watch the connections come alive."
					</p>
					<ConnectorScene data=scene height=460.0 />
				</section>
			</main>
		</ErrorBoundary>
	}
}
