use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlDivElement, IntersectionObserver,
	IntersectionObserverEntry, IntersectionObserverInit, Window,
};

use super::registry::{self, NodeRegistry};
use super::render;
use super::state::SceneState;
use super::types::{NodeSpec, SceneData};

/// Fraction of the section that must intersect the viewport before the
/// draw-in animations start.
const GATE_THRESHOLD: f64 = 0.1;
// Cap per-frame time so a backgrounded tab doesn't fast-forward the scene.
const MAX_FRAME_DT: f64 = 0.05;

/// A section that positions node widgets inside a container and draws live,
/// animated curves between them on a canvas overlay.
#[component]
pub fn ConnectorScene(
	#[prop(into)] data: Signal<SceneData>,
	#[prop(default = 420.0)] height: f64,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let (live, set_live) = signal(false);

	let state: Rc<RefCell<Option<SceneState>>> = Rc::new(RefCell::new(None));
	let registry: Rc<RefCell<NodeRegistry>> = Rc::new(RefCell::new(NodeRegistry::default()));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let gate_cb: Rc<RefCell<Option<Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>>>> =
		Rc::new(RefCell::new(None));
	let observer: Rc<RefCell<Option<IntersectionObserver>>> = Rc::new(RefCell::new(None));
	let cancelled: Rc<Cell<bool>> = Rc::new(Cell::new(false));
	let last_frame: Rc<Cell<f64>> = Rc::new(Cell::new(0.0));

	let (state_init, registry_init, animate_init, resize_cb_init, gate_cb_init, observer_init) = (
		state.clone(),
		registry.clone(),
		animate.clone(),
		resize_cb.clone(),
		gate_cb.clone(),
		observer.clone(),
	);
	let (cancelled_init, last_frame_init) = (cancelled.clone(), last_frame.clone());

	Effect::new(move |_| {
		let (Some(container), Some(canvas)) = (container_ref.get(), canvas_ref.get()) else {
			return;
		};
		let container: HtmlDivElement = container.into();
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		canvas.set_width(container.client_width().max(0) as u32);
		canvas.set_height(container.client_height().max(0) as u32);
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let scene = data.get_untracked();
		*state_init.borrow_mut() = Some(SceneState::new(&scene));
		registry_init
			.borrow_mut()
			.register_missing(&container, scene.nodes.iter().map(|n| n.id.as_str()));

		// one-shot visibility gate
		{
			let state_gate = state_init.clone();
			*gate_cb_init.borrow_mut() = Some(Closure::new(
				move |entries: js_sys::Array, obs: IntersectionObserver| {
					let seen = (0..entries.length()).any(|i| {
						entries
							.get(i)
							.dyn_into::<IntersectionObserverEntry>()
							.map(|entry| entry.is_intersecting())
							.unwrap_or(false)
					});
					if !seen {
						return;
					}
					if let Some(ref mut s) = *state_gate.borrow_mut() {
						if !s.triggered() {
							s.trigger();
							debug!("connector scene entered viewport; starting draw-in");
						}
					}
					set_live.set(true);
					obs.disconnect();
				},
			));
			let options = IntersectionObserverInit::new();
			options.set_threshold(&JsValue::from_f64(GATE_THRESHOLD));
			if let Some(ref cb) = *gate_cb_init.borrow() {
				if let Ok(obs) =
					IntersectionObserver::new_with_options(cb.as_ref().unchecked_ref(), &options)
				{
					obs.observe(&container);
					*observer_init.borrow_mut() = Some(obs);
				}
			}
		}

		// resize watcher
		{
			let (state_resize, canvas_resize, container_resize) =
				(state_init.clone(), canvas.clone(), container.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				canvas_resize.set_width(container_resize.client_width().max(0) as u32);
				canvas_resize.set_height(container_resize.client_height().max(0) as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.request_measure();
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		// frame loop
		let (state_anim, registry_anim, animate_inner) = (
			state_init.clone(),
			registry_init.clone(),
			animate_init.clone(),
		);
		let (cancelled_anim, last_frame_anim) = (cancelled_init.clone(), last_frame_init.clone());
		let (container_anim, canvas_anim) = (container.clone(), canvas.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if cancelled_anim.get() {
				return;
			}

			let now = js_sys::Date::now() / 1000.0;
			let prev = last_frame_anim.replace(now);
			let dt = if prev == 0.0 {
				0.016
			} else {
				(now - prev).clamp(0.0, MAX_FRAME_DT)
			};

			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.wants_measure() {
					let mut reg = registry_anim.borrow_mut();
					if reg.len() < s.nodes.len() {
						reg.register_missing(
							&container_anim,
							s.nodes.iter().map(|n| n.spec.id.as_str()),
						);
					}
					// the container box is read once and shared by the pass
					let frame =
						registry::rect_from_dom(&container_anim.get_bounding_client_rect());
					s.recompute_pass(frame, |id| reg.bounding_box(id));
				}
				s.tick(dt);
				render::render(
					s,
					&ctx,
					canvas_anim.width() as f64,
					canvas_anim.height() as f64,
				);
			}

			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (resize_cleanup, observer_cleanup, cancelled_cleanup) =
		(resize_cb.clone(), observer.clone(), cancelled.clone());
	let cleanup_fn = send_wrapper::SendWrapper::new(move || {
		cancelled_cleanup.set(true);
		if let Some(window) = web_sys::window() {
			if let Some(ref cb) = *resize_cleanup.borrow() {
				let _ =
					window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		if let Some(ref obs) = *observer_cleanup.borrow() {
			obs.disconnect();
		}
	});
	on_cleanup(move || {
		cleanup_fn.take()();
	});

	view! {
		<div
			node_ref=container_ref
			class="connector-scene"
			style=format!("height: {height}px;")
		>
			<canvas node_ref=canvas_ref class="connector-scene-canvas" />
			{move || {
				data.get()
					.nodes
					.into_iter()
					.map(|node| node_view(node, live))
					.collect_view()
			}}
		</div>
	}
}

fn node_view(node: NodeSpec, live: ReadSignal<bool>) -> impl IntoView {
	let style = format!(
		"left: {:.2}%; top: {:.2}%; --accent: {}; transition-delay: {}ms; z-index: {};",
		node.x_frac * 100.0,
		node.y_frac * 100.0,
		node.color,
		(node.enter_delay * 1000.0).round() as i64,
		node.z.unwrap_or(1),
	);
	view! {
		<div
			class="connector-node"
			class=("is-live", move || live.get())
			data-node-id=node.id
			style=style
		>
			{node.icon.map(|icon| view! { <span class="connector-node-icon">{icon}</span> })}
			{node
				.label
				.map(|label| view! { <span class="connector-node-label">{label}</span> })}
		</div>
	}
}
