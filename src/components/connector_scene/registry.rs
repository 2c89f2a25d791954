use std::collections::HashMap;

use web_sys::Element;

use super::geometry::Rect;

/// Tracks the mounted element behind each node id and reads its live
/// bounding box on demand.
#[derive(Default)]
pub struct NodeRegistry {
	nodes: HashMap<String, Element>,
}

impl NodeRegistry {
	pub fn register(&mut self, id: &str, element: Element) {
		self.nodes.insert(id.to_string(), element);
	}

	pub fn contains(&self, id: &str) -> bool {
		self.nodes.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// `None` until the element is mounted and has layout; callers treat that
	/// as "not ready", not as an error.
	pub fn bounding_box(&self, id: &str) -> Option<Rect> {
		let element = self.nodes.get(id)?;
		rect_from_dom(&element.get_bounding_client_rect())
	}

	/// Pick up node elements that were not yet in the DOM when the scene
	/// initialized (first-paint race).
	pub fn register_missing<'a>(
		&mut self,
		container: &Element,
		ids: impl IntoIterator<Item = &'a str>,
	) {
		for id in ids {
			if self.contains(id) {
				continue;
			}
			let selector = format!("[data-node-id=\"{id}\"]");
			if let Ok(Some(element)) = container.query_selector(&selector) {
				self.register(id, element);
			}
		}
	}
}

/// Convert a `DomRect` into a plain box, rejecting unmeasurable geometry.
pub fn rect_from_dom(rect: &web_sys::DomRect) -> Option<Rect> {
	let rect = Rect {
		left: rect.left(),
		top: rect.top(),
		width: rect.width(),
		height: rect.height(),
	};
	rect.is_measurable().then_some(rect)
}
