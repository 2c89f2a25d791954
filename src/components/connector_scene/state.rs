use log::warn;

use super::geometry::{self, CurveSpec, Point, Rect};
use super::types::{ConnectorSpec, NodeSpec, SceneData};

/// Seconds a connector takes to draw in once its stagger delay has elapsed.
pub const DRAW_DURATION: f64 = 0.9;
/// Seconds for one full loop of the flow-pulse marker.
pub const PULSE_PERIOD: f64 = 2.4;

// Frames of per-frame remeasurement after the gate opens, covering the node
// entrance animations that keep moving geometry.
const SETTLE_FRAMES: u32 = 90;
// Passes to keep polling an unmeasurable node before giving up.
const MEASURE_RETRY_BUDGET: u32 = 180;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Gate {
	Unseen,
	Triggered,
}

pub struct NodeSlot {
	pub spec: NodeSpec,
	pub anchor: Option<Point>,
}

pub struct ConnectorSlot {
	pub spec: ConnectorSpec,
	pub draw_progress: f64,
	/// Loop phase in `[0, 1)`; `None` until the draw-in completes.
	pub pulse_t: Option<f64>,
}

pub struct SceneState {
	pub nodes: Vec<NodeSlot>,
	pub connectors: Vec<ConnectorSlot>,
	gate: Gate,
	gate_elapsed: f64,
	settle_frames: u32,
	retry_budget: u32,
	stalled: bool,
	needs_measure: bool,
}

impl SceneState {
	pub fn new(data: &SceneData) -> Self {
		Self {
			nodes: data
				.nodes
				.iter()
				.map(|spec| NodeSlot {
					spec: spec.clone(),
					anchor: None,
				})
				.collect(),
			connectors: data
				.connectors
				.iter()
				.map(|spec| ConnectorSlot {
					spec: spec.clone(),
					draw_progress: 0.0,
					pulse_t: None,
				})
				.collect(),
			gate: Gate::Unseen,
			gate_elapsed: 0.0,
			settle_frames: 0,
			retry_budget: MEASURE_RETRY_BUDGET,
			stalled: false,
			needs_measure: true,
		}
	}

	pub fn triggered(&self) -> bool {
		self.gate == Gate::Triggered
	}

	/// First sighting of the section. The gate is one-shot; repeat calls are
	/// no-ops and never rewind the animation clock.
	pub fn trigger(&mut self) {
		if self.gate == Gate::Triggered {
			return;
		}
		self.gate = Gate::Triggered;
		self.gate_elapsed = 0.0;
		self.settle_frames = SETTLE_FRAMES;
		self.needs_measure = true;
	}

	/// Invalidate every anchor, e.g. after a viewport resize.
	pub fn request_measure(&mut self) {
		self.needs_measure = true;
		self.retry_budget = MEASURE_RETRY_BUDGET;
		self.stalled = false;
	}

	pub fn wants_measure(&self) -> bool {
		self.needs_measure
			|| self.settle_frames > 0
			|| (self.has_unresolved() && self.retry_budget > 0)
	}

	fn has_unresolved(&self) -> bool {
		self.nodes.iter().any(|n| n.anchor.is_none())
	}

	/// One measurement pass. The caller reads the container box once and
	/// every node in the pass resolves against that same frame.
	pub fn recompute_pass<F>(&mut self, container: Option<Rect>, lookup: F)
	where
		F: Fn(&str) -> Option<Rect>,
	{
		for node in &mut self.nodes {
			node.anchor = geometry::resolve_anchor(lookup(&node.spec.id), container);
		}
		self.needs_measure = false;
		if self.settle_frames > 0 {
			self.settle_frames -= 1;
		}
		if self.has_unresolved() {
			self.retry_budget = self.retry_budget.saturating_sub(1);
			if self.retry_budget == 0 && !self.stalled {
				self.stalled = true;
				warn!("some connector nodes never became measurable; leaving their links undrawn");
			}
		} else {
			self.retry_budget = MEASURE_RETRY_BUDGET;
			self.stalled = false;
		}
	}

	pub fn anchor(&self, id: &str) -> Option<Point> {
		self.nodes
			.iter()
			.find(|n| n.spec.id == id)
			.and_then(|n| n.anchor)
	}

	/// Curve for one connector, built only once both endpoint anchors are
	/// resolved.
	pub fn curve(&self, index: usize) -> Option<CurveSpec> {
		let connector = self.connectors.get(index)?;
		let start = self.anchor(&connector.spec.start_id)?;
		let end = self.anchor(&connector.spec.end_id)?;
		Some(geometry::build_curve(start, end))
	}

	/// Advance the animation clocks. A connector starts drawing once the gate
	/// has been open longer than its stagger delay; its pulse starts in the
	/// same tick its draw-in completes and loops until teardown.
	pub fn tick(&mut self, dt: f64) {
		if self.gate != Gate::Triggered {
			return;
		}
		self.gate_elapsed += dt;
		for connector in &mut self.connectors {
			if connector.draw_progress < 1.0 && self.gate_elapsed >= connector.spec.delay {
				connector.draw_progress = (connector.draw_progress + dt / DRAW_DURATION).min(1.0);
			}
			if connector.draw_progress >= 1.0 {
				connector.pulse_t = Some(match connector.pulse_t {
					Some(t) => (t + dt / PULSE_PERIOD) % 1.0,
					None => 0.0,
				});
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, delay: f64) -> NodeSpec {
		NodeSpec {
			id: id.to_string(),
			label: None,
			icon: None,
			color: "#58a6ff".to_string(),
			x_frac: 0.5,
			y_frac: 0.5,
			z: None,
			enter_delay: delay,
		}
	}

	fn connector(start: &str, end: &str, delay: f64) -> ConnectorSpec {
		ConnectorSpec {
			start_id: start.to_string(),
			end_id: end.to_string(),
			color: "#58a6ff".to_string(),
			thickness: 2.0,
			delay,
		}
	}

	fn scene(delays: &[f64]) -> SceneData {
		SceneData {
			nodes: vec![node("a", 0.0), node("b", 0.2)],
			connectors: delays.iter().map(|&d| connector("a", "b", d)).collect(),
		}
	}

	fn boxed(left: f64, top: f64) -> Option<Rect> {
		Some(Rect {
			left,
			top,
			width: 20.0,
			height: 20.0,
		})
	}

	fn frame(left: f64, top: f64) -> Option<Rect> {
		Some(Rect {
			left,
			top,
			width: 800.0,
			height: 400.0,
		})
	}

	fn measured(state: &mut SceneState) {
		state.recompute_pass(frame(50.0, 0.0), |id| match id {
			"a" => boxed(100.0, 50.0),
			"b" => boxed(300.0, 150.0),
			_ => None,
		});
	}

	#[test]
	fn untriggered_scene_never_starts_drawing() {
		let mut state = SceneState::new(&scene(&[0.0]));
		measured(&mut state);
		for _ in 0..500 {
			state.tick(0.016);
		}
		assert_eq!(state.connectors[0].draw_progress, 0.0);
		assert!(state.connectors[0].pulse_t.is_none());
	}

	#[test]
	fn gate_is_one_shot() {
		let mut once = SceneState::new(&scene(&[0.0]));
		let mut twice = SceneState::new(&scene(&[0.0]));

		once.trigger();
		once.tick(0.2);
		once.tick(0.3);

		twice.trigger();
		twice.tick(0.2);
		twice.trigger();
		twice.tick(0.3);

		assert!(twice.triggered());
		assert_eq!(
			once.connectors[0].draw_progress,
			twice.connectors[0].draw_progress
		);
	}

	#[test]
	fn draw_in_respects_stagger_delays() {
		let mut state = SceneState::new(&scene(&[0.0, 0.4]));
		state.trigger();
		state.tick(0.3);
		assert!(state.connectors[0].draw_progress > 0.0);
		assert_eq!(state.connectors[1].draw_progress, 0.0);
		state.tick(0.3);
		assert!(state.connectors[1].draw_progress > 0.0);
	}

	#[test]
	fn pulse_starts_when_draw_in_completes_and_loops() {
		let mut state = SceneState::new(&scene(&[0.0]));
		state.trigger();
		state.tick(DRAW_DURATION + 0.1);
		assert_eq!(state.connectors[0].draw_progress, 1.0);
		assert_eq!(state.connectors[0].pulse_t, Some(0.0));

		state.tick(PULSE_PERIOD / 4.0);
		let phase = state.connectors[0].pulse_t.unwrap();
		assert!((phase - 0.25).abs() < 1e-9);

		state.tick(PULSE_PERIOD);
		let wrapped = state.connectors[0].pulse_t.unwrap();
		assert!((0.0..1.0).contains(&wrapped));
		assert!((wrapped - 0.25).abs() < 1e-9);
	}

	#[test]
	fn curves_require_both_anchors() {
		let mut state = SceneState::new(&scene(&[0.0]));
		assert!(state.curve(0).is_none());

		// only one endpoint measurable
		state.recompute_pass(frame(0.0, 0.0), |id| match id {
			"a" => boxed(100.0, 50.0),
			_ => None,
		});
		assert!(state.anchor("a").is_some());
		assert!(state.anchor("b").is_none());
		assert!(state.curve(0).is_none());

		measured(&mut state);
		let curve = state.curve(0).unwrap();
		assert_eq!(curve.start, Point { x: 60.0, y: 60.0 });
		assert_eq!(curve.end, Point { x: 260.0, y: 160.0 });
		assert_eq!(curve.ctrl.x, 160.0);
	}

	#[test]
	fn one_pass_after_a_container_move_refreshes_every_anchor() {
		let mut state = SceneState::new(&scene(&[0.0]));
		measured(&mut state);
		assert_eq!(state.anchor("a"), Some(Point { x: 60.0, y: 60.0 }));

		// container shifted by (+30, +10), nodes fixed in the viewport
		state.request_measure();
		state.recompute_pass(frame(80.0, 10.0), |id| match id {
			"a" => boxed(100.0, 50.0),
			"b" => boxed(300.0, 150.0),
			_ => None,
		});
		assert_eq!(state.anchor("a"), Some(Point { x: 30.0, y: 50.0 }));
		assert_eq!(state.anchor("b"), Some(Point { x: 230.0, y: 150.0 }));
	}

	#[test]
	fn measurement_polling_is_bounded() {
		let mut state = SceneState::new(&scene(&[0.0]));
		assert!(state.wants_measure());
		for _ in 0..MEASURE_RETRY_BUDGET {
			state.recompute_pass(frame(0.0, 0.0), |_| None);
		}
		assert!(state.stalled);
		assert!(!state.wants_measure());

		// a resize re-arms the poll budget
		state.request_measure();
		assert!(state.wants_measure());
		assert!(!state.stalled);
	}

	#[test]
	fn trigger_schedules_an_immediate_remeasure() {
		let mut state = SceneState::new(&scene(&[0.0]));
		measured(&mut state);
		while state.wants_measure() {
			measured(&mut state);
		}
		state.trigger();
		assert!(state.wants_measure());
	}
}
