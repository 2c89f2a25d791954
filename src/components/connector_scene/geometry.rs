//! Pure geometry shared by the connector scene: boxes, anchors and curves.

/// Fraction of the horizontal span between two anchors at which the curve's
/// control point sits.
const CURVE_BOW: f64 = 0.5;

/// Anchors closer than this (in px) produce nothing worth stroking.
const DEGENERATE_SPAN: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

/// An axis-aligned bounding box in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub left: f64,
	pub top: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn center(&self) -> Point {
		Point {
			x: self.left + self.width / 2.0,
			y: self.top + self.height / 2.0,
		}
	}

	/// A box with no area (or non-finite coordinates) belongs to an element
	/// that has not finished layout yet.
	pub fn is_measurable(&self) -> bool {
		self.left.is_finite()
			&& self.top.is_finite()
			&& self.width.is_finite()
			&& self.height.is_finite()
			&& self.width > 0.0
			&& self.height > 0.0
	}
}

/// Translate a node's box center into container-relative coordinates.
/// Returns `None` while either box is still unavailable.
pub fn resolve_anchor(node_box: Option<Rect>, container: Option<Rect>) -> Option<Point> {
	let node = node_box?;
	let frame = container?;
	let center = node.center();
	Some(Point {
		x: center.x - frame.left,
		y: center.y - frame.top,
	})
}

/// A quadratic curve between two resolved anchors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveSpec {
	pub start: Point,
	pub ctrl: Point,
	pub end: Point,
}

/// Build the curve for a pair of anchors. The control point sits partway
/// along the horizontal span at the start's height, bowing the line into a
/// gentle arc instead of a straight segment.
pub fn build_curve(start: Point, end: Point) -> CurveSpec {
	let ctrl = Point {
		x: start.x + (end.x - start.x) * CURVE_BOW,
		y: start.y,
	};
	CurveSpec { start, ctrl, end }
}

impl CurveSpec {
	/// Point on the curve at `t`, clamped to `[0, 1]`.
	pub fn point_at(&self, t: f64) -> Point {
		let t = t.clamp(0.0, 1.0);
		let mt = 1.0 - t;
		Point {
			x: mt * mt * self.start.x + 2.0 * mt * t * self.ctrl.x + t * t * self.end.x,
			y: mt * mt * self.start.y + 2.0 * mt * t * self.ctrl.y + t * t * self.end.y,
		}
	}

	pub fn is_degenerate(&self) -> bool {
		let (dx, dy) = (self.end.x - self.start.x, self.end.y - self.start.y);
		(dx * dx + dy * dy).sqrt() < DEGENERATE_SPAN
	}

	/// SVG path data for the full curve.
	pub fn to_svg_path(&self) -> String {
		format!(
			"M {} {} Q {} {} {} {}",
			self.start.x, self.start.y, self.ctrl.x, self.ctrl.y, self.end.x, self.end.y
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn assert_close(a: f64, b: f64) {
		assert!((a - b).abs() < 1e-9, "{a} != {b}");
	}

	fn node_box(left: f64, top: f64) -> Rect {
		Rect {
			left,
			top,
			width: 20.0,
			height: 20.0,
		}
	}

	#[test]
	fn anchors_are_container_relative_box_centers() {
		let container = Rect {
			left: 50.0,
			top: 0.0,
			width: 800.0,
			height: 400.0,
		};
		let a = resolve_anchor(Some(node_box(100.0, 50.0)), Some(container)).unwrap();
		let b = resolve_anchor(Some(node_box(300.0, 150.0)), Some(container)).unwrap();
		assert_close(a.x, 60.0);
		assert_close(a.y, 60.0);
		assert_close(b.x, 260.0);
		assert_close(b.y, 160.0);
	}

	#[test]
	fn unresolved_boxes_propagate_as_none() {
		let container = Rect {
			left: 0.0,
			top: 0.0,
			width: 100.0,
			height: 100.0,
		};
		assert!(resolve_anchor(None, Some(container)).is_none());
		assert!(resolve_anchor(Some(node_box(0.0, 0.0)), None).is_none());
		assert!(resolve_anchor(None, None).is_none());
	}

	#[test]
	fn anchor_shifts_opposite_to_container_translation() {
		let node = node_box(120.0, 80.0);
		let frame = Rect {
			left: 10.0,
			top: 20.0,
			width: 600.0,
			height: 300.0,
		};
		let moved = Rect {
			left: frame.left + 35.0,
			top: frame.top - 12.0,
			..frame
		};
		let before = resolve_anchor(Some(node), Some(frame)).unwrap();
		let after = resolve_anchor(Some(node), Some(moved)).unwrap();
		assert_close(after.x, before.x - 35.0);
		assert_close(after.y, before.y + 12.0);
	}

	#[test]
	fn curves_are_deterministic_with_pinned_control_point() {
		let start = Point { x: 60.0, y: 60.0 };
		let end = Point { x: 260.0, y: 160.0 };
		let curve = build_curve(start, end);
		assert_eq!(curve, build_curve(start, end));
		assert_close(curve.ctrl.x, 160.0);
		assert_close(curve.ctrl.y, 60.0);
		assert_eq!(curve.point_at(0.0), start);
		assert_eq!(curve.point_at(1.0), end);
	}

	#[test]
	fn curve_midpoint_follows_quadratic_form() {
		let curve = build_curve(Point { x: 0.0, y: 0.0 }, Point { x: 100.0, y: 40.0 });
		let mid = curve.point_at(0.5);
		// B(0.5) = 0.25 * start + 0.5 * ctrl + 0.25 * end
		assert_close(mid.x, 0.25 * 0.0 + 0.5 * 50.0 + 0.25 * 100.0);
		assert_close(mid.y, 0.25 * 0.0 + 0.5 * 0.0 + 0.25 * 40.0);
	}

	#[test]
	fn coincident_anchors_are_degenerate() {
		let p = Point { x: 42.0, y: 7.0 };
		assert!(build_curve(p, p).is_degenerate());
		assert!(!build_curve(p, Point { x: 43.0, y: 7.0 }).is_degenerate());
	}

	#[test]
	fn svg_path_uses_quadratic_command() {
		let curve = build_curve(Point { x: 60.0, y: 60.0 }, Point { x: 260.0, y: 160.0 });
		assert_eq!(curve.to_svg_path(), "M 60 60 Q 160 60 260 160");
	}

	#[test]
	fn zero_sized_boxes_are_not_measurable() {
		let mut rect = node_box(10.0, 10.0);
		assert!(rect.is_measurable());
		rect.width = 0.0;
		assert!(!rect.is_measurable());
		rect.width = f64::NAN;
		assert!(!rect.is_measurable());
	}
}
