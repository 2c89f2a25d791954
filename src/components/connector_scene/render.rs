use std::f64::consts::PI;

use web_sys::{CanvasRenderingContext2d, Path2d};

use super::geometry::CurveSpec;
use super::state::SceneState;

const CURVE_SAMPLES: usize = 24;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &SceneState, ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.clear_rect(0.0, 0.0, width, height);

	for (i, connector) in state.connectors.iter().enumerate() {
		let Some(curve) = state.curve(i) else {
			continue;
		};
		if curve.is_degenerate() {
			continue;
		}

		let progress = ease_out_cubic(connector.draw_progress);
		if progress <= 0.0 {
			continue;
		}
		draw_partial_curve(
			ctx,
			&curve,
			progress,
			&connector.spec.color,
			connector.spec.thickness,
		);

		if let Some(t) = connector.pulse_t {
			draw_pulse(ctx, &curve, t, &connector.spec.color, connector.spec.thickness);
		}
	}
}

fn draw_partial_curve(
	ctx: &CanvasRenderingContext2d,
	curve: &CurveSpec,
	progress: f64,
	color: &str,
	thickness: f64,
) {
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(thickness);
	ctx.set_line_cap("round");
	if progress >= 1.0 {
		// finished curves stroke straight from their SVG path data
		if let Ok(path) = Path2d::new_with_path_string(&curve.to_svg_path()) {
			ctx.stroke_with_path(&path);
			return;
		}
	}
	ctx.begin_path();
	ctx.move_to(curve.start.x, curve.start.y);
	// flatten only the revealed head of the curve
	for i in 1..=CURVE_SAMPLES {
		let t = progress * (i as f64) / (CURVE_SAMPLES as f64);
		let p = curve.point_at(t);
		ctx.line_to(p.x, p.y);
	}
	ctx.stroke();
}

fn draw_pulse(
	ctx: &CanvasRenderingContext2d,
	curve: &CurveSpec,
	t: f64,
	color: &str,
	thickness: f64,
) {
	let p = curve.point_at(t);
	// fade the marker out near both endpoints
	let alpha = (PI * t).sin().clamp(0.0, 1.0);
	ctx.set_global_alpha(alpha);
	ctx.set_fill_style_str(color);
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, thickness * 1.8, 0.0, 2.0 * PI);
	ctx.fill();
	ctx.set_global_alpha(1.0);
}
