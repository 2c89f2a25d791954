#[derive(Clone, Debug)]
pub struct NodeSpec {
	pub id: String,
	pub label: Option<String>,
	pub icon: Option<String>,
	pub color: String,
	/// Placement inside the container, as fractions of its size.
	pub x_frac: f64,
	pub y_frac: f64,
	pub z: Option<i32>,
	/// Entrance-animation stagger, seconds after the section is first seen.
	pub enter_delay: f64,
}

#[derive(Clone, Debug)]
pub struct ConnectorSpec {
	pub start_id: String,
	pub end_id: String,
	pub color: String,
	pub thickness: f64,
	/// Draw-in stagger, seconds after the section is first seen.
	pub delay: f64,
}

#[derive(Clone, Debug, Default)]
pub struct SceneData {
	pub nodes: Vec<NodeSpec>,
	pub connectors: Vec<ConnectorSpec>,
}
