mod component;
mod geometry;
mod registry;
mod render;
mod state;
mod types;

pub use component::ConnectorScene;
pub use types::{ConnectorSpec, NodeSpec, SceneData};
