pub mod connector_scene;
