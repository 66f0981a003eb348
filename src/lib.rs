pub mod types;
pub mod world;
pub mod physics;
pub mod describe;
pub mod nl;
pub mod resolve;
pub mod goal;
pub mod dialogue;
pub mod successor;
pub mod heuristic;
pub mod search;
pub mod narrate;
pub mod pipeline;
pub mod fixtures;
pub mod ui;
pub mod line_editor;
