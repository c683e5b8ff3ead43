pub mod apps;
pub mod camera;
pub mod coach;
pub mod config;
pub mod data;
pub mod focus;
pub mod mantra;
pub mod settings;
pub mod stats;
