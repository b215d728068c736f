pub mod effect;
pub mod engine;
pub mod model;
