pub mod controller;
pub mod effect;
pub mod model;
