pub mod observer;
pub mod tracker;
