pub mod clock;
pub mod scheduler;
pub mod stage;
