pub mod effect;
pub mod machine;
