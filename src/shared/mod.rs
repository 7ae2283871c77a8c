pub mod constants;
pub mod lifecycle;
pub mod types;
