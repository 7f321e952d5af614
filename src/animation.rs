pub mod generation;
pub mod scheduler;
