mod runner;

pub use runner::Harness;
