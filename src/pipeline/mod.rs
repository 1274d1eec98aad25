pub mod chunker;
pub mod runner;
