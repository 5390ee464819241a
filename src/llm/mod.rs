//! Text generation integration module

pub mod generator;
pub mod prompts;
