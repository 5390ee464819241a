//! Output rendering module

pub mod renderer;
