//! Local LLM inference.
//!
//! Wraps a llama.cpp-style model behind one blocking operation:
//! turn an instruction-wrapped prompt into generated C source text.

pub mod generator;
pub mod llama;
pub mod loader;

pub use generator::{build_prompt, GenerateError, Generator, LoadError};
pub use loader::LoaderError;
