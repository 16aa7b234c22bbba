//! Loader/Renderer (§4.7, §4.8): the engine's external collaborators.
//! Thin by design — the hard logic stays in `kubediag-engine`.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod error;
mod loader;
mod renderer;

pub use error::LoaderError;
pub use loader::{load_combined, load_split, SnapshotPaths};
pub use renderer::{render, OutputFormat};
