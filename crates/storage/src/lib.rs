mod document;
mod error;
pub mod fs;
pub mod global;
mod settings;

pub use document::*;
pub use error::*;
pub use settings::*;
