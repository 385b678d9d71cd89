pub mod library;
pub mod settings;

pub use library::*;
pub use settings::*;
