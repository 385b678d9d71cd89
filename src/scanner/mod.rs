pub mod video_scanner;

pub use video_scanner::*;
