pub mod controls;
pub mod error;
pub mod level;
pub mod mapping;
pub mod note;
pub mod pad;
pub mod routing;
pub mod schedule;

pub use controls::*;
pub use error::*;
pub use level::*;
pub use mapping::*;
pub use note::*;
pub use pad::*;
pub use routing::*;
pub use schedule::*;

// Shader bundled as a string constant
pub static PAD_WGSL: &str = include_str!("../../shaders/pad.wgsl");
