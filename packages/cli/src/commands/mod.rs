pub mod init;
pub mod normalize;
pub mod render;

pub use init::{init, InitArgs};
pub use normalize::{normalize, NormalizeArgs};
pub use render::{render, RenderArgs};
