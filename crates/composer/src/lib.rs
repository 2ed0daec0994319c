//! Map composition: waits for the renderer and the thematic source, works
//! out which layers the archive holds, and adds them with interaction.

pub mod compose;
pub mod config;
pub mod interaction;
pub mod sample;
pub mod wait;

pub use compose::*;
pub use config::*;
pub use interaction::*;
pub use sample::*;
pub use wait::*;
