pub mod diagnostics;
pub mod error;
pub mod memory;
pub mod renderer;
pub mod subscribers;

pub use diagnostics::*;
pub use error::*;
pub use memory::*;
pub use renderer::*;
pub use subscribers::*;
