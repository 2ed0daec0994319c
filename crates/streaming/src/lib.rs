pub mod archive;
pub mod availability;
pub mod memory;
pub mod metadata;
pub mod remote;

pub use archive::*;
pub use availability::*;
pub use memory::*;
pub use metadata::*;
pub use remote::*;
