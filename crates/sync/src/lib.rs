pub mod filter;
pub mod synchronizer;

pub use filter::*;
pub use synchronizer::*;
