pub mod alias;
pub mod category;
pub mod classify;
pub mod color;

// Ownership symbology: the fixed category vocabulary and the rules that map
// free-text agency names onto it.
pub use alias::*;
pub use category::*;
pub use classify::*;
pub use color::*;
