pub mod category_set;
pub mod state;

pub use category_set::*;
pub use state::*;
