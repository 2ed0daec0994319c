pub mod basemap;
pub mod expression;
pub mod layer;
pub mod paint;
pub mod spec;
pub mod thematic;

pub use basemap::*;
pub use expression::*;
pub use layer::*;
pub use spec::*;
pub use thematic::*;
