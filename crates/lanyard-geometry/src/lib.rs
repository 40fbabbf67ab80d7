pub mod curve;
pub mod ribbon;

pub use curve::*;
pub use ribbon::*;
