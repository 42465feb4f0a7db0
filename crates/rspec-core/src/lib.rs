pub mod error;
pub mod hook;
pub mod outcome;
pub mod suite;
pub mod value;

pub use error::RhaiSpecError;
pub use hook::*;
pub use outcome::*;
pub use suite::*;
pub use value::*;
