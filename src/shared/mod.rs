pub mod clock;
pub mod errors;
pub mod id;

pub use clock::*;
pub use errors::*;
pub use id::*;
