pub mod address;
pub mod error;
pub mod filter;
pub mod value;

pub use address::*;
pub use error::*;
pub use filter::*;
pub use value::*;
