pub mod kind;
pub mod naming;
pub mod raw;

pub use kind::*;
pub use naming::*;
pub use raw::*;
