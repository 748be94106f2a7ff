pub mod file;
pub mod search;

pub use file::*;
pub use search::*;
