pub mod data;

pub use data::agent::*;
pub use data::environment::*;
pub use data::events::*;
