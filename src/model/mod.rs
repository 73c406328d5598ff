pub use terrarium_core::{AgentLogic, SpeciesLogic};
pub mod arena {
    pub use terrarium_core::arena::*;
}
pub mod config {
    pub use terrarium_core::config::*;
}
pub mod environment {
    pub use terrarium_core::environment::*;
}
pub mod interaction {
    pub use terrarium_core::interaction::*;
}
pub mod lifecycle {
    pub use terrarium_core::lifecycle::*;
}
pub mod snapshot {
    pub use terrarium_core::snapshot::*;
}
pub mod spatial {
    pub use terrarium_core::spatial::*;
}
pub mod species {
    pub use terrarium_core::species::*;
}

pub mod history;
pub mod world;

pub mod state {
    pub use terrarium_data::*;
}
