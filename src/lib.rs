pub mod analysis;
pub mod bootstrap;
pub mod error;
pub mod io;
pub mod processing;
pub mod systems;
