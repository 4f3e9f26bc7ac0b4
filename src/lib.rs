pub mod error;
pub mod io;
pub mod math;
pub mod model;
pub mod sim;

pub use error::{SimError, SimResult};
pub use model::{EpiModel, Params, Variant};
pub use sim::{Simulation, TimeGrid, Trajectory};
