pub mod body;
pub mod clock;
pub mod components;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod interaction;
pub mod math;
pub mod quadtree;
pub mod resources;
pub mod scenario;
pub mod simulation;
pub mod store;
pub mod systems;

pub use body::{Body, BodyState};
pub use clock::SimulationClock;
pub use error::SimError;
pub use interaction::{DragState, PointerInput};
pub use math::{Real, Vec2};
pub use resources::{ForceModel, SimConfig};
pub use scenario::{BinaryOrbit, FixedBodies, Galaxy, Scenario};
pub use simulation::{FrameReport, Simulation};
pub use store::{BodyHandle, BodyStore};
