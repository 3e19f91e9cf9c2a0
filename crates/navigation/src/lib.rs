//! Marker-driven navigation core: rotation hysteresis, carousel mapping, the
//! five-state menu machine and the single action queue that serializes every
//! mutation of it.

pub mod angle;
pub mod carousel;
pub mod catalog;
pub mod machine;
pub mod player;
pub mod queue;
pub mod registry;
pub mod router;

pub use angle::{AngleDeltaTracker, RotationStep, DEFAULT_ANGLE_THRESHOLD};
pub use catalog::{CarProfile, Catalog};
pub use machine::{
    Action, MachineConfig, NavigationMachine, NavigationSnapshot, Notice, Transition,
};
pub use player::MediaPlayer;
pub use queue::{dispatch_control, ControlMessage, DispatchOutcome};
pub use registry::ObjectRegistry;
pub use router::MarkerRouter;
