pub mod canvas;
pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod net;
pub mod presenter;
pub mod state;
pub mod viewer;
pub mod world;

pub use client::Client;
pub use config::*;
pub use error::*;
pub use presenter::{present, Highlight, Presentation, RangeEvent, RenderedShip};
pub use state::{ShipData, ShipId, ShipIndex, State, Vector3};
pub use viewer::Viewer;
pub use world::WorldState;
