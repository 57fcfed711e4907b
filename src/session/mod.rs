//! Room session: draft, action routing, termination and outbound events.

pub mod draft;
pub mod events;
pub mod machine;

pub use draft::{Draft, Pick};
pub use events::{
    Audience, FactionResources, FactionView, FullState, GameOverReason, Outbound, ResourceSnapshot, ServerEvent,
};
pub use machine::Session;
