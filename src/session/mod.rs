//! The single conversation session: one controller owns all session state
//! and reacts to front-end actions, capability events, timers and network
//! completions in arrival order.

pub mod controller;
pub mod event;

pub use controller::{SessionBackends, SessionController};
pub use event::{SessionEvent, SessionHandle};
