//! Bird Archer: shoot the birds before they cross the field.
//!
//! The library is the whole game core (spawning, motion, hit detection,
//! score/lives bookkeeping, the session state machine and the persisted
//! leaderboard).  Rendering, input devices and player identity are supplied
//! by the front end through `session::FrameSink`, `Session::tap` and
//! `identity::Identity`.

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod identity;
pub mod leaderboard;
pub mod session;
pub mod timer;
