//! Playback controller: the state machine between user actions, the audio
//! engine, the repair pipeline and the play history.

mod controller;
mod session;
mod timer;

pub use controller::{PlaybackController, Progress};
pub use session::{PlaybackSession, PlayerState};
pub use timer::{Clock, SystemClock};
