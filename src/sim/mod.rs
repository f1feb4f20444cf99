//! Deterministic game simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in only through `GameSession::advance`
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies (audio and effects are
//!   requested through `GameEvent`s)

pub mod kick;
pub mod power;
pub mod question;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod tick;

pub use kick::{KickAnimation, arc_control, ball_start, tier_target};
pub use power::{PowerMeter, Tier};
pub use question::Question;
pub use scheduler::{Scheduler, TimerHandle, TimerKind};
pub use session::{GameEvent, GameSession};
pub use state::{Feedback, GamePhase, KickState, RoundState, RoundSummary, Snapshot, format_clock};
