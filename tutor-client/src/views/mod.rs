//! State behind the three client views.
//!
//! Each view owns only its own inputs and results. The roster list they
//! all read lives in [`crate::App`].

pub mod grading;
pub mod home;
pub mod roster;

pub use grading::{GradingOutcome, GradingView};
pub use home::{EntryRole, HomeView, TranscriptEntry};
pub use roster::{FormMode, RosterView, StudentForm};
