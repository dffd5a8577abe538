//! softnav Browser
//!
//! Headless driver for the soft-navigation engine. Loads a start page,
//! attaches a navigator, replays clicks and history steps through the page
//! runtime and summarizes the page after each step. A step that ends in a
//! full page load re-bootstraps the page at the new location, the way a
//! browser would.

mod session;
mod step;

pub use session::{Session, SessionError, StepSummary};
pub use step::{Step, StepParseError};
