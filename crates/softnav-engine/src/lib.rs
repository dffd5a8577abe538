//! softnav Engine
//!
//! Client-side behavior for a static marketing site, run against an
//! in-memory page: same-origin soft navigation (intercept link clicks,
//! fetch the destination, swap the content region, keep history in
//! sync), plus the page chrome that reacts to it (active nav link,
//! reveal-on-scroll, header shadow, mobile overlay, active-pill
//! indicator).
//!
//! # Pipeline
//! ```text
//! click ─► classifier ─► fetch ─► swap ─► resync ─► history
//!                          │
//!                          └─► full-load fallback (terminal)
//! ```
//!
//! # Example
//! ```rust,ignore
//! use softnav_engine::{HeadlessHost, NavConfig, SmolTimer, SoftNavigator};
//!
//! let nav = SoftNavigator::attach(document, host, fetcher, SmolTimer, NavConfig::default())?;
//! let outcome = nav.click(event).await;
//! ```

pub mod chrome;
pub mod classifier;
mod config;
mod error;
pub mod fetcher;
mod frames;
pub mod history;
mod host;
mod navigator;
pub mod resync;
pub mod reveal;
mod runtime;
pub mod swapper;
mod timer;

pub use classifier::{ClickEvent, Modifiers, Rejection};
pub use config::{ClassNames, ConfigError, NavConfig, Selectors};
pub use error::{NavError, NavigationOutcome};
pub use fetcher::NavigableDocument;
pub use frames::{FrameQueue, FrameTask};
pub use history::NavigationTarget;
pub use host::{DOMRect, HeadlessHost, Host, SessionHistory};
pub use navigator::{PageState, SoftNavigator};
pub use reveal::{IntersectionObserver, RevealStrategy, RootMargin};
pub use runtime::{PageEvent, PageReport, PageRuntime};
pub use timer::{ImmediateTimer, SmolTimer, Timer};

// Re-export sub-crates for embedders
pub use softnav_dom as dom;
pub use softnav_html as html;
pub use softnav_net as net;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
