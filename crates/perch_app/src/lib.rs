//! Host-side runtime for `perch_core`: the single-threaded session actor,
//! background asset loading, TOML configuration and logger setup.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use perch_app::{App, AppConfig, Command, SessionHooks};
//!
//! struct Hooks;
//!
//! impl SessionHooks for Hooks {
//!     fn on_reanchored(&mut self) {
//!         haptics::tap();
//!     }
//! }
//!
//! let mut session = App::new(tracking, scene, Hooks).build()?;
//! session.load_asset(move || decode("chair.usdz"));
//! let handle = session.handle(); // give this to tracking / gesture callbacks
//!
//! loop {
//!     session.pump();
//!     render(session.placement().entity());
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod session;

pub use builder::App;
pub use config::AppConfig;
pub use error::AppError;
pub use session::{Command, Session, SessionHandle, SessionHooks};

// so hosts can depend on perch_app alone
pub use perch_core;
