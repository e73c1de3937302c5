//! Discord command implementations organized by former web page.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Damage report commands
pub mod problem;

/// Order commands
pub mod order;

/// Dashboard, reports and exports
pub mod report;

/// Season and shift selection
pub mod scope;

/// Login, logout and user directory
pub mod session;

/// Work commands
pub mod work;

/// Reply helpers shared by the commands
pub mod reply;

// Export commands
pub use general::*;
pub use order::*;
pub use problem::*;
pub use report::*;
pub use scope::*;
pub use session::*;
pub use work::*;
