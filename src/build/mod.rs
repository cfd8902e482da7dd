//! Extension and driver builds.
//!
//! - `context`: source root and platform capabilities shared by every step
//! - `extension`: declared compiled extensions and the compiler that builds them
//! - `driver`: the build-extensions step, including the linux kernel driver

pub mod context;
pub mod driver;
pub mod extension;

pub use context::BuildContext;
pub use driver::{BuildExt, BuildReport, PlacedDriver};
pub use extension::{declared_extensions, CcBuilder, ExtensionBuilder, ExtensionTarget};
