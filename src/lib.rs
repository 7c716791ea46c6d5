pub mod config;
pub mod driver;
pub mod pattern;
pub mod signal;
pub mod timer;

pub use config::{BenchConfig, ConfigLoader};
pub use driver::{Driver, Mode};
pub use signal::{Connection, Subject};
