//! Convenience re-exports for consumers of this crate.

pub use crate::pipeline::build;
pub use crate::wrap::{wrap, Wrapped};

pub mod fw {
    pub use crate::error::Error;
}
