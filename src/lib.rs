pub mod codec;
pub mod config;
pub mod constraint;
pub mod error;
pub mod math;
pub mod mesh;
pub mod operations;
pub mod services;
pub mod session;
pub mod surface;
pub mod topology;

pub use config::SessionConfig;
pub use error::{Result, SkeletonError};
pub use session::SkeletonSession;
