pub mod cache;
pub mod client;
pub mod error;
pub mod resource;
pub mod resources;

pub use cache::{LiveCache, MockCache};
pub use client::KubeClient;
pub use error::KubeError;
pub use resource::ResourceSummary;
