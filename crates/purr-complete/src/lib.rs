pub mod cache;
pub mod engine;
pub mod error;
pub mod kinds;
pub mod registry;
pub mod spec;

pub use cache::ClusterCache;
pub use engine::{Completer, CompletionContext, Suggestion, SuggestionKind};
pub use error::SpecError;
pub use registry::{CommandRuntime, Registry};
pub use spec::{CommandSpec, FlagDescriptor, RootSpec, TokenDescriptor, TokenKind};
