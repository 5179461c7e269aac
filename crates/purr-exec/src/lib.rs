pub mod classify;
pub mod command;
pub mod parser;
pub mod runner;

pub use classify::is_destructive;
pub use command::{CompletionKind, CompletionNeeded, ParsedCommand};
pub use parser::parse;
pub use runner::{ExecuteResult, Executor, OutputChunk};
