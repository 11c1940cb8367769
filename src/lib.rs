//! Search suggestions for a log viewer.
//!
//! Committed search terms are counted in a ternary search trie; typing a
//! prefix returns the most frequently committed terms that start with it.
//! The trie is persisted as a JSON blob after every change and can be served
//! to out-of-process UIs over RESP.

mod cmd;
mod connection;
mod err;
mod frame;
mod handler;

pub mod arg;
pub mod client;
pub mod generation;
pub mod server;
pub mod service;
pub mod storage;

pub use arg::Arg;
pub use err::SuggestErr;
pub use service::SuggestionService;
pub use trie::{Candidate, Trie};

pub type Result<T> = std::result::Result<T, SuggestErr>;
