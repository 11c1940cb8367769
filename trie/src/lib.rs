//! # trie
//! A ternary search trie that counts how often each word was inserted and
//! answers "most frequent words starting with this prefix" queries.
//!
//! ## Example
//!
//! ```rust
//! use trie::Trie;
//!
//! let mut trie = Trie::new();
//! trie.insert_word("hello");
//! trie.insert_word("hello");
//! trie.insert_word("hell");
//!
//! let top = trie.collect_sorted("hel", 5);
//! assert_eq!(top[0].word, "hello");
//! assert_eq!(top[0].freq, 2);
//!
//! let restored = Trie::from_json(&trie.to_json().unwrap()).unwrap();
//! assert_eq!(restored.frequency("hell"), 1);
//! ```

mod node;
mod snapshot;
mod top_k;
mod tst;
mod walk;

pub use node::{Candidate, Node};
pub use snapshot::NodeRecord;
pub use top_k::TopK;
pub use tst::Trie;
