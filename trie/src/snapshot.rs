//! Persisted form of a [`Trie`].
//!
//! Every node becomes `{character, freq, left, middle, right}` with explicit
//! `null` for missing children, and the empty trie is `null`. Decoding is
//! lenient per node: a record without a usable `character` or `freq` is
//! read as an absent subtree.
//!
//! Nesting follows trie depth, which follows word length. Conversions walk
//! with an explicit stack and the JSON pass runs through `serde_stacker`,
//! which moves to a fresh stack segment before the thread's own runs out.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::node::{Link, Node};
use crate::tst::Trie;
use crate::walk;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    #[serde(default)]
    pub freq: Option<u64>,
    #[serde(default)]
    pub left: Option<Box<NodeRecord>>,
    #[serde(default)]
    pub middle: Option<Box<NodeRecord>>,
    #[serde(default)]
    pub right: Option<Box<NodeRecord>>,
}

impl NodeRecord {
    fn children(&self) -> [Option<&NodeRecord>; 3] {
        [
            self.left.as_deref(),
            self.middle.as_deref(),
            self.right.as_deref(),
        ]
    }

    fn take_children(&mut self, into: &mut Vec<Box<NodeRecord>>) {
        into.extend(self.left.take());
        into.extend(self.middle.take());
        into.extend(self.right.take());
    }

    fn from_node(node: &Node, [left, middle, right]: [Option<Box<NodeRecord>>; 3]) -> Self {
        NodeRecord {
            character: Some(node.character.to_string()),
            freq: Some(node.freq),
            left,
            middle,
            right,
        }
    }

    fn to_node(&self, [low, mid, high]: [Link; 3]) -> Link {
        let character = match self.character.as_deref().and_then(single_char) {
            Some(c) => c,
            None => {
                warn!("dropping trie record with character {:?}", self.character);
                return None;
            }
        };
        let freq = match self.freq {
            Some(freq) => freq,
            None => {
                warn!("dropping trie record {:?} without freq", character);
                return None;
            }
        };
        Some(Box::new(Node {
            character,
            freq,
            low,
            mid,
            high,
        }))
    }
}

impl Drop for NodeRecord {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_children(&mut stack);
        while let Some(mut record) = stack.pop() {
            record.take_children(&mut stack);
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

impl Trie {
    /// Pre-order snapshot of the whole trie; `None` when empty.
    pub fn to_record(&self) -> Option<NodeRecord> {
        let root = self.root.as_deref()?;
        walk::fold(root, Node::children, |node, children| {
            Some(Box::new(NodeRecord::from_node(node, children)))
        })
        .map(|record| *record)
    }

    pub fn from_record(record: Option<&NodeRecord>) -> Trie {
        let root = record.and_then(|record| {
            walk::fold(record, NodeRecord::children, |record, children| {
                record.to_node(children)
            })
        });
        Trie { root }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let record = self.to_record();
        let mut ser = serde_json::Serializer::new(Vec::new());
        record.serialize(serde_stacker::Serializer::new(&mut ser))?;
        String::from_utf8(ser.into_inner()).map_err(serde::ser::Error::custom)
    }

    /// Parses a snapshot produced by [`Trie::to_json`]. Nesting grows with
    /// word length, so serde_json's depth limit is lifted.
    pub fn from_json(json: &str) -> serde_json::Result<Trie> {
        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let record = Option::<NodeRecord>::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(Trie::from_record(record.as_ref()))
    }
}
