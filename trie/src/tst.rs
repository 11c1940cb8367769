use std::cmp::Ordering;

use log::trace;

use crate::node::{Candidate, Link, Node};
use crate::top_k::TopK;
use crate::walk;

/// Ternary search trie counting how often each word was inserted.
#[derive(Debug, Default)]
pub struct Trie {
    pub(crate) root: Link,
}

impl Clone for Trie {
    fn clone(&self) -> Self {
        let root = self.root.as_deref().and_then(|root| {
            walk::fold(root, Node::children, |node, [low, mid, high]| {
                Some(Box::new(Node {
                    character: node.character,
                    freq: node.freq,
                    low,
                    mid,
                    high,
                }))
            })
        });
        Trie { root }
    }
}

impl PartialEq for Trie {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self.root.as_deref(), other.root.as_deref())];
        while let Some(pair) = stack.pop() {
            match pair {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    if a.character != b.character || a.freq != b.freq {
                        return false;
                    }
                    stack.push((a.low(), b.low()));
                    stack.push((a.mid(), b.mid()));
                    stack.push((a.high(), b.high()));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Trie {}

impl Trie {
    pub fn new() -> Self {
        Trie { root: None }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.root = None;
    }

    /// Records one more occurrence of `word`. Empty words are ignored.
    pub fn insert_word(&mut self, word: &str) {
        let chars: Vec<char> = word.chars().collect();
        if chars.is_empty() {
            return;
        }

        let mut link = &mut self.root;
        let mut idx = 0;
        loop {
            let c = chars[idx];
            let node = link.get_or_insert_with(|| Box::new(Node::new(c)));
            match c.cmp(&node.character) {
                Ordering::Less => link = &mut node.low,
                Ordering::Greater => link = &mut node.high,
                Ordering::Equal if idx + 1 < chars.len() => {
                    idx += 1;
                    link = &mut node.mid;
                }
                Ordering::Equal => {
                    node.freq += 1;
                    trace!("insert word {:?}, freq {}", word, node.freq);
                    return;
                }
            }
        }
    }

    /// Node holding the last character of `prefix`, if the prefix exists.
    pub fn get_start_node(&self, prefix: &str) -> Option<&Node> {
        let mut chars = prefix.chars().peekable();
        let mut c = *chars.peek()?;
        let mut node = self.root.as_deref()?;
        loop {
            match c.cmp(&node.character) {
                Ordering::Less => node = node.low.as_deref()?,
                Ordering::Greater => node = node.high.as_deref()?,
                Ordering::Equal => {
                    chars.next();
                    c = match chars.peek() {
                        Some(next) => *next,
                        None => return Some(node),
                    };
                    node = node.mid.as_deref()?;
                }
            }
        }
    }

    /// How many times `word` was inserted.
    pub fn frequency(&self, word: &str) -> u64 {
        self.get_start_node(word).map_or(0, Node::freq)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&Node> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            if node.is_terminal() {
                count += 1;
            }
            stack.extend(node.low.as_deref());
            stack.extend(node.mid.as_deref());
            stack.extend(node.high.as_deref());
        }
        count
    }

    /// Up to `limit` of the most frequent words starting with `prefix`, in
    /// no particular order. The empty prefix matches nothing.
    pub fn collect(&self, prefix: &str, limit: usize) -> Vec<Candidate> {
        self.select(prefix, limit).into_top_results()
    }

    /// Like [`Trie::collect`], ranked most frequent first.
    pub fn collect_sorted(&self, prefix: &str, limit: usize) -> Vec<Candidate> {
        self.select(prefix, limit).into_sorted_vec()
    }

    fn select(&self, prefix: &str, limit: usize) -> TopK {
        let mut top = TopK::new(limit);
        if prefix.is_empty() {
            return top;
        }
        let start = match self.get_start_node(prefix) {
            Some(node) => node,
            None => return top,
        };
        if start.is_terminal() {
            top.insert(Candidate::new(prefix, start.freq));
        }

        // one shared path buffer; each entry remembers how much of it
        // spells the word above the node
        let mut path = prefix.to_string();
        let mut stack: Vec<(&Node, usize)> = Vec::new();
        if let Some(mid) = start.mid.as_deref() {
            stack.push((mid, path.len()));
        }
        while let Some((node, len)) = stack.pop() {
            path.truncate(len);
            path.push(node.character);
            if node.is_terminal() {
                top.insert(Candidate::new(path.clone(), node.freq));
            }
            stack.extend(node.low.as_deref().map(|low| (low, len)));
            stack.extend(node.high.as_deref().map(|high| (high, len)));
            stack.extend(node.mid.as_deref().map(|mid| (mid, path.len())));
        }
        trace!("collect {:?}: {} candidates kept", prefix, top.len());
        top
    }
}
