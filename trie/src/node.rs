use std::cmp::Ordering;
use std::fmt::{Debug, Display};

pub(crate) type Link = Option<Box<Node>>;

/// One position of the ternary search trie.
///
/// `low` and `high` hold siblings at the same depth whose character sorts
/// before or after this one, `mid` continues with the next character.
///
/// Dropping a node tears its subtree down with an explicit stack, so a very
/// long word cannot overflow the call stack.
pub struct Node {
    pub(crate) character: char,
    // > 0 iff a word terminates exactly here
    pub(crate) freq: u64,
    pub(crate) low: Link,
    pub(crate) mid: Link,
    pub(crate) high: Link,
}

impl Node {
    pub(crate) fn new(character: char) -> Self {
        Node {
            character,
            freq: 0,
            low: None,
            mid: None,
            high: None,
        }
    }

    pub fn character(&self) -> char {
        self.character
    }

    pub fn freq(&self) -> u64 {
        self.freq
    }

    pub fn is_terminal(&self) -> bool {
        self.freq > 0
    }

    pub fn low(&self) -> Option<&Node> {
        self.low.as_deref()
    }

    pub fn mid(&self) -> Option<&Node> {
        self.mid.as_deref()
    }

    pub fn high(&self) -> Option<&Node> {
        self.high.as_deref()
    }

    pub(crate) fn children(&self) -> [Option<&Node>; 3] {
        [self.low(), self.mid(), self.high()]
    }

    fn take_children(&mut self, into: &mut Vec<Box<Node>>) {
        into.extend(self.low.take());
        into.extend(self.mid.take());
        into.extend(self.high.take());
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_children(&mut stack);
        while let Some(mut node) = stack.pop() {
            node.take_children(&mut stack);
        }
    }
}

// only this node, printing the subtree would recurse
impl Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("character", &self.character)
            .field("freq", &self.freq)
            .field("low", &self.low.is_some())
            .field("mid", &self.mid.is_some())
            .field("high", &self.high.is_some())
            .finish()
    }
}

/// A word and how many times it was inserted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Candidate {
    pub word: String,
    pub freq: u64,
}

impl Candidate {
    pub fn new(word: impl Into<String>, freq: u64) -> Self {
        Candidate {
            word: word.into(),
            freq,
        }
    }
}

// Greater means "ranks higher": more frequent first, then the
// lexicographically smaller word.
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.freq.cmp(&other.freq) {
            Ordering::Equal => other.word.cmp(&self.word),
            order => order,
        }
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.word, self.freq)
    }
}
