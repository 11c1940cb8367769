//! The suggestion service: a frequency-ranked prefix index over committed
//! search terms, persisted as a single JSON blob after every change.

use crate::generation::{Generation, Token};
use crate::storage::Storage;
use crate::{Result, SuggestErr};

use log::{debug, error, info, warn};
use trie::{Candidate, Trie};

pub const DEFAULT_TOP_K: usize = 5;
pub const TRIE_KEY: &str = "suggestionTrie";

struct Memo {
    prefix: String,
    limit: usize,
    token: Token,
    result: Vec<Candidate>,
}

pub struct SuggestionService {
    trie: Trie,
    storage: Box<dyn Storage>,
    key: String,
    top_k: usize,
    generation: Generation,
    memo: Option<Memo>,
}

impl std::fmt::Debug for SuggestionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionService")
            .field("key", &self.key)
            .field("top_k", &self.top_k)
            .field("words", &self.trie.len())
            .field("generation", &self.generation.current())
            .finish()
    }
}

impl SuggestionService {
    /// Rehydrates the trie stored under `key`.
    ///
    /// Never fails: an unreadable or malformed blob starts an empty trie, and
    /// a missing one is created so the next start finds it.
    pub fn open(storage: Box<dyn Storage>, key: impl Into<String>, top_k: usize) -> Self {
        let key = key.into();
        let mut service = SuggestionService {
            trie: Trie::new(),
            storage,
            key,
            top_k,
            generation: Generation::new(),
            memo: None,
        };
        match service.storage.get(&service.key) {
            Ok(Some(blob)) => match Trie::from_json(&blob) {
                Ok(trie) => {
                    info!(
                        "loaded {} words from snapshot {:?}",
                        trie.len(),
                        service.key
                    );
                    service.trie = trie;
                }
                Err(e) => warn!("snapshot {:?} is malformed, cold start: {}", service.key, e),
            },
            Ok(None) => {
                info!("no snapshot {:?}, cold start", service.key);
                if let Err(e) = service.persist() {
                    error!("failed to write initial snapshot {:?}: {}", service.key, e);
                }
            }
            Err(e) => warn!("failed to read snapshot {:?}, cold start: {}", service.key, e),
        }
        service
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn generation(&self) -> Token {
        self.generation.current()
    }

    /// Up to `top_k` suggestions for `prefix`, best first.
    pub fn suggest(&mut self, prefix: &str) -> Vec<Candidate> {
        self.suggest_with_limit(prefix, self.top_k)
    }

    pub fn suggest_with_limit(&mut self, prefix: &str, limit: usize) -> Vec<Candidate> {
        let prefix = prefix.trim();
        if let Some(memo) = &self.memo {
            if self.generation.is_current(memo.token)
                && memo.limit == limit
                && memo.prefix == prefix
            {
                return memo.result.clone();
            }
        }
        let result = self.trie.collect_sorted(prefix, limit);
        debug!(
            "suggest {:?} limit {} -> {} candidates",
            prefix,
            limit,
            result.len()
        );
        self.memo = Some(Memo {
            prefix: prefix.to_string(),
            limit,
            token: self.generation.current(),
            result: result.clone(),
        });
        result
    }

    /// Records a committed search and persists the trie.
    ///
    /// Returns the term's new frequency, or `None` for a blank term.
    pub fn commit(&mut self, text: &str) -> Result<Option<u64>> {
        let term = text.trim();
        if term.is_empty() {
            debug!("ignore blank commit");
            return Ok(None);
        }
        self.trie.insert_word(term);
        self.generation.advance();
        let freq = self.trie.frequency(term);
        debug!("commit {:?} -> {}", term, freq);
        self.persist()?;
        Ok(Some(freq))
    }

    pub fn frequency(&self, word: &str) -> u64 {
        self.trie.frequency(word.trim())
    }

    pub fn dump(&self) -> Result<String> {
        Ok(self.trie.to_json()?)
    }

    /// Replaces the trie with `json` and persists it. Unlike startup, a
    /// malformed snapshot is rejected and the current trie is kept.
    pub fn restore(&mut self, json: &str) -> Result<()> {
        let trie = Trie::from_json(json).map_err(|e| SuggestErr::InvalidSnapshot(e.to_string()))?;
        info!("restored {} words", trie.len());
        self.trie = trie;
        self.generation.advance();
        self.persist()
    }

    pub fn save(&mut self) -> Result<()> {
        self.persist()
    }

    pub fn flush(&mut self) -> Result<()> {
        info!("flush {} words", self.trie.len());
        self.trie.clear();
        self.generation.advance();
        self.persist()
    }

    fn persist(&mut self) -> Result<()> {
        let blob = self.trie.to_json()?;
        if let Err(e) = self.storage.set(&self.key, &blob) {
            error!("failed to persist snapshot {:?}: {}", self.key, e);
            return Err(e);
        }
        Ok(())
    }
}
