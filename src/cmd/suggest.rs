//! Read and write path commands: SUGGEST, COMMIT, FREQ

use super::{check_cmd, error_reply, integer_reply, next_integer, next_string};
use crate::frame::Frame;
use crate::service::SuggestionService;
use crate::{Result, SuggestErr};

#[derive(Debug, PartialEq)]
pub struct Suggest {
    prefix: String,
    limit: Option<usize>,
}

impl Suggest {
    pub fn new(prefix: String, limit: Option<usize>) -> Self {
        Self { prefix, limit }
    }

    // SUGGEST prefix [limit]
    pub fn from_frames(frames: Vec<Frame>) -> Result<Self> {
        if frames.len() != 2 && frames.len() != 3 {
            return Err(SuggestErr::WrongNumberOfArguments);
        }
        let mut iter = frames.into_iter();
        check_cmd(&mut iter, b"SUGGEST")?;
        let prefix = next_string(&mut iter)?;
        let limit = match iter.len() {
            0 => None,
            _ => {
                let limit = next_integer(&mut iter)?;
                Some(usize::try_from(limit).map_err(|_| SuggestErr::SyntaxError)?)
            }
        };
        Ok(Self::new(prefix, limit))
    }

    /// `[word, freq]` pairs, most frequent first.
    pub fn apply(self, service: &mut SuggestionService) -> Frame {
        let candidates = match self.limit {
            Some(limit) => service.suggest_with_limit(&self.prefix, limit),
            None => service.suggest(&self.prefix),
        };
        Frame::Array(
            candidates
                .into_iter()
                .map(|c| {
                    Frame::Array(vec![
                        Frame::bulk(c.word),
                        integer_reply(c.freq),
                    ])
                })
                .collect(),
        )
    }
}

#[derive(Debug, PartialEq)]
pub struct Commit {
    term: String,
}

impl Commit {
    pub fn new(term: String) -> Self {
        Self { term }
    }

    // COMMIT term [term ...], the pieces are one search joined by spaces
    pub fn from_frames(frames: Vec<Frame>) -> Result<Self> {
        if frames.len() < 2 {
            return Err(SuggestErr::WrongNumberOfArguments);
        }
        let mut iter = frames.into_iter();
        check_cmd(&mut iter, b"COMMIT")?;
        let mut words = Vec::with_capacity(iter.len());
        while iter.len() > 0 {
            words.push(next_string(&mut iter)?);
        }
        Ok(Self::new(words.join(" ")))
    }

    pub fn apply(self, service: &mut SuggestionService) -> Frame {
        match service.commit(&self.term) {
            Ok(Some(freq)) => integer_reply(freq),
            Ok(None) => Frame::Nil,
            Err(e) => error_reply(e),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Freq {
    word: String,
}

impl Freq {
    pub fn new(word: String) -> Self {
        Self { word }
    }

    pub fn from_frames(frames: Vec<Frame>) -> Result<Self> {
        if frames.len() != 2 {
            return Err(SuggestErr::WrongNumberOfArguments);
        }
        let mut iter = frames.into_iter();
        check_cmd(&mut iter, b"FREQ")?;
        let word = next_string(&mut iter)?;
        Ok(Self::new(word))
    }

    pub fn apply(self, service: &mut SuggestionService) -> Frame {
        integer_reply(service.frequency(&self.word))
    }
}
