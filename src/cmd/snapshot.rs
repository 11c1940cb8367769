//! Snapshot commands: DUMP, RESTORE, SAVE

use super::{check_cmd, error_reply, next_string};
use crate::frame::Frame;
use crate::service::SuggestionService;
use crate::{Result, SuggestErr};

#[derive(Debug, PartialEq)]
pub struct Dump {}

impl Dump {
    pub fn new() -> Self {
        Self {}
    }

    pub fn from_frames(frames: Vec<Frame>) -> Result<Self> {
        if frames.len() != 1 {
            return Err(SuggestErr::WrongNumberOfArguments);
        }
        check_cmd(&mut frames.into_iter(), b"DUMP")?;
        Ok(Self::new())
    }

    pub fn apply(self, service: &mut SuggestionService) -> Frame {
        match service.dump() {
            Ok(json) => Frame::bulk(json),
            Err(e) => error_reply(e),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Restore {
    json: String,
}

impl Restore {
    pub fn new(json: String) -> Self {
        Self { json }
    }

    pub fn from_frames(frames: Vec<Frame>) -> Result<Self> {
        if frames.len() != 2 {
            return Err(SuggestErr::WrongNumberOfArguments);
        }
        let mut iter = frames.into_iter();
        check_cmd(&mut iter, b"RESTORE")?;
        let json = next_string(&mut iter)?;
        Ok(Self::new(json))
    }

    pub fn apply(self, service: &mut SuggestionService) -> Frame {
        match service.restore(&self.json) {
            Ok(()) => Frame::ok(),
            Err(e) => error_reply(e),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Save {}

impl Save {
    pub fn new() -> Self {
        Self {}
    }

    pub fn from_frames(frames: Vec<Frame>) -> Result<Self> {
        if frames.len() != 1 {
            return Err(SuggestErr::WrongNumberOfArguments);
        }
        check_cmd(&mut frames.into_iter(), b"SAVE")?;
        Ok(Self::new())
    }

    pub fn apply(self, service: &mut SuggestionService) -> Frame {
        match service.save() {
            Ok(()) => Frame::ok(),
            Err(e) => error_reply(e),
        }
    }
}
