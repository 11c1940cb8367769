//! Meta commands

use super::{check_cmd, error_reply, integer_reply, next_string};
use crate::frame::Frame;
use crate::service::SuggestionService;
use crate::{Result, SuggestErr};

#[derive(Debug, PartialEq)]
pub struct Ping {
    message: Option<String>,
}

impl Ping {
    pub fn new(message: Option<String>) -> Self {
        Self { message }
    }

    pub fn from_frames(frames: Vec<Frame>) -> Result<Self> {
        if frames.len() > 2 {
            return Err(SuggestErr::WrongNumberOfArguments);
        }
        let mut iter = frames.into_iter();
        check_cmd(&mut iter, b"PING")?;
        let message = match iter.len() {
            0 => None,
            _ => Some(next_string(&mut iter)?),
        };
        Ok(Self::new(message))
    }

    pub fn apply(self, _service: &mut SuggestionService) -> Frame {
        match self.message {
            Some(message) => Frame::bulk(message),
            None => Frame::SimpleString("PONG".to_string()),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Flush {}

impl Flush {
    pub fn new() -> Self {
        Self {}
    }

    pub fn from_frames(frames: Vec<Frame>) -> Result<Self> {
        if frames.len() != 1 {
            return Err(SuggestErr::WrongNumberOfArguments);
        }
        check_cmd(&mut frames.into_iter(), b"FLUSH")?;
        Ok(Self::new())
    }

    pub fn apply(self, service: &mut SuggestionService) -> Frame {
        match service.flush() {
            Ok(()) => Frame::ok(),
            Err(e) => error_reply(e),
        }
    }
}

/// Reports the current generation token. A client holding an older token
/// knows its cached suggestions are stale.
#[derive(Debug, PartialEq)]
pub struct Gen {}

impl Gen {
    pub fn new() -> Self {
        Self {}
    }

    pub fn from_frames(frames: Vec<Frame>) -> Result<Self> {
        if frames.len() != 1 {
            return Err(SuggestErr::WrongNumberOfArguments);
        }
        check_cmd(&mut frames.into_iter(), b"GEN")?;
        Ok(Self::new())
    }

    pub fn apply(self, service: &mut SuggestionService) -> Frame {
        integer_reply(service.generation().value())
    }
}

#[derive(Debug, PartialEq)]
pub struct Quit {}

impl Quit {
    pub fn new() -> Quit {
        Quit {}
    }

    pub fn from_frames(frames: Vec<Frame>) -> Result<Quit> {
        let mut iter = frames.into_iter();
        check_cmd(&mut iter, b"QUIT")?;

        Ok(Quit::new())
    }

    pub fn apply(self, _service: &mut SuggestionService) -> Frame {
        Frame::ok()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::service::{DEFAULT_TOP_K, TRIE_KEY};
    use crate::storage::MemoryStorage;

    fn service() -> SuggestionService {
        SuggestionService::open(Box::new(MemoryStorage::new()), TRIE_KEY, DEFAULT_TOP_K)
    }

    #[test]
    fn test_ping() {
        let mut service = service();
        let cmd = Ping::from_frames(vec![Frame::bulk("ping")]).unwrap();
        assert_eq!(cmd.apply(&mut service), Frame::SimpleString("PONG".to_string()));

        let cmd = Ping::from_frames(vec![Frame::bulk("PING"), Frame::bulk("hi")]).unwrap();
        assert_eq!(cmd.apply(&mut service), Frame::bulk("hi"));

        assert!(matches!(
            Ping::from_frames(vec![Frame::bulk("PING"), Frame::bulk("a"), Frame::bulk("b")]),
            Err(SuggestErr::WrongNumberOfArguments)
        ));
    }

    #[test]
    fn test_flush_and_gen() {
        let mut service = service();
        service.commit("disk full").unwrap();

        let gen = Gen::from_frames(vec![Frame::bulk("GEN")]).unwrap();
        assert_eq!(gen.apply(&mut service), Frame::Integer(1));

        let cmd = Flush::from_frames(vec![Frame::bulk("flush")]);
        assert_eq!(cmd.is_ok(), true);
        let cmd: Flush = cmd.unwrap();
        assert_eq!(cmd.apply(&mut service), Frame::ok());
        assert_eq!(service.frequency("disk full"), 0);

        assert_eq!(Gen::new().apply(&mut service), Frame::Integer(2));
    }

    #[test]
    fn test_quit() {
        let mut service = service();
        let cmd = Quit::from_frames(vec![Frame::bulk("QUIT")]).unwrap();
        assert_eq!(cmd.apply(&mut service), Frame::ok());
    }
}
