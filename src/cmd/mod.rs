//! Command definitions for the suggestion server.
//!
//! Each command knows how to build itself from the frames of a request
//! (`from_frames`) and how to run against the service (`apply`).

mod meta;
pub use meta::*;

mod snapshot;
pub use snapshot::*;

mod suggest;
pub use suggest::*;

use crate::frame::Frame;
use crate::service::SuggestionService;
use crate::{Result, SuggestErr};

use marco::to_upper_case_str;

use log::trace;
use std::collections::HashMap;

type CommandParseFn = Box<dyn Fn(Vec<Frame>) -> Result<Command> + Send + Sync>;

pub struct Parser {
    commands: HashMap<&'static str, CommandParseFn>,
}

macro_rules! add_cmd {
    ($map:ident, $($cmd:ident),*) => {
        $(
            $map.insert(to_upper_case_str!($cmd), Box::new(|frames: Vec<Frame>| -> Result<Command> {
                Ok(Command::$cmd($cmd::from_frames(frames)?))
            }) as CommandParseFn);
        )*
    };
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        let mut commands: HashMap<&'static str, CommandParseFn> = HashMap::new();
        add_cmd!(
            commands, Suggest, Commit, Freq, Dump, Restore, Save, Ping, Flush, Gen, Quit
        );
        Self { commands }
    }

    pub fn parse(&self, frame: Frame) -> Result<Command> {
        trace!("parse: {:?}", frame);
        match frame {
            Frame::Array(frames) => {
                let name = frames
                    .first()
                    .ok_or(SuggestErr::InvalidProtocol)
                    .and_then(frame_to_string)?
                    .to_ascii_uppercase();
                let parse = self
                    .commands
                    .get(name.as_str())
                    .ok_or(SuggestErr::UnknownCommand)?;
                parse(frames)
            }
            _ => Err(SuggestErr::InvalidProtocol),
        }
    }
}

macro_rules! def_command_enum {
    ($($cmd:ident),*) => {
        #[derive(Debug, PartialEq)]
        pub enum Command {
            $($cmd($cmd),)*
        }

        impl Command {
            pub fn apply(self, service: &mut SuggestionService) -> Frame {
                trace!("apply command: {:?}", self);
                match self {
                    $(Command::$cmd(cmd) => cmd.apply(service),)*
                }
            }
        }
    }
}

def_command_enum! {
    Suggest, Commit, Freq,
    Dump, Restore, Save,
    Ping, Flush, Gen, Quit
}

impl Command {
    /// Whether the connection closes once the reply is written.
    pub fn closes_connection(&self) -> bool {
        matches!(self, Command::Quit(_))
    }
}

fn frame_to_string(frame: &Frame) -> Result<String> {
    match frame {
        Frame::SimpleString(s) => Ok(s.clone()),
        Frame::BulkString(bytes) => Ok(String::from_utf8(bytes.clone())?),
        _ => Err(SuggestErr::InvalidProtocol),
    }
}

fn error_reply(e: SuggestErr) -> Frame {
    Frame::Error(e.to_string())
}

// RESP integers are signed, counters saturate at i64::MAX
fn integer_reply(value: u64) -> Frame {
    Frame::Integer(value.min(i64::MAX as u64) as i64)
}

#[inline]
fn next_string(frame: &mut std::vec::IntoIter<Frame>) -> Result<String> {
    match frame.next() {
        Some(Frame::SimpleString(s)) => Ok(s),
        Some(Frame::BulkString(bytes)) => Ok(String::from_utf8(bytes)?),
        Some(Frame::Integer(i)) => Ok(i.to_string()),
        None => Err(SuggestErr::WrongNumberOfArguments),
        _ => Err(SuggestErr::InvalidProtocol),
    }
}

#[inline]
fn next_integer(frame: &mut std::vec::IntoIter<Frame>) -> Result<i64> {
    match frame.next() {
        Some(Frame::Integer(i)) => Ok(i),
        Some(Frame::SimpleString(s)) => Ok(s.parse::<i64>()?),
        Some(Frame::BulkString(bytes)) => Ok(String::from_utf8(bytes)?.parse::<i64>()?),
        None => Err(SuggestErr::WrongNumberOfArguments),
        _ => Err(SuggestErr::InvalidProtocol),
    }
}

#[inline]
fn check_cmd(frame: &mut std::vec::IntoIter<Frame>, cmd: &[u8]) -> Result<()> {
    match frame.next() {
        Some(Frame::SimpleString(ref s)) if s.to_ascii_uppercase().as_bytes() == cmd => Ok(()),
        Some(Frame::BulkString(ref s)) if s.to_ascii_uppercase() == cmd => Ok(()),
        None => Err(SuggestErr::WrongNumberOfArguments),
        _ => Err(SuggestErr::InvalidProtocol),
    }
}

#[cfg(test)]
fn request(args: &[&str]) -> Frame {
    Frame::Array(args.iter().map(|arg| Frame::bulk(*arg)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_names() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse(request(&["suggest", "he"])),
            Ok(Command::Suggest(_))
        ));
        assert!(matches!(
            parser.parse(request(&["CoMmIt", "x"])),
            Ok(Command::Commit(_))
        ));
        assert!(matches!(
            parser.parse(Frame::Array(vec![Frame::SimpleString("GEN".to_string())])),
            Ok(Command::Gen(_))
        ));
        assert!(parser.parse(request(&["QUIT"])).unwrap().closes_connection());
        assert!(!parser.parse(request(&["PING"])).unwrap().closes_connection());
    }

    #[test]
    fn test_parse_errors() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse(request(&["GET", "k"])),
            Err(SuggestErr::UnknownCommand)
        ));
        assert!(matches!(
            parser.parse(Frame::Array(vec![])),
            Err(SuggestErr::InvalidProtocol)
        ));
        assert!(matches!(
            parser.parse(Frame::bulk("SUGGEST")),
            Err(SuggestErr::InvalidProtocol)
        ));
        assert!(matches!(
            parser.parse(Frame::Array(vec![Frame::Integer(1)])),
            Err(SuggestErr::InvalidProtocol)
        ));
    }

    #[test]
    fn test_next_integer() {
        let mut iter = vec![
            Frame::Integer(3),
            Frame::bulk("4"),
            Frame::SimpleString("5".to_string()),
            Frame::bulk("x"),
        ]
        .into_iter();
        assert_eq!(next_integer(&mut iter).unwrap(), 3);
        assert_eq!(next_integer(&mut iter).unwrap(), 4);
        assert_eq!(next_integer(&mut iter).unwrap(), 5);
        assert!(matches!(next_integer(&mut iter), Err(SuggestErr::SyntaxError)));
        assert!(matches!(
            next_integer(&mut iter),
            Err(SuggestErr::WrongNumberOfArguments)
        ));
    }

    #[test]
    fn test_integer_reply_saturates() {
        assert_eq!(integer_reply(7), Frame::Integer(7));
        assert_eq!(integer_reply(i64::MAX as u64), Frame::Integer(i64::MAX));
        assert_eq!(integer_reply(u64::MAX), Frame::Integer(i64::MAX));
    }
}
