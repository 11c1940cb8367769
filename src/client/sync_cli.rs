//! A blocking client for the suggestion server.
//!
//! Every call writes one request and waits for its reply, so the I/O blocks
//! the current thread.

use std::net::{TcpStream, ToSocketAddrs};

use crate::connection::SyncConnection;
use crate::frame::Frame;
use crate::{Candidate, Result, SuggestErr};

pub struct BlockClient {
    conn: SyncConnection,
}

impl BlockClient {
    fn new(conn: SyncConnection) -> Self {
        Self { conn }
    }

    pub fn open(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        let conn = SyncConnection::new(1, Box::new(stream));
        Ok(Self::new(conn))
    }

    pub fn ping(&mut self, message: Option<&str>) -> Result<String> {
        let args: Vec<&str> = message.into_iter().collect();
        match self.call("PING", &args)? {
            Frame::SimpleString(s) => Ok(s),
            Frame::BulkString(bytes) => Ok(String::from_utf8(bytes)?),
            other => Err(unexpected(other)),
        }
    }

    pub fn suggest(&mut self, prefix: &str) -> Result<Vec<Candidate>> {
        let resp = self.call("SUGGEST", &[prefix])?;
        parse_candidates(resp)
    }

    pub fn suggest_with_limit(&mut self, prefix: &str, limit: usize) -> Result<Vec<Candidate>> {
        let limit = limit.to_string();
        let resp = self.call("SUGGEST", &[prefix, limit.as_str()])?;
        parse_candidates(resp)
    }

    /// The term's new frequency, `None` if the server ignored a blank term.
    pub fn commit(&mut self, term: &str) -> Result<Option<u64>> {
        match self.call("COMMIT", &[term])? {
            Frame::Integer(freq) => Ok(Some(to_u64(freq)?)),
            Frame::Nil => Ok(None),
            other => Err(unexpected(other)),
        }
    }

    pub fn freq(&mut self, word: &str) -> Result<u64> {
        match self.call("FREQ", &[word])? {
            Frame::Integer(freq) => to_u64(freq),
            other => Err(unexpected(other)),
        }
    }

    pub fn dump(&mut self) -> Result<String> {
        match self.call("DUMP", &[])? {
            Frame::BulkString(bytes) => Ok(String::from_utf8(bytes)?),
            other => Err(unexpected(other)),
        }
    }

    pub fn restore(&mut self, json: &str) -> Result<()> {
        let resp = self.call("RESTORE", &[json])?;
        expect_ok(resp)
    }

    pub fn save(&mut self) -> Result<()> {
        let resp = self.call("SAVE", &[])?;
        expect_ok(resp)
    }

    pub fn flush(&mut self) -> Result<()> {
        let resp = self.call("FLUSH", &[])?;
        expect_ok(resp)
    }

    /// The server's generation token. It changes whenever the stored terms
    /// do, so a caller can tell whether suggestions it cached are stale.
    pub fn generation(&mut self) -> Result<u64> {
        match self.call("GEN", &[])? {
            Frame::Integer(token) => to_u64(token),
            other => Err(unexpected(other)),
        }
    }

    pub fn quit(mut self) -> Result<()> {
        let resp = self.call("QUIT", &[])?;
        expect_ok(resp)
    }

    fn call(&mut self, cmd: &str, args: &[&str]) -> Result<Frame> {
        self.conn.write_frame(build_cmd_frame(cmd, args))?;
        self.conn.read_frame()
    }
}

fn build_cmd_frame(cmd: &str, args: &[&str]) -> Frame {
    let mut frame = vec![];
    frame.push(Frame::BulkString(cmd.as_bytes().to_vec()));
    for arg in args {
        frame.push(Frame::BulkString(arg.as_bytes().to_vec()));
    }
    Frame::Array(frame)
}

fn parse_candidates(resp: Frame) -> Result<Vec<Candidate>> {
    let items = match resp {
        Frame::Array(items) => items,
        other => return Err(unexpected(other)),
    };
    items
        .into_iter()
        .map(|item| match item {
            Frame::Array(pair) => match <[Frame; 2]>::try_from(pair) {
                Ok([Frame::BulkString(word), Frame::Integer(freq)]) => {
                    Ok(Candidate::new(String::from_utf8(word)?, to_u64(freq)?))
                }
                Ok(pair) => Err(unexpected(Frame::Array(pair.into()))),
                Err(pair) => Err(unexpected(Frame::Array(pair))),
            },
            other => Err(unexpected(other)),
        })
        .collect()
}

fn expect_ok(resp: Frame) -> Result<()> {
    match resp {
        Frame::SimpleString(s) if s == "OK" => Ok(()),
        other => Err(unexpected(other)),
    }
}

fn to_u64(value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| SuggestErr::UnexpectedResponse(value.to_string()))
}

// error replies keep the server's message
fn unexpected(frame: Frame) -> SuggestErr {
    match frame {
        Frame::Error(msg) => SuggestErr::UnexpectedResponse(msg),
        other => SuggestErr::UnexpectedResponse(other.to_string()),
    }
}
