//! this module is used to parse the RESP protocol
//! RESP is defined as a protocol in the Redis documentation:
//! https://redis.io/docs/reference/protocol-spec/
//!
//! Besides the typed frames, inline commands (`SUGGEST err\r\n`) are
//! accepted so the server can be driven from telnet or netcat.

use crate::SuggestErr;

use std::fmt::Display;

type Bytes = Vec<u8>;

// RESP protocol definition
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Nil,                  // nil bulk string: `$-1\r\n`
    SimpleString(String), // non binary safe string,format: `+OK\r\n`
    Error(String),        // Error message returned by server,format: `-Error message\r\n`
    Integer(i64),         // Integers: format `:1000\r\n`
    BulkString(Bytes),    // Binary safe Strings `$6\r\nfoobar\r\n`
    Array(Vec<Frame>),    // array of RESP elements `*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n`
}

const CRLF: &[u8] = b"\r\n";

/// Largest frame a connection buffers before giving up on the peer.
pub const MAX_FRAME_SIZE: usize = 64 * 1024 * 1024;

// requests are flat and replies nest two deep
const MAX_ARRAY_DEPTH: usize = 4;

impl Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frame::Nil => write!(f, "$-1\\r\\n"),
            Frame::SimpleString(s) => write!(f, "+{}\\r\\n", s),
            Frame::Error(s) => write!(f, "-{}\\r\\n", s),
            Frame::Integer(i) => write!(f, ":{}\\r\\n", i),
            Frame::BulkString(b) => {
                write!(f, "${}\\r\\n{}\\r\\n", b.len(), String::from_utf8_lossy(b))
            }
            Frame::Array(a) => {
                write!(f, "*{}\\r\\n", a.len())?;
                for frame in a {
                    write!(f, "{}", frame)?;
                }
                Ok(())
            }
        }
    }
}

impl Frame {
    pub fn bulk(s: impl Into<String>) -> Frame {
        Frame::BulkString(s.into().into_bytes())
    }

    pub fn ok() -> Frame {
        Frame::SimpleString("OK".to_string())
    }

    #[allow(dead_code)]
    pub fn from_bytes(data: &[u8]) -> Result<Frame, SuggestErr> {
        Frame::parse(data).map(|(frame, _)| frame)
    }

    /// Parses the frame at the start of `data` and reports how many bytes
    /// it took, leaving anything after it for the next call.
    pub fn parse(data: &[u8]) -> Result<(Frame, usize), SuggestErr> {
        Frame::parse_nested(data, 0)
    }

    fn parse_nested(data: &[u8], depth: usize) -> Result<(Frame, usize), SuggestErr> {
        let first_byte = *data.first().ok_or(SuggestErr::FrameIncomplete)?;
        match first_byte {
            // SimpleString +OK\r\n
            b'+' => {
                let (line, used) = read_line(&data[1..])?;
                let s = String::from_utf8(line.to_vec())?;
                Ok((Frame::SimpleString(s), used + 1))
            }
            // Error -Error message\r\n
            b'-' => {
                let (line, used) = read_line(&data[1..])?;
                let s = String::from_utf8(line.to_vec())?;
                Ok((Frame::Error(s), used + 1))
            }
            // Number :1000\r\n
            b':' => {
                let (line, used) = read_line(&data[1..])?;
                Ok((Frame::Integer(parse_number(line)?), used + 1))
            }
            // BulkString, binary safe, $6\r\nfoobar\r\n
            b'$' => {
                let (line, used) = read_line(&data[1..])?;
                let len = parse_number(line)?;
                if len == -1 {
                    return Ok((Frame::Nil, used + 1));
                }
                let len = usize::try_from(len).map_err(|_| SuggestErr::FrameMalformed)?;
                if len > MAX_FRAME_SIZE {
                    return Err(SuggestErr::FrameTooLarge);
                }
                let start = used + 1;
                let end = start + len;
                if data.len() < end + CRLF.len() {
                    return Err(SuggestErr::FrameIncomplete);
                }
                if &data[end..end + CRLF.len()] != CRLF {
                    return Err(SuggestErr::FrameMalformed);
                }
                Ok((Frame::BulkString(data[start..end].to_vec()), end + CRLF.len()))
            }
            // Arrays *2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n
            b'*' => {
                let (line, used) = read_line(&data[1..])?;
                let num = parse_number(line)?;
                if num == -1 {
                    return Ok((Frame::Nil, used + 1));
                }
                let num = usize::try_from(num).map_err(|_| SuggestErr::FrameMalformed)?;
                if depth >= MAX_ARRAY_DEPTH {
                    return Err(SuggestErr::FrameMalformed);
                }
                let mut offset = used + 1;
                let mut result = Vec::with_capacity(num.min(64));
                for _ in 0..num {
                    let (frame, used) = Frame::parse_nested(&data[offset..], depth + 1)?;
                    offset += used;
                    result.push(frame);
                }
                Ok((Frame::Array(result), offset))
            }
            // inline command, such as `suggest err`
            // separated by whitespace, terminated by a newline
            b if b.is_ascii_alphanumeric() => {
                let newline = data
                    .iter()
                    .position(|b| *b == b'\n')
                    .ok_or(SuggestErr::FrameIncomplete)?;
                let line = String::from_utf8(data[..newline].to_vec())?;
                let items = line
                    .split_whitespace()
                    .map(|item| Frame::SimpleString(item.to_string()))
                    .collect();
                Ok((Frame::Array(items), newline + 1))
            }
            _ => Err(SuggestErr::FrameMalformed),
        }
    }

    // RESP protocol
    // server response is Simple Strings, the first byte of the reply is "+" followed by the string itself
    // `+OK\r\n`
    //
    pub fn serialize(self) -> Bytes {
        let mut result = Vec::<u8>::new();
        self.write_to(&mut result);
        result
    }

    fn write_to(self, out: &mut Bytes) {
        match self {
            Frame::Nil => out.extend_from_slice(b"$-1"),
            Frame::SimpleString(s) => {
                out.push(b'+');
                out.extend_from_slice(s.as_bytes());
            }
            Frame::Error(s) => {
                out.push(b'-');
                out.extend_from_slice(s.as_bytes());
            }
            Frame::Integer(i) => {
                out.push(b':');
                out.extend_from_slice(i.to_string().as_bytes());
            }
            Frame::BulkString(s) => {
                out.push(b'$');
                out.extend_from_slice(s.len().to_string().as_bytes());
                out.extend_from_slice(CRLF);
                out.extend_from_slice(&s);
            }
            Frame::Array(v) => {
                out.push(b'*');
                out.extend_from_slice(v.len().to_string().as_bytes());
                out.extend_from_slice(CRLF);
                for frame in v {
                    frame.write_to(out);
                }
                // elements already ended their own lines
                return;
            }
        }
        out.extend_from_slice(CRLF);
    }
}

// the line before the next CRLF, and the bytes used including the CRLF
fn read_line(data: &[u8]) -> Result<(&[u8], usize), SuggestErr> {
    let index = index_of(data, CRLF).ok_or(SuggestErr::FrameIncomplete)?;
    Ok((&data[..index], index + CRLF.len()))
}

fn parse_number(line: &[u8]) -> Result<i64, SuggestErr> {
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(SuggestErr::FrameMalformed)
}

#[inline]
fn index_of(data: &[u8], target: &[u8]) -> Option<usize> {
    data.windows(target.len()).position(|window| window == target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request() {
        let data = "$7\r\nSUGGEST\r\n".as_bytes();
        let frame = Frame::from_bytes(data).unwrap();
        assert_eq!(frame, Frame::bulk("SUGGEST"));

        let data = "+OK\r\n".as_bytes();
        assert_eq!(Frame::from_bytes(data).unwrap(), Frame::ok());

        let data = "-ERR unknown command\r\n".as_bytes();
        assert_eq!(
            Frame::from_bytes(data).unwrap(),
            Frame::Error("ERR unknown command".to_string())
        );

        let data = ":1000\r\n".as_bytes();
        assert_eq!(Frame::from_bytes(data).unwrap(), Frame::Integer(1000));

        let data = "$-1\r\n".as_bytes();
        assert_eq!(Frame::from_bytes(data).unwrap(), Frame::Nil);

        let data = "*2\r\n$7\r\nsuggest\r\n$3\r\nerr\r\n".as_bytes();
        assert_eq!(
            Frame::from_bytes(data).unwrap(),
            Frame::Array(vec![Frame::bulk("suggest"), Frame::bulk("err")])
        );

        // inline command
        let data = "COMMIT user alice\r\n".as_bytes();
        assert_eq!(
            Frame::from_bytes(data).unwrap(),
            Frame::Array(vec![
                Frame::SimpleString("COMMIT".to_string()),
                Frame::SimpleString("user".to_string()),
                Frame::SimpleString("alice".to_string()),
            ])
        );
    }

    #[test]
    fn test_bulk_string_is_binary_safe() {
        let data = "$9\r\nline\r\nend\r\n".as_bytes();
        assert_eq!(
            Frame::from_bytes(data).unwrap(),
            Frame::BulkString(b"line\r\nend".to_vec())
        );
    }

    #[test]
    fn test_incomplete_and_malformed() {
        for data in ["", "+OK", "$5\r\nhel", "*2\r\n$3\r\nfoo\r\n", "PING"] {
            assert!(
                matches!(Frame::from_bytes(data.as_bytes()), Err(SuggestErr::FrameIncomplete)),
                "{:?}",
                data
            );
        }
        for data in ["$3\r\nfoobar\r\n", ":abc\r\n", "$-5\r\n", "!oops\r\n"] {
            assert!(
                matches!(Frame::from_bytes(data.as_bytes()), Err(SuggestErr::FrameMalformed)),
                "{:?}",
                data
            );
        }
    }

    #[test]
    fn test_nesting_is_bounded() {
        let nested = "*1\r\n*1\r\n*1\r\n$2\r\nhi\r\n";
        assert!(Frame::from_bytes(nested.as_bytes()).is_ok());

        // a deep tower is refused up front, and without recursing into it
        let handle = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(|| Frame::parse("*1\r\n".repeat(200_000).as_bytes()).map(|_| ()))
            .unwrap();
        assert!(matches!(
            handle.join().unwrap(),
            Err(SuggestErr::FrameMalformed)
        ));
    }

    #[test]
    fn test_oversized_bulk_is_refused() {
        let data = format!("${}\r\nabc", MAX_FRAME_SIZE + 1);
        assert!(matches!(
            Frame::from_bytes(data.as_bytes()),
            Err(SuggestErr::FrameTooLarge)
        ));
    }

    #[test]
    fn test_pipelined_frames() {
        let data = "*1\r\n$4\r\nPING\r\nGEN\r\n".as_bytes();
        let (first, used) = Frame::parse(data).unwrap();
        assert_eq!(first, Frame::Array(vec![Frame::bulk("PING")]));
        let (second, rest) = Frame::parse(&data[used..]).unwrap();
        assert_eq!(second, Frame::Array(vec![Frame::SimpleString("GEN".to_string())]));
        assert_eq!(used + rest, data.len());
    }

    #[test]
    fn test_serialize() {
        let frame = Frame::Array(vec![
            Frame::Array(vec![Frame::bulk("hell"), Frame::Integer(3)]),
            Frame::Nil,
            Frame::ok(),
            Frame::Error("ERR syntax error".to_string()),
        ]);
        let bytes = frame.clone().serialize();
        assert_eq!(
            String::from_utf8(bytes.clone()).unwrap(),
            "*4\r\n*2\r\n$4\r\nhell\r\n:3\r\n$-1\r\n+OK\r\n-ERR syntax error\r\n"
        );
        assert_eq!(Frame::parse(&bytes).unwrap(), (frame, bytes.len()));
    }
}
