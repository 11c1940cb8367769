use super::SyncConnectionLike;

use crate::frame::{Frame, MAX_FRAME_SIZE};
use crate::{Result, SuggestErr};

use std::io::{Read, Write};

use bytes::{Buf, BytesMut};
use log::trace;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;

#[derive(Debug)]
pub struct AsyncConnection {
    stream: BufWriter<TcpStream>,
    read_buffer: BytesMut,
}

impl AsyncConnection {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream: BufWriter::new(stream),
            read_buffer: BytesMut::with_capacity(4096),
        }
    }

    fn parse_frame(&mut self) -> Result<Option<Frame>> {
        parse_buffered(&mut self.read_buffer, MAX_FRAME_SIZE)
    }

    pub async fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(frame) = self.parse_frame()? {
                return Ok(frame);
            }

            if self.stream.read_buf(&mut self.read_buffer).await? == 0 {
                return Err(SuggestErr::ConnectionAborted);
            }
        }
    }

    pub async fn write_frame(&mut self, frame: Frame) -> Result<()> {
        let data = frame.serialize();
        trace!("writing frame {}", String::from_utf8_lossy(&data));
        self.stream.write_all(&data).await?;

        // flush the stream so the client can see the response immediately
        self.stream.flush().await?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct SyncConnection {
    id: usize,
    stream: Box<dyn SyncConnectionLike>,
    read_buffer: BytesMut,
}

impl SyncConnection {
    pub fn new(id: usize, stream: Box<dyn SyncConnectionLike>) -> Self {
        Self {
            id,
            stream,
            read_buffer: BytesMut::with_capacity(4096),
        }
    }

    #[allow(dead_code)]
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn read_frame(&mut self) -> Result<Frame> {
        let mut data = [0u8; 1024];
        loop {
            if let Some(frame) = parse_buffered(&mut self.read_buffer, MAX_FRAME_SIZE)? {
                return Ok(frame);
            }
            let len = self.stream.read(&mut data)?;
            if len == 0 {
                return Err(SuggestErr::ConnectionAborted);
            }
            self.read_buffer.extend_from_slice(&data[..len]);
        }
    }

    pub fn write_frame(&mut self, frame: Frame) -> Result<()> {
        self.stream.write_all(&frame.serialize())?;
        self.stream.flush()?;
        Ok(())
    }
}

// takes one complete frame off the front of the buffer; a malformed or
// oversized buffer is discarded so the next read starts clean
fn parse_buffered(buffer: &mut BytesMut, max_size: usize) -> Result<Option<Frame>> {
    match Frame::parse(buffer) {
        Ok((frame, used)) => {
            buffer.advance(used);
            Ok(Some(frame))
        }
        Err(SuggestErr::FrameIncomplete) if buffer.len() > max_size => {
            buffer.clear();
            Err(SuggestErr::FrameTooLarge)
        }
        Err(SuggestErr::FrameIncomplete) => Ok(None),
        Err(e) => {
            buffer.clear();
            Err(e)
        }
    }
}
