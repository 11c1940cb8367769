//! Per-connection request loop.
//!
//! - read one frame from the socket
//! - parse it into a command, a bad request becomes an error reply
//! - apply the command while holding the service lock
//! - write the reply back
//!
//! The lock is taken on the blocking pool and released before the reply is
//! written, so neither a slow client nor a snapshot write stalls the runtime.
use crate::cmd::{self, Command};
use crate::connection::AsyncConnection;
use crate::frame::Frame;
use crate::service::SuggestionService;
use crate::SuggestErr;

use std::sync::{Arc, Mutex};

use log::{error, trace};
use tokio::{net::TcpStream, sync::Notify};

pub type Db = Arc<Mutex<SuggestionService>>;

pub struct Handler {
    db: Db,
    conn: AsyncConnection,
    shutdown: Arc<Notify>,
}

impl Handler {
    pub fn new(stream: TcpStream, db: Db, shutdown: Arc<Notify>) -> Handler {
        Handler {
            db,
            conn: AsyncConnection::new(stream),
            shutdown,
        }
    }

    pub async fn run(&mut self) -> crate::Result<()> {
        let parser = cmd::Parser::new();
        // created once so a shutdown sent while a command runs is not lost
        let shutdown = self.shutdown.clone();
        let notified = shutdown.notified();
        tokio::pin!(notified);
        loop {
            let frame = tokio::select! {
                frame = self.conn.read_frame() => frame,
                _ = &mut notified => {
                    return Ok(())
                }
            };
            let frame = match frame {
                Ok(frame) => frame,
                // the client went away between requests
                Err(SuggestErr::ConnectionAborted) => return Ok(()),
                Err(SuggestErr::FrameMalformed) => {
                    let resp = Frame::Error(SuggestErr::FrameMalformed.to_string());
                    self.conn.write_frame(resp).await?;
                    continue;
                }
                // the rest of that frame is still in flight, drop the peer
                Err(SuggestErr::FrameTooLarge) => {
                    let resp = Frame::Error(SuggestErr::FrameTooLarge.to_string());
                    self.conn.write_frame(resp).await?;
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            let cmd = match parser.parse(frame) {
                Ok(cmd) => cmd,
                Err(e) => {
                    self.conn.write_frame(Frame::Error(e.to_string())).await?;
                    continue;
                }
            };
            trace!("parsed command {:?}", cmd);
            let close = cmd.closes_connection();
            let resp = self.apply(cmd).await;
            trace!("command response {:?}", resp);
            self.conn.write_frame(resp).await?;
            if close {
                return Ok(());
            }
        }
    }

    // commands may write the snapshot to disk, so they run on the blocking
    // pool rather than on a runtime worker
    async fn apply(&self, cmd: Command) -> Frame {
        let db = self.db.clone();
        let applied = tokio::task::spawn_blocking(move || {
            let resp = match db.lock() {
                Ok(mut service) => cmd.apply(&mut service),
                Err(_) => {
                    error!("suggestion service lock poisoned");
                    Frame::Error("ERR service unavailable".to_string())
                }
            };
            resp
        })
        .await;
        match applied {
            Ok(resp) => resp,
            Err(e) => {
                error!("command task failed: {}", e);
                Frame::Error("ERR service unavailable".to_string())
            }
        }
    }
}
