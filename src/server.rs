//! TCP front end: accepts connections and runs a [`Handler`] for each one.

use crate::handler::{Db, Handler};
use crate::service::SuggestionService;
use crate::Result;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use log::{debug, error, info, warn};
use tokio::net::TcpListener;
use tokio::sync::{Notify, Semaphore};

pub struct Server {
    listener: TcpListener,
    db: Db,
    limit: Arc<Semaphore>,
    shutdown: Arc<Notify>,
}

impl Server {
    pub async fn bind(addr: &str, service: SuggestionService, max_clients: usize) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self::from_listener(listener, service, max_clients))
    }

    pub fn from_listener(
        listener: TcpListener,
        service: SuggestionService,
        max_clients: usize,
    ) -> Self {
        Self {
            listener,
            db: Arc::new(Mutex::new(service)),
            limit: Arc::new(Semaphore::new(max_clients.max(1))),
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Notifying this handle stops the accept loop and every open handler.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    pub async fn run(&self) -> Result<()> {
        info!("server is running on {}", self.local_addr()?);
        // created once so a notification between two selects is not lost
        let shutdown = self.shutdown.notified();
        tokio::pin!(shutdown);
        loop {
            // wait for a free slot before accepting, so excess clients queue
            // in the kernel backlog
            let permit = tokio::select! {
                permit = self.limit.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(e) => {
                        error!("connection limit closed: {}", e);
                        break;
                    }
                },
                _ = &mut shutdown => break,
            };

            let (stream, addr) = tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!("failed to accept connection: {}", e);
                        continue;
                    }
                },
                _ = &mut shutdown => break,
            };
            debug!("new connection: {}", addr);

            let mut handler = Handler::new(stream, self.db.clone(), self.shutdown.clone());
            tokio::spawn(async move {
                if let Err(e) = handler.run().await {
                    warn!("connection {} closed with error: {}", addr, e);
                }
                debug!("connection closed: {}", addr);
                drop(permit);
            });
        }
        info!("server stopped accepting connections");
        Ok(())
    }
}
