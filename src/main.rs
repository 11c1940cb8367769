use log_suggest::arg::Arg;
use log_suggest::server::Server;
use log_suggest::storage::FileStorage;
use log_suggest::SuggestionService;

use log::{error, info};

#[tokio::main]
async fn main() -> log_suggest::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let arg = Arg::parse();

    let storage = FileStorage::new(arg.get_data_dir())?;
    let service = SuggestionService::open(Box::new(storage), arg.get_key(), arg.get_top_k());
    let server = Server::bind(&arg.addr(), service, arg.get_max_clients()).await?;

    let shutdown = server.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received ctrl-c, shutting down");
                shutdown.notify_waiters();
            }
            Err(e) => error!("failed to listen for ctrl-c: {}", e),
        }
    });

    server.run().await
}
