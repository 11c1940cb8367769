use crate::service::{DEFAULT_TOP_K, TRIE_KEY};

use clap::Parser;
use marco::Getter;

use std::path::PathBuf;

#[derive(Parser, Debug, Getter)]
#[command(author, version, about = "Frequency-ranked search suggestions for a log viewer", long_about = None)]
pub struct Arg {
    #[clap(long, env = "LOG_SUGGEST_HOST", default_value = "127.0.0.1")]
    host: String,
    #[clap(short, long, env = "LOG_SUGGEST_PORT", default_value = "7379")]
    port: u16,

    #[clap(long, env = "LOG_SUGGEST_MAX_CLIENTS", default_value = "1024")]
    max_clients: usize,

    /// Directory holding the persisted trie
    #[clap(long, env = "LOG_SUGGEST_DATA_DIR", default_value = ".log-suggest")]
    data_dir: PathBuf,
    /// Storage key of the persisted trie
    #[clap(long, env = "LOG_SUGGEST_KEY", default_value = TRIE_KEY)]
    key: String,
    /// Number of suggestions returned per prefix
    #[clap(short = 'k', long, env = "LOG_SUGGEST_TOP_K", default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
}

impl Arg {
    pub fn parse() -> Self {
        Arg::parse_from(std::env::args())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
