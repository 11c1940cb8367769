mod sync_cli;

// block client
// the io operation will block the current thread from executing
pub use sync_cli::BlockClient;
