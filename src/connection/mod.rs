use std::fmt::Debug;
use std::io::{Read, Write};

mod connection;

pub use connection::{AsyncConnection, SyncConnection};

pub trait SyncConnectionLike: Read + Write + Debug + Send {}

impl SyncConnectionLike for std::net::TcpStream {}
