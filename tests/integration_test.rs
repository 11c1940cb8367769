use log_suggest::client::BlockClient;
use log_suggest::server::Server;
use log_suggest::storage::FileStorage;
use log_suggest::{Candidate, SuggestionService};

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;

use tokio::sync::Notify;

struct TestServer {
    addr: SocketAddr,
    shutdown: Arc<Notify>,
    thread: Option<JoinHandle<()>>,
}

impl TestServer {
    fn start(data_dir: &Path, top_k: usize) -> TestServer {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        let storage = FileStorage::new(data_dir).unwrap();
        let service = SuggestionService::open(Box::new(storage), "suggestionTrie", top_k);

        let (tx, rx) = std::sync::mpsc::channel();
        let thread = std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                let server = Server::from_listener(listener, service, 16);
                tx.send(server.shutdown_handle()).unwrap();
                server.run().await.unwrap();
            });
        });
        let shutdown = rx.recv().unwrap();
        TestServer {
            addr,
            shutdown,
            thread: Some(thread),
        }
    }

    fn client(&self) -> BlockClient {
        BlockClient::open(self.addr).unwrap()
    }

    fn stop(mut self) {
        self.shutdown.notify_waiters();
        if let Some(thread) = self.thread.take() {
            thread.join().unwrap();
        }
    }
}

fn read_reply(stream: &mut TcpStream, request: &[u8]) -> String {
    stream.write_all(request).unwrap();
    let mut buf = [0u8; 256];
    let len = stream.read(&mut buf).unwrap();
    String::from_utf8_lossy(&buf[..len]).to_string()
}

fn words(candidates: &[Candidate]) -> Vec<(&str, u64)> {
    candidates.iter().map(|c| (c.word.as_str(), c.freq)).collect()
}

#[test]
fn test_suggest_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(dir.path(), 10);
    let mut client = server.client();

    assert_eq!(client.ping(None).unwrap(), "PONG");
    assert_eq!(client.ping(Some("hello")).unwrap(), "hello");

    for term in ["hello", "hello", "hell", "hell", "hell", "heaven", "goodbye"] {
        client.commit(term).unwrap();
    }
    assert_eq!(
        words(&client.suggest("he").unwrap()),
        vec![("hell", 3), ("hello", 2), ("heaven", 1)]
    );
    assert_eq!(
        words(&client.suggest_with_limit("hel", 1).unwrap()),
        vec![("hell", 3)]
    );
    assert!(client.suggest("").unwrap().is_empty());
    assert!(client.suggest("x").unwrap().is_empty());
    assert_eq!(client.freq("goodbye").unwrap(), 1);
    assert_eq!(client.commit("   ").unwrap(), None);

    client.quit().unwrap();
    server.stop();
}

#[test]
fn test_commit_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(dir.path(), 5);
    let mut client = server.client();
    assert_eq!(client.commit("level:error service:api").unwrap(), Some(1));
    assert_eq!(client.commit("level:error service:api").unwrap(), Some(2));
    assert_eq!(client.commit("level:warn").unwrap(), Some(1));
    let generation = client.generation().unwrap();
    assert_eq!(generation, 3);
    client.quit().unwrap();
    server.stop();

    let blob = std::fs::read_to_string(dir.path().join("suggestionTrie.json")).unwrap();
    assert!(blob.starts_with("{\"character\":\"l\""));

    let server = TestServer::start(dir.path(), 5);
    let mut client = server.client();
    assert_eq!(
        words(&client.suggest("level:").unwrap()),
        vec![("level:error service:api", 2), ("level:warn", 1)]
    );
    // a fresh process starts a new generation count
    assert_eq!(client.generation().unwrap(), 0);
    client.quit().unwrap();
    server.stop();
}

#[test]
fn test_dump_restore_flush() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(dir.path(), 5);
    let mut client = server.client();

    client.commit("timeout").unwrap();
    client.commit("tls").unwrap();
    let json = client.dump().unwrap();

    client.flush().unwrap();
    assert!(client.suggest("t").unwrap().is_empty());
    assert_eq!(client.dump().unwrap(), "null");

    assert!(client.restore("{\"character\":").is_err());
    assert!(client.suggest("t").unwrap().is_empty());

    client.restore(&json).unwrap();
    assert_eq!(
        words(&client.suggest("t").unwrap()),
        vec![("timeout", 1), ("tls", 1)]
    );
    client.save().unwrap();
    let blob = std::fs::read_to_string(dir.path().join("suggestionTrie.json")).unwrap();
    assert_eq!(blob, json);

    client.quit().unwrap();
    server.stop();
}

#[test]
fn test_errors_keep_connection_open() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(dir.path(), 5);
    let mut stream = TcpStream::connect(server.addr).unwrap();

    assert_eq!(
        read_reply(&mut stream, b"*2\r\n$3\r\nGET\r\n$1\r\nk\r\n"),
        "-ERR unknown command\r\n"
    );
    assert_eq!(
        read_reply(&mut stream, b"*1\r\n$7\r\nSUGGEST\r\n"),
        "-ERR wrong number of arguments\r\n"
    );
    // inline commands work too
    assert_eq!(read_reply(&mut stream, b"COMMIT disk full\r\n"), ":1\r\n");
    assert_eq!(
        read_reply(&mut stream, b"SUGGEST d\r\n"),
        "*1\r\n*2\r\n$9\r\ndisk full\r\n:1\r\n"
    );
    assert_eq!(read_reply(&mut stream, b"QUIT\r\n"), "+OK\r\n");

    let mut buf = [0u8; 16];
    assert_eq!(stream.read(&mut buf).unwrap(), 0);
    server.stop();
}

#[test]
fn test_nested_request_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(dir.path(), 5);
    let mut stream = TcpStream::connect(server.addr).unwrap();

    let tower = "*1\r\n".repeat(10_000);
    let reply = read_reply(&mut stream, tower.as_bytes());
    assert!(reply.starts_with("-ERR protocol error: malformed frame\r\n"));

    // the server is still serving other clients
    let mut client = server.client();
    assert_eq!(client.ping(None).unwrap(), "PONG");
    client.quit().unwrap();
    server.stop();
}

#[test]
fn test_stop_closes_idle_connections() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(dir.path(), 5);
    let mut idle = server.client();
    assert_eq!(idle.ping(None).unwrap(), "PONG");

    let mut stream = TcpStream::connect(server.addr).unwrap();
    assert_eq!(read_reply(&mut stream, b"PING\r\n"), "+PONG\r\n");
    server.stop();

    let mut buf = [0u8; 16];
    assert_eq!(stream.read(&mut buf).unwrap_or(0), 0);
}
