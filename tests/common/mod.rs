//! Integration test common infrastructure.
//!
//! Starts a relay on an ephemeral port and provides a line-oriented client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use chat_relay::{serve, Config};

/// Start a relay with default settings on 127.0.0.1:0
pub async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, Arc::new(Config::default())));
    addr
}

/// A test chat client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    /// Connect and consume the welcome banner.
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, write_half) = stream.into_split();
        let mut client = Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        };

        assert_eq!(client.recv().await, "Welcome to the chat server!");
        assert_eq!(
            client.recv().await,
            "Use /NICK <nickname> to set your nickname."
        );
        client
    }

    /// Connect and register under `nickname`.
    #[allow(dead_code)]
    pub async fn register(addr: SocketAddr, nickname: &str) -> Self {
        let mut client = Self::connect(addr).await;
        client.send(&format!("/NICK {}", nickname)).await;
        assert_eq!(
            client.recv().await,
            format!("Your nickname is now set to: {}", nickname)
        );
        client
    }

    pub async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .unwrap();
        self.writer.flush().await.unwrap();
    }

    /// Next non-empty line, with `\r` and `\n` stripped.
    pub async fn recv(&mut self) -> String {
        loop {
            let mut line = String::new();
            let n = timeout(Duration::from_secs(5), self.reader.read_line(&mut line))
                .await
                .expect("timed out waiting for a line")
                .unwrap();
            assert!(n > 0, "server closed the connection");
            let line = line.trim_matches(|c| c == '\r' || c == '\n');
            if !line.is_empty() {
                return line.to_string();
            }
        }
    }

    /// Issue `/LIST` until the reply matches `expected`.
    #[allow(dead_code)]
    pub async fn wait_for_list(&mut self, expected: &str) {
        for _ in 0..50 {
            self.send("/LIST").await;
            if self.recv().await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("list never became {:?}", expected);
    }
}
