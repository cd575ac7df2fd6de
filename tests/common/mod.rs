//! Common test utilities

#![allow(dead_code)]

use corsprobe::ScanConfig;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Creates a ScanConfig with a short timeout suitable for local servers
pub fn test_config(concurrency: usize) -> ScanConfig {
    ScanConfig::default()
        .with_header("User-Agent", "corsprobe-test/0.1.0")
        .with_timeout(Duration::from_secs(5))
        .with_concurrency(concurrency)
}

/// The Origin value the prober is expected to send to `base_uri`
pub fn expected_origin(base_uri: &str) -> String {
    format!("{}-test.cors.com", base_uri.trim_end_matches('/'))
}

/// Minimal HTTP server that records how many requests it handles at once.
///
/// Each request is held for `delay` before an empty 200 response is sent.
/// The in-flight counter is decremented before the response is written, so
/// a client that waits for one response before sending the next request is
/// never counted twice.
pub struct OverlapServer {
    addr: SocketAddr,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
    served: Arc<AtomicUsize>,
}

impl OverlapServer {
    pub async fn start(delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");

        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));
        let served = Arc::new(AtomicUsize::new(0));

        let (a, m, s) = (active.clone(), max_active.clone(), served.clone());
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let (a, m, s) = (a.clone(), m.clone(), s.clone());
                tokio::spawn(async move {
                    handle_connection(stream, delay, a, m, s).await;
                });
            }
        });

        Self {
            addr,
            active,
            max_active,
            served,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}/{}", self.addr, path.trim_start_matches('/'))
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    delay: Duration,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
    served: Arc<AtomicUsize>,
) {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }

    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
    max_active.fetch_max(now, Ordering::SeqCst);
    tokio::time::sleep(delay).await;
    active.fetch_sub(1, Ordering::SeqCst);
    served.fetch_add(1, Ordering::SeqCst);

    let _ = stream
        .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
        .await;
    let _ = stream.shutdown().await;
}

/// Returns a local URL on which nothing is listening
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    format!("http://{}/", addr)
}
