use chrono::Utc;
use remotarr::models::{ServerConnection, ServerKind};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Loopback HTTP stub that answers every request with one canned response
/// and reports each raw request back to the test.
pub struct StubServer {
    pub base_url: String,
    pub requests: mpsc::UnboundedReceiver<String>,
}

pub async fn spawn_stub(status: u16, reason: &'static str, body: impl Into<String>) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let body = body.into();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let tx = tx.clone();
            let body = body.clone();

            tokio::spawn(async move {
                let mut buffer = vec![0u8; 8192];
                let n = socket.read(&mut buffer).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buffer[..n]).to_string();
                let _ = tx.send(request);

                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    StubServer {
        base_url: format!("http://{}", addr),
        requests: rx,
    }
}

pub fn connection(base_url: &str, kind: ServerKind) -> ServerConnection {
    ServerConnection {
        id: Uuid::new_v4(),
        name: "Test Server".to_string(),
        base_url: base_url.to_string(),
        api_key: "test-key".to_string(),
        kind,
        active: true,
        created_at: Utc::now(),
    }
}
