// Server module entry point
// Accept loop, per-connection serving and graceful shutdown

pub mod connection;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

pub use connection::accept_connection;
pub use listener::{create_reusable_listener, DEFAULT_BACKLOG};

/// Accept connections until `shutdown` resolves, then let open connections
/// finish for up to `write_timeout` seconds.
pub async fn run<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()>,
{
    let active_connections = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = &mut shutdown => break,
        }
    }

    drop(listener);
    logger::log_shutdown(active_connections.load(Ordering::SeqCst));

    let deadline = Duration::from_secs(state.config.performance.write_timeout);
    let drained = tokio::time::timeout(deadline, async {
        while active_connections.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await;

    if drained.is_err() {
        logger::log_warning(&format!(
            "{} connection(s) still open after {}s, exiting",
            active_connections.load(Ordering::SeqCst),
            deadline.as_secs()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::sync::oneshot;

    fn state() -> Arc<AppState> {
        let config: Config = toml::from_str(
            r#"
[server]
host = "127.0.0.1"
port = 0

[logging]
level = "info"
access_log = false

[performance]
keep_alive_timeout = 5
read_timeout = 5
write_timeout = 1

[http]
default_content_type = "text/html; charset=utf-8"
server_name = "pkgroute-test"
max_body_size = 1024
"#,
        )
        .unwrap();
        Arc::new(AppState::new(&config))
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let listener =
            create_reusable_listener("127.0.0.1:0".parse().unwrap(), DEFAULT_BACKLOG).unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            run(listener, state(), async {
                let _ = rx.await;
            })
            .await
            .is_ok()
        });

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /nonexistent HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        let text = String::from_utf8_lossy(&raw);
        assert!(text.starts_with("HTTP/1.1 200 OK"));
        assert!(text.to_ascii_lowercase().contains("server: pkgroute-test"));

        tx.send(()).unwrap();
        assert!(server.await.unwrap());
    }
}
