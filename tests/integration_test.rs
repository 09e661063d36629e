use deadline_stress::client::ClientWorker;
use deadline_stress::metrics::Counters;
use deadline_stress::network::{
    DeadlineStream, HarnessConfig, IoStatus, SessionOutcome, SessionRateLimiter,
};
use deadline_stress::server::handle_connection;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::sleep;

/// A server that never reads in time: both ends classify the session as canceled
#[tokio::test]
async fn test_stalled_handler_cancels_both_sides() {
    let config = Arc::new(HarnessConfig {
        buffer_size_min: 4 << 20,
        buffer_size_max: (4 << 20) + 1,
        ..Default::default()
    });
    let timeout = config.connection_timeout;
    let bounds = config.session_bounds();
    let counters = Arc::new(Counters::new());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server_counters = counters.clone();
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let conn = DeadlineStream::new(stream, timeout);
        // Stall past the deadline before the first read
        sleep(timeout + Duration::from_millis(20)).await;
        handle_connection(conn, bounds, timeout, &server_counters).await
    });

    let start = Instant::now();
    let mut worker = ClientWorker::new(
        0,
        addr,
        config.clone(),
        counters.clone(),
        SessionRateLimiter::unlimited(),
    );
    let client_outcome = worker.run_session().await.unwrap();
    let server_outcome = server.await.unwrap().unwrap();
    let elapsed = start.elapsed();

    assert!(client_outcome.is_canceled(), "client: {:?}", client_outcome);
    assert!(server_outcome.is_canceled(), "server: {:?}", server_outcome);
    // One logical session, counted once by each side
    assert_eq!(counters.snapshot().canceled, 2);
    assert_eq!(counters.snapshot().finished, 0);
    assert!(
        elapsed < timeout + Duration::from_secs(1),
        "took {:?}",
        elapsed
    );
}

/// A client that pauses mid-session is canceled by the server, never dropped
#[tokio::test]
async fn test_slow_writer_is_canceled_by_server() {
    let config = HarnessConfig::default();
    let counters = Counters::new();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let writer = tokio::spawn(async move {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(&[b'1'; 4096]).await.unwrap();
        sleep(Duration::from_millis(500)).await;
        stream
    });

    let (stream, _) = listener.accept().await.unwrap();
    let conn = DeadlineStream::new(stream, config.connection_timeout);
    let outcome = handle_connection(
        conn,
        config.session_bounds(),
        config.connection_timeout,
        &counters,
    )
    .await
    .unwrap();

    assert!(outcome.is_canceled());
    assert!(outcome.bytes() <= 4096);
    assert_eq!(counters.snapshot().canceled, 1);
    writer.abort();
}

/// A client session under the deadline is finished and its size is in bounds
#[tokio::test]
async fn test_client_session_finishes_on_server() {
    let config = Arc::new(HarnessConfig {
        buffer_size_min: 1024,
        buffer_size_max: 2048,
        connection_timeout: Duration::from_secs(5),
        ..Default::default()
    });
    let bounds = config.session_bounds();
    let timeout = config.connection_timeout;
    let counters = Arc::new(Counters::new());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server_counters = counters.clone();
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let conn = DeadlineStream::new(stream, timeout);
        handle_connection(conn, bounds, timeout, &server_counters).await
    });

    let mut worker = ClientWorker::new(
        0,
        addr,
        config.clone(),
        counters.clone(),
        SessionRateLimiter::unlimited(),
    );
    let client_outcome = worker.run_session().await.unwrap();
    let server_outcome = server.await.unwrap().unwrap();

    assert_eq!(
        server_outcome,
        SessionOutcome::Finished {
            bytes: client_outcome.bytes()
        }
    );
    assert!((8192..=16384).contains(&server_outcome.bytes()));
    assert_eq!(counters.snapshot().finished, 1);
    assert_eq!(counters.snapshot().canceled, 0);
}

/// The server's deadline fires first: the client still reaches its own
/// deadline and is canceled, instead of seeing its write reset
#[tokio::test]
async fn test_server_cancel_does_not_reset_client() {
    let server_timeout = Duration::from_millis(30);
    let client_timeout = Duration::from_millis(300);
    let linger = Duration::from_millis(500);
    let bounds = HarnessConfig::default().session_bounds();
    let counters = Arc::new(Counters::new());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server_counters = counters.clone();
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let conn = DeadlineStream::new(stream, server_timeout);
        handle_connection(conn, bounds, linger, &server_counters).await
    });

    let stream = TcpStream::connect(addr).await.unwrap();
    let mut conn = DeadlineStream::new(stream, client_timeout);
    // Much more than the server can drain before its deadline
    let buf = vec![0u8; 1 << 30];
    let client_status = conn.write_buffer(&buf).await;
    drop(conn);
    let server_outcome = server.await.unwrap().unwrap();

    assert!(
        matches!(client_status, Ok(IoStatus::DeadlineExceeded { .. })),
        "client: {:?}",
        client_status
    );
    assert!(server_outcome.is_canceled(), "server: {:?}", server_outcome);
    assert_eq!(counters.snapshot().canceled, 1);
}
