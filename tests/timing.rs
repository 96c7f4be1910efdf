//! Timer behaviour on a paused clock. The runtime jumps straight to the next
//! pending timer whenever it is idle, so delays are observed exactly.

mod common;

use std::time::Duration;

use renamer_dash::api::ApiClient;
use renamer_dash::poller::{PollUpdate, StatusPoller};
use renamer_dash::stream::{ConnectionState, LogStream, StreamUpdate};
use tokio::sync::mpsc;
use tokio::time::Instant;

use common::{Backend, FakeServer};

fn client_without_backend() -> ApiClient {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ApiClient::new(&format!("http://{}", addr)).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_attempts_are_spaced_by_delay() {
    let client = client_without_backend();
    let url = client.log_stream_url("/ws/logs").unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel::<StreamUpdate>();
    let stream = LogStream::spawn(url, Duration::from_secs(3), tx);

    let mut closed_at = None;
    let mut gaps = Vec::new();
    while gaps.len() < 4 {
        match rx.recv().await.unwrap() {
            StreamUpdate::State(ConnectionState::Closed) => closed_at = Some(Instant::now()),
            StreamUpdate::State(ConnectionState::Connecting) => {
                if let Some(at) = closed_at.take() {
                    gaps.push(at.elapsed());
                }
            }
            _ => {}
        }
    }

    assert_eq!(gaps, vec![Duration::from_secs(3); 4]);
    stream.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_status_requests_follow_poll_interval() {
    let server = FakeServer::start(Backend::default()).await;
    let client = ApiClient::new(&server.base_url).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel::<PollUpdate>();
    let started = Instant::now();
    let poller = StatusPoller::spawn(client, Duration::from_secs(2), tx);

    for _ in 0..4 {
        assert_eq!(rx.recv().await.unwrap().result, Ok(false));
    }
    poller.stop().await;

    let offsets: Vec<Duration> = server.with(|b| {
        b.status_calls.iter().take(4).map(|at| at.duration_since(started)).collect()
    });
    // First request goes out at once, the rest on the interval
    assert_eq!(
        offsets,
        vec![
            Duration::ZERO,
            Duration::from_secs(2),
            Duration::from_secs(4),
            Duration::from_secs(6),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_stopped_poller_sends_no_more_requests() {
    let server = FakeServer::start(Backend::default()).await;
    let client = ApiClient::new(&server.base_url).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel::<PollUpdate>();
    let poller = StatusPoller::spawn(client, Duration::from_secs(2), tx);

    rx.recv().await.unwrap();
    rx.recv().await.unwrap();
    poller.stop().await;
    let calls = server.with(|b| b.status_calls.len());

    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(server.with(|b| b.status_calls.len()), calls);
    // Every sender is gone once the loop and its requests have exited
    assert!(rx.recv().await.is_none());
}
