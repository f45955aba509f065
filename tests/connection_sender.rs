mod common;

use common::{Behavior, MockTransport, RecordingObserver};
use std::future::IntoFuture;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use wsplex::error::{Error, TransportError};
use wsplex::{ConnectionSender, ConnectionState, Payload, Phase};

fn open_state() -> ConnectionState {
    let state = ConnectionState::new();
    assert!(state.advance(Phase::Open));
    state
}

#[tokio::test]
async fn test_send_resolves_true_and_writes_once() {
    let transport = MockTransport::accepting();
    let sender = ConnectionSender::new(&transport, open_state());

    let accepted = sender.send("hello").await.unwrap();

    assert!(accepted);
    assert_eq!(transport.writes(), vec![Payload::Text("hello".to_string())]);
}

#[test]
fn test_send_can_be_run_without_runtime() {
    let transport = MockTransport::accepting();
    let sender = ConnectionSender::new(&transport, open_state());

    assert!(sender.send("sync").run().unwrap());
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn test_discarded_send_performs_no_write() {
    let transport = MockTransport::accepting();
    let sender = ConnectionSender::new(&transport, open_state());

    let pending = sender.send("never");
    drop(pending);

    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_unpolled_future_performs_no_write() {
    let transport = MockTransport::accepting();
    let sender = ConnectionSender::new(&transport, open_state());

    let future = sender.send("never").into_future();
    drop(future);

    assert_eq!(transport.call_count(), 0);
}

#[test]
fn test_rejected_send_resolves_false() {
    let transport = MockTransport::rejecting();
    let sender = ConnectionSender::new(&transport, open_state());

    let accepted = sender.send("refused").run().unwrap();

    assert!(!accepted);
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn test_transport_fault_is_distinct_from_rejection() {
    let transport = MockTransport::faulting();
    let sender = ConnectionSender::new(&transport, open_state());

    match sender.send("boom").run() {
        Err(Error::Transport(TransportError::Io(cause))) => {
            assert!(cause.to_string().contains("broken pipe"));
        }
        other => panic!("Expected transport I/O error, got {:?}", other),
    }
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn test_send_after_close_fails_without_write() {
    let transport = MockTransport::accepting();
    let state = open_state();
    let sender = ConnectionSender::new(&transport, state.clone());

    assert!(state.advance(Phase::Closed));

    match sender.send("late").run() {
        Err(Error::Transport(TransportError::Closed)) => {}
        other => panic!("Expected closed error, got {:?}", other),
    }
    assert_eq!(transport.call_count(), 0);
    assert!(!sender.is_connected());
}

#[test]
fn test_send_after_transport_dropped() {
    let transport = MockTransport::accepting();
    let sender = ConnectionSender::new(&transport, open_state());
    let pending = sender.send("orphan");

    drop(transport);

    match pending.run() {
        Err(Error::Transport(TransportError::Dropped)) => {}
        other => panic!("Expected dropped error, got {:?}", other),
    }
}

#[test]
fn test_activation_uses_transport_at_run_time() {
    let transport = MockTransport::accepting();
    let sender = ConnectionSender::new(&transport, ConnectionState::new());
    let pending = sender.send("queued before open");

    transport.set_behavior(Behavior::Reject);

    assert!(!pending.run().unwrap());
}

#[test]
fn test_activation_sees_state_at_run_time() {
    let transport = MockTransport::accepting();
    let state = open_state();
    let sender = ConnectionSender::new(&transport, state.clone());
    let pending = sender.send("built while open");

    assert!(state.advance(Phase::Closed));

    match pending.run() {
        Err(Error::Transport(TransportError::Closed)) => {}
        other => panic!("Expected Closed, got {:?}", other),
    }
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sends_each_report_own_result() {
    let transport = MockTransport::accepting();
    let sender = ConnectionSender::new(&transport, open_state());

    let mut handles = Vec::new();
    for i in 0..32 {
        let sender = sender.clone();
        handles.push(tokio::spawn(async move {
            sender.send(format!("msg-{}", i)).await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().unwrap());
    }

    let writes = transport.writes();
    assert_eq!(writes.len(), 32);
    for i in 0..32 {
        let expected = Payload::Text(format!("msg-{}", i));
        assert_eq!(writes.iter().filter(|w| **w == expected).count(), 1);
    }
}

#[test]
fn test_observer_sees_every_outcome() {
    let transport = MockTransport::accepting();
    let state = open_state();
    let observer = Arc::new(RecordingObserver::default());
    let sender =
        ConnectionSender::new(&transport, state.clone()).with_observer(observer.clone());

    sender.send("one").run().unwrap();
    transport.set_behavior(Behavior::Reject);
    sender.send("two").run().unwrap();
    state.advance(Phase::Failed);
    let _ = sender.send("three").run();

    assert_eq!(observer.sends.load(Ordering::SeqCst), 2);
    assert_eq!(observer.accepted.load(Ordering::SeqCst), 1);
    assert_eq!(observer.rejected.load(Ordering::SeqCst), 1);
    assert_eq!(observer.failed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_binary_payload_passes_through() {
    let transport = MockTransport::accepting();
    let sender = ConnectionSender::new(&transport, open_state());

    sender.send_payload(Payload::Binary(vec![1, 2, 3])).run().unwrap();

    assert_eq!(transport.writes(), vec![Payload::Binary(vec![1, 2, 3])]);
}
