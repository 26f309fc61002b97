//! Background task runner.
//!
//! One ad-hoc thread per blocking call (model load, each generation),
//! discarded afterward. The worker never touches the UI: it produces one
//! `AppEvent` which travels over an mpsc channel and is drained on the
//! UI thread each frame. A panic inside the work closure is caught and
//! converted into an ordinary event, so the UI always receives a value.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use crate::inference::Generator;

/// Events delivered from background workers to the UI thread.
pub enum AppEvent {
    /// Model load finished; the handle is shared read-only from now on.
    ModelLoaded(Arc<Generator>),
    /// Model load failed; carries the fatal dialog message.
    ModelFailed(String),
    /// A generation request finished; carries generated text or a
    /// flattened error message.
    GenerationDone(String),
}

/// Run one unit of blocking work on its own thread and deliver the
/// resulting event through `tx`.
///
/// `on_panic` turns a panic message into the event sent instead. A send
/// failure means the UI is gone, in which case the result is dropped.
pub fn run<T, W, P>(tx: Sender<T>, work: W, on_panic: P)
where
    T: Send + 'static,
    W: FnOnce() -> T + Send + 'static,
    P: FnOnce(String) -> T + Send + 'static,
{
    thread::spawn(move || {
        let event = match catch_unwind(AssertUnwindSafe(work)) {
            Ok(event) => event,
            Err(payload) => on_panic(panic_message(payload)),
        };
        let _ = tx.send(event);
    });
}

/// Best-effort extraction of a panic payload as text.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn work_result_is_delivered() {
        let (tx, rx) = mpsc::channel();
        run(tx, || 40 + 2, |_| -1);

        let value = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn panic_is_converted_to_an_event() {
        let (tx, rx) = mpsc::channel();
        run(
            tx,
            || -> String { panic!("inference blew up") },
            |msg| format!("caught: {msg}"),
        );

        let value = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(value, "caught: inference blew up");
    }

    #[test]
    fn caller_does_not_block() {
        let (tx, rx) = mpsc::channel();
        let started = std::time::Instant::now();
        run(
            tx,
            || thread::sleep(Duration::from_millis(200)),
            |_| (),
        );
        // `run` returns immediately even though the work sleeps.
        assert!(started.elapsed() < Duration::from_millis(100));

        rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }

    #[test]
    fn dropped_receiver_is_tolerated() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        run(tx, || 1, |_| -1);
        // Nothing to assert: the worker must simply not panic the test
        // process when the send fails.
        thread::sleep(Duration::from_millis(50));
    }
}
