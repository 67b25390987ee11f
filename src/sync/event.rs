use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct Event(Arc<AtomicBool>);

pub trait Notifier {
    fn notify(&self);
}

impl Notifier for Event {
    fn notify(&self) {
        self.0.as_ref().store(true, Ordering::Relaxed)
    }
}

/// Non-blocking poll of a stop request.
pub trait Subscriber {
    fn poll(&self) -> bool;
}

impl Subscriber for Event {
    fn poll(&self) -> bool {
        self.0.as_ref().load(Ordering::Relaxed)
    }
}

impl<F: Fn() -> bool> Subscriber for F {
    fn poll(&self) -> bool {
        self()
    }
}

mod test {
    #[test]
    fn test_event() {
        use super::{Event, Notifier, Subscriber};

        let event = Event::default();
        let subscriber = event.clone();
        assert!(!subscriber.poll());
        event.notify();
        assert!(subscriber.poll());
        assert!(event.poll());
    }
}
