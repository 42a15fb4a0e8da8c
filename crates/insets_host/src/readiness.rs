//! One-shot host readiness signal.

use std::{cell::RefCell, rc::Rc};

type ReadyCallback = Box<dyn FnOnce()>;

#[derive(Default)]
struct ReadinessState {
    fired: bool,
    waiters: Vec<ReadyCallback>,
}

/// Event the host fires once, when native bridging becomes usable.
///
/// Callbacks registered before [`ReadinessSignal::fire`] run at fire time in registration order;
/// callbacks registered afterwards run immediately. Firing more than once has no effect.
#[derive(Clone, Default)]
pub struct ReadinessSignal {
    state: Rc<RefCell<ReadinessState>>,
}

impl std::fmt::Debug for ReadinessSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ReadinessSignal")
            .field("fired", &state.fired)
            .field("waiters", &state.waiters.len())
            .finish()
    }
}

impl ReadinessSignal {
    /// Creates a signal that has not fired yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the signal has fired.
    pub fn is_ready(&self) -> bool {
        self.state.borrow().fired
    }

    /// Runs `callback` once the signal fires, or right away if it already has.
    pub fn on_ready(&self, callback: impl FnOnce() + 'static) {
        {
            let mut state = self.state.borrow_mut();
            if !state.fired {
                state.waiters.push(Box::new(callback));
                return;
            }
        }
        callback();
    }

    /// Fires the signal. Returns `false` when it had already fired.
    pub fn fire(&self) -> bool {
        let waiters = {
            let mut state = self.state.borrow_mut();
            if state.fired {
                return false;
            }
            state.fired = true;
            std::mem::take(&mut state.waiters)
        };
        tracing::debug!(waiters = waiters.len(), "host readiness signal fired");
        for callback in waiters {
            callback();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn waiters_run_once_in_registration_order() {
        let signal = ReadinessSignal::new();
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::default();
        for name in ["first", "second"] {
            let log = log.clone();
            signal.on_ready(move || log.borrow_mut().push(name));
        }

        assert!(log.borrow().is_empty());
        assert!(signal.fire());
        assert!(!signal.fire());
        assert!(signal.is_ready());
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn late_waiters_run_immediately() {
        let signal = ReadinessSignal::new();
        signal.fire();

        let log: Rc<RefCell<Vec<&'static str>>> = Rc::default();
        let sink = log.clone();
        signal.on_ready(move || sink.borrow_mut().push("late"));
        assert_eq!(*log.borrow(), vec!["late"]);
    }

    #[test]
    fn waiter_registered_while_firing_still_runs() {
        let signal = ReadinessSignal::new();
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::default();
        let nested_signal = signal.clone();
        let sink = log.clone();
        signal.on_ready(move || {
            let inner_sink = sink.clone();
            nested_signal.on_ready(move || inner_sink.borrow_mut().push("nested"));
            sink.borrow_mut().push("outer");
        });

        signal.fire();
        assert_eq!(*log.borrow(), vec!["nested", "outer"]);
    }
}
