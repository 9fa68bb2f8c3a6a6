//! Rate limiting for noisy events such as `scroll` and `resize`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;

pub const DEFAULT_DEBOUNCE_MS: u32 = 20;

/// Collapses a burst of calls into one. With `leading` set the first call of
/// a burst runs immediately and the rest are dropped; otherwise only the last
/// call runs, `wait_ms` after the burst ends.
pub struct Debounce<A: 'static> {
    callback: Rc<dyn Fn(A)>,
    wait_ms: u32,
    leading: bool,
    pending: Rc<RefCell<Option<Timeout>>>,
}

impl<A: 'static> Debounce<A> {
    pub fn new<F>(wait_ms: u32, leading: bool, callback: F) -> Self
    where
        F: Fn(A) + 'static,
    {
        Self {
            callback: Rc::new(callback),
            wait_ms,
            leading,
            pending: Rc::new(RefCell::new(None)),
        }
    }

    pub fn call(&self, args: A) {
        let call_now = self.leading && self.pending.borrow().is_none();
        let (leading_args, trailing_args) = if self.leading {
            (Some(args), None)
        } else {
            (None, Some(args))
        };
        let pending = Rc::downgrade(&self.pending);
        let callback = self.callback.clone();
        let timer = Timeout::new(self.wait_ms, move || {
            if let Some(pending) = pending.upgrade() {
                pending.borrow_mut().take();
            }
            if let Some(args) = trailing_args {
                callback(args);
            }
        });
        // Dropping the previous handle cancels its timer.
        *self.pending.borrow_mut() = Some(timer);
        if let (true, Some(args)) = (call_now, leading_args) {
            (self.callback)(args);
        }
    }
}

/// Runs at most once per `limit_ms`; calls inside the window are dropped.
pub struct Throttle<A: 'static> {
    callback: Rc<dyn Fn(A)>,
    limit_ms: u32,
    blocked: Rc<Cell<bool>>,
    reopen: RefCell<Option<Timeout>>,
}

impl<A: 'static> Throttle<A> {
    pub fn new<F>(limit_ms: u32, callback: F) -> Self
    where
        F: Fn(A) + 'static,
    {
        Self {
            callback: Rc::new(callback),
            limit_ms,
            blocked: Rc::new(Cell::new(false)),
            reopen: RefCell::new(None),
        }
    }

    pub fn call(&self, args: A) {
        if self.blocked.get() {
            return;
        }
        (self.callback)(args);
        self.blocked.set(true);
        let blocked = self.blocked.clone();
        *self.reopen.borrow_mut() = Some(Timeout::new(self.limit_ms, move || blocked.set(false)));
    }
}
