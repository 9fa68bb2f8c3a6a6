//! Delayed UI steps (fade, remove, settle) as explicit, cancellable
//! sequences instead of nested timeouts.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use web_sys::Node;

type Step = Box<dyn FnOnce()>;

struct State {
    steps: VecDeque<(u32, Step)>,
    pending: Option<Timeout>,
    guard: Option<Node>,
}

/// A finite list of `(delay, step)` pairs run one after another. Each delay
/// counts from the previous step. Dropping the sequence cancels whatever has
/// not run yet; a guarded sequence also stops as soon as its node has left
/// the document.
pub struct Sequence {
    state: Rc<RefCell<State>>,
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequence {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                steps: VecDeque::new(),
                pending: None,
                guard: None,
            })),
        }
    }

    pub fn guarded_by(self, node: &Node) -> Self {
        self.state.borrow_mut().guard = Some(node.clone());
        self
    }

    pub fn then<F>(self, delay_ms: u32, step: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.state.borrow_mut().steps.push_back((delay_ms, Box::new(step)));
        self
    }

    pub fn start(self) -> Self {
        advance(&self.state);
        self
    }

    pub fn is_finished(&self) -> bool {
        let state = self.state.borrow();
        state.pending.is_none() && state.steps.is_empty()
    }

    pub fn cancel(&self) {
        let mut state = self.state.borrow_mut();
        state.steps.clear();
        state.pending = None;
    }
}

fn advance(state: &Rc<RefCell<State>>) {
    let mut current = state.borrow_mut();
    let Some((delay, step)) = current.steps.pop_front() else {
        current.pending = None;
        return;
    };
    let weak = Rc::downgrade(state);
    current.pending = Some(Timeout::new(delay, move || {
        let Some(state) = weak.upgrade() else {
            return;
        };
        let live = state.borrow().guard.as_ref().map_or(true, Node::is_connected);
        if !live {
            log::debug!("Dropping scheduled step for a detached node");
            let mut current = state.borrow_mut();
            current.steps.clear();
            current.pending = None;
            return;
        }
        step();
        advance(&state);
    }));
}

/// The sequences one binding currently has in flight. Finished ones are
/// pruned whenever a new one is added.
#[derive(Default)]
pub struct InFlight {
    sequences: Vec<Sequence>,
}

impl InFlight {
    pub fn push(&mut self, sequence: Sequence) {
        self.sequences.retain(|s| !s.is_finished());
        self.sequences.push(sequence);
    }
}

/// At most one sequence at a time; starting a new one cancels the previous.
#[derive(Default)]
pub struct Latest {
    current: Option<Sequence>,
}

impl Latest {
    pub fn replace(&mut self, sequence: Sequence) {
        if let Some(previous) = self.current.replace(sequence) {
            previous.cancel();
        }
    }
}
