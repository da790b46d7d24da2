//! Browser timer driving a [`Debouncer`].

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

use crate::application::debounce::Debouncer;

/// Commits a value once it has stayed unchanged for the quiet period.
///
/// Each `push` replaces the armed [`Timeout`]; dropping the old one cancels it
/// in the browser. Clones share the same timer.
pub struct TimeoutDebouncer<T: 'static> {
    state: Rc<RefCell<Debouncer<T>>>,
    timeout: Rc<RefCell<Option<Timeout>>>,
    commit: Rc<dyn Fn(T)>,
}

impl<T: 'static> Clone for TimeoutDebouncer<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            timeout: Rc::clone(&self.timeout),
            commit: Rc::clone(&self.commit),
        }
    }
}

impl<T: 'static> TimeoutDebouncer<T> {
    pub fn new(debouncer: Debouncer<T>, commit: impl Fn(T) + 'static) -> Self {
        Self {
            state: Rc::new(RefCell::new(debouncer)),
            timeout: Rc::new(RefCell::new(None)),
            commit: Rc::new(commit),
        }
    }

    pub fn push(&self, value: T) {
        let (ticket, quiet) = {
            let mut state = self.state.borrow_mut();
            (state.schedule(value), state.quiet())
        };
        let millis = u32::try_from(quiet.as_millis()).unwrap_or(u32::MAX);

        let state = Rc::clone(&self.state);
        let commit = Rc::clone(&self.commit);
        let timeout = Timeout::new(millis, move || {
            let ready = state.borrow_mut().fire(ticket);
            if let Some(value) = ready {
                commit(value);
            }
        });
        self.timeout.borrow_mut().replace(timeout);
    }

    pub fn cancel(&self) {
        self.state.borrow_mut().cancel();
        self.timeout.borrow_mut().take();
    }
}
