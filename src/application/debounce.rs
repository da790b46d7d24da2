use std::time::Duration;

/// Token handed out for every scheduled value; only the newest one fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceTicket(u64);

/// Timer-agnostic debounce state.
///
/// Whoever owns the timer calls [`Debouncer::schedule`] on every input and
/// arms a timer for [`Debouncer::quiet`] carrying the returned ticket. When a
/// timer elapses it calls [`Debouncer::fire`]; tickets superseded in the
/// meantime yield nothing.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    generation: u64,
    pending: Option<(DebounceTicket, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, generation: 0, pending: None }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Replaces any pending value.
    pub fn schedule(&mut self, value: T) -> DebounceTicket {
        self.generation += 1;
        let ticket = DebounceTicket(self.generation);
        self.pending = Some((ticket, value));
        ticket
    }

    /// Releases the pending value if `ticket` is still the newest one.
    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<T> {
        match self.pending.take() {
            Some((current, value)) if current == ticket => Some(value),
            other => {
                self.pending = other;
                None
            }
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debouncer() -> Debouncer<String> {
        Debouncer::new(Duration::from_millis(500))
    }

    #[test]
    fn single_value_fires_once() {
        let mut debouncer = debouncer();
        let ticket = debouncer.schedule("btc".to_string());
        assert_eq!(debouncer.fire(ticket).as_deref(), Some("btc"));
        assert_eq!(debouncer.fire(ticket), None);
    }

    #[test]
    fn newer_input_supersedes_older_tickets() {
        let mut debouncer = debouncer();
        let first = debouncer.schedule("b".to_string());
        let second = debouncer.schedule("bt".to_string());

        assert_eq!(debouncer.fire(first), None);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.fire(second).as_deref(), Some("bt"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn cancel_drops_pending_value() {
        let mut debouncer = debouncer();
        let ticket = debouncer.schedule("eth".to_string());
        debouncer.cancel();
        assert_eq!(debouncer.fire(ticket), None);
    }

    #[test]
    fn keeps_configured_quiet_period() {
        assert_eq!(debouncer().quiet(), Duration::from_millis(500));
    }
}
