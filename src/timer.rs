use std::time::Duration;

/// A periodic timer on the controller's virtual clock. It only records when it is next due;
/// firing is up to the owner.
#[derive(Clone, Debug)]
pub(crate) struct Timer {
    period: Duration,
    next_due: Option<Duration>,
}

impl Timer {
    pub fn new(period: Duration) -> Timer {
        Timer {
            period,
            next_due: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.next_due
    }

    /// Arms the timer to fire one period after `now`. Starting an armed timer does nothing and
    /// returns [false].
    pub fn start(&mut self, now: Duration) -> bool {
        if self.is_armed() {
            return false;
        }
        self.next_due = Some(now + self.period);
        true
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Moves the deadline one period on. Called when the timer fires.
    pub fn reschedule(&mut self) {
        if let Some(due) = self.next_due {
            self.next_due = Some(due + self.period);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_guarded() {
        let mut timer = Timer::new(Duration::from_millis(100));
        assert!(timer.start(Duration::ZERO));
        assert!(!timer.start(Duration::from_millis(50)));
        assert_eq!(timer.next_due(), Some(Duration::from_millis(100)));
        timer.reschedule();
        assert_eq!(timer.next_due(), Some(Duration::from_millis(200)));
        timer.cancel();
        assert!(!timer.is_armed());
        timer.reschedule();
        assert_eq!(timer.next_due(), None);
    }
}
