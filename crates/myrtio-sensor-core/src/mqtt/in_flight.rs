use heapless::Vec;

/// Outstanding QoS 1 publishes and subscriptions tracked per session
pub const MAX_IN_FLIGHT: usize = 8;

/// Requests sent to the broker that still wait for their acknowledgement
#[derive(Debug, Default)]
pub struct InFlight {
    publishes: Vec<u16, MAX_IN_FLIGHT>,
    subscriptions: Vec<u16, MAX_IN_FLIGHT>,
    ping: bool,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a QoS 1 publish.
    ///
    /// When the window is full the oldest publish is forgotten and returned.
    pub fn publish_sent(&mut self, id: u16) -> Option<u16> {
        let evicted = self.publishes.is_full().then(|| self.publishes.remove(0));
        let _ = self.publishes.push(id);
        evicted
    }

    /// Match a PUBACK, returns `false` for an unknown packet id
    pub fn puback(&mut self, id: u16) -> bool {
        take(&mut self.publishes, id)
    }

    /// Settle the oldest publish.
    ///
    /// The broker acknowledges publishes in the order it received them, which
    /// covers acknowledgements the client reports without a packet id.
    pub fn settle_oldest(&mut self) -> Option<u16> {
        (!self.publishes.is_empty()).then(|| self.publishes.remove(0))
    }

    pub fn subscribe_sent(&mut self, id: u16) {
        if self.subscriptions.is_full() {
            self.subscriptions.remove(0);
        }
        let _ = self.subscriptions.push(id);
    }

    /// Match a SUBACK, returns `false` for an unknown packet id
    pub fn suback(&mut self, id: u16) -> bool {
        take(&mut self.subscriptions, id)
    }

    /// Record a ping, returns `false` while the previous one is unanswered
    pub fn ping_sent(&mut self) -> bool {
        !core::mem::replace(&mut self.ping, true)
    }

    /// Match a PINGRESP, returns `false` when no ping was sent
    pub fn pingresp(&mut self) -> bool {
        core::mem::take(&mut self.ping)
    }

    pub fn pending_publishes(&self) -> usize {
        self.publishes.len()
    }

    pub fn ping_pending(&self) -> bool {
        self.ping
    }
}

fn take(ids: &mut Vec<u16, MAX_IN_FLIGHT>, id: u16) -> bool {
    match ids.iter().position(|pending| *pending == id) {
        Some(index) => {
            ids.remove(index);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_puback_matches_only_tracked_ids() {
        let mut in_flight = InFlight::new();
        in_flight.publish_sent(1);
        in_flight.publish_sent(2);

        assert!(in_flight.puback(2));
        assert!(!in_flight.puback(2));
        assert!(!in_flight.puback(9));
        assert_eq!(in_flight.pending_publishes(), 1);
    }

    #[test]
    fn test_full_window_forgets_oldest() {
        let mut in_flight = InFlight::new();
        let window = u16::try_from(MAX_IN_FLIGHT).unwrap();
        for id in 0..window {
            assert_eq!(in_flight.publish_sent(id), None);
        }

        assert_eq!(in_flight.publish_sent(100), Some(0));
        assert_eq!(in_flight.pending_publishes(), MAX_IN_FLIGHT);
        assert_eq!(in_flight.settle_oldest(), Some(1));
    }

    #[test]
    fn test_ping_needs_answer_before_next() {
        let mut in_flight = InFlight::new();

        assert!(!in_flight.pingresp());
        assert!(in_flight.ping_sent());
        assert!(!in_flight.ping_sent());
        assert!(in_flight.pingresp());
        assert!(in_flight.ping_sent());
    }

    #[test]
    fn test_suback_matches_subscription() {
        let mut in_flight = InFlight::new();
        in_flight.subscribe_sent(7);

        assert!(!in_flight.suback(8));
        assert!(in_flight.suback(7));
        assert!(!in_flight.suback(7));
    }
}
