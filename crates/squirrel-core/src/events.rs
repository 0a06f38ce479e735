//! Minimal typed publish/subscribe.

use std::fmt;

/// Handle returned by [`Dispatcher::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription<E, P> {
    id: SubscriptionId,
    event: E,
    handler: Box<dyn FnMut(&P)>,
}

/// Named-event dispatcher with any number of handlers per event.
///
/// Handlers run synchronously, in registration order.
pub struct Dispatcher<E, P> {
    next_id: u64,
    subscriptions: Vec<Subscription<E, P>>,
}

impl<E, P> Default for Dispatcher<E, P> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscriptions: Vec::new(),
        }
    }
}

impl<E: fmt::Debug, P> fmt::Debug for Dispatcher<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field(
                "subscriptions",
                &self
                    .subscriptions
                    .iter()
                    .map(|s| (s.id, &s.event))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<E: Copy + PartialEq, P> Dispatcher<E, P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, event: E, handler: impl FnMut(&P) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            event,
            handler: Box::new(handler),
        });
        id
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id != id);
        before != self.subscriptions.len()
    }

    /// Call every handler registered for `event`; returns how many ran.
    pub fn emit(&mut self, event: E, payload: &P) -> usize {
        let mut called = 0;
        for subscription in &mut self.subscriptions {
            if subscription.event == event {
                (subscription.handler)(payload);
                called += 1;
            }
        }
        called
    }

    pub fn listener_count(&self, event: E) -> usize {
        self.subscriptions
            .iter()
            .filter(|subscription| subscription.event == event)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Event {
        Ping,
        Pong,
    }

    #[test]
    fn emits_in_registration_order_and_unsubscribes() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut dispatcher: Dispatcher<Event, u32> = Dispatcher::new();

        let first = Rc::clone(&log);
        let id = dispatcher.on(Event::Ping, move |n| first.borrow_mut().push(format!("a{n}")));
        let second = Rc::clone(&log);
        dispatcher.on(Event::Ping, move |n| second.borrow_mut().push(format!("b{n}")));
        let third = Rc::clone(&log);
        dispatcher.on(Event::Pong, move |n| third.borrow_mut().push(format!("c{n}")));

        assert_eq!(dispatcher.emit(Event::Ping, &1), 2);
        assert!(dispatcher.off(id));
        assert!(!dispatcher.off(id));
        assert_eq!(dispatcher.emit(Event::Ping, &2), 1);
        assert_eq!(dispatcher.listener_count(Event::Pong), 1);

        assert_eq!(*log.borrow(), vec!["a1", "b1", "b2"]);
    }
}
