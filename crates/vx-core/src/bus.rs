//! Synchronous, single-threaded notification bus.
//!
//! Handlers are invoked in subscription order, on the publishing call stack,
//! before `publish` returns. A subscription is revoked only through the
//! [`Subscription`] token returned when it was made; the token is not `Clone`,
//! so every subscribe has at most one matching unsubscribe.

use core::fmt;

use crate::ids::{Id, SubscriptionId};

/// An event type that can be routed by kind.
pub trait Topic {
    type Kind: Copy + Eq + fmt::Debug;

    fn kind(&self) -> Self::Kind;
}

type Handler<E> = Box<dyn FnMut(&E)>;

struct Subscriber<E: Topic> {
    id: SubscriptionId,
    /// `None` receives every event.
    filter: Option<E::Kind>,
    handler: Handler<E>,
}

/// Revocation token for one subscription.
#[must_use = "dropping the token makes the subscription permanent"]
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: SubscriptionId,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

/// Observer registry for one event type.
pub struct Bus<E: Topic> {
    subscribers: Vec<Subscriber<E>>,
    next_id: u32,
}

impl<E: Topic> Default for Bus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Topic> fmt::Debug for Bus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filters: Vec<_> = self.subscribers.iter().map(|s| s.filter).collect();
        f.debug_struct("Bus").field("subscribers", &filters).finish()
    }
}

impl<E: Topic> Bus<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Register `handler` for events of `kind`.
    pub fn subscribe(&mut self, kind: E::Kind, handler: impl FnMut(&E) + 'static) -> Subscription {
        self.register(Some(kind), Box::new(handler))
    }

    /// Register `handler` for every event.
    pub fn subscribe_all(&mut self, handler: impl FnMut(&E) + 'static) -> Subscription {
        self.register(None, Box::new(handler))
    }

    fn register(&mut self, filter: Option<E::Kind>, handler: Handler<E>) -> Subscription {
        let id = Id::from_index(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.subscribers.push(Subscriber {
            id,
            filter,
            handler,
        });
        Subscription { id }
    }

    /// Revoke a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != subscription.id);
        self.subscribers.len() != before
    }

    /// Deliver `event` to every matching subscriber, in subscription order.
    ///
    /// Returns the number of handlers invoked.
    pub fn publish(&mut self, event: &E) -> usize {
        let kind = event.kind();
        let mut delivered = 0;
        for subscriber in &mut self.subscribers {
            if subscriber.filter.is_none_or(|k| k == kind) {
                (subscriber.handler)(event);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Ping {
        A(u32),
        B,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum PingKind {
        A,
        B,
    }

    impl Topic for Ping {
        type Kind = PingKind;

        fn kind(&self) -> PingKind {
            match self {
                Ping::A(_) => PingKind::A,
                Ping::B => PingKind::B,
            }
        }
    }

    #[test]
    fn delivers_by_kind_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = Bus::new();

        let l = log.clone();
        let _a = bus.subscribe(PingKind::A, move |e: &Ping| l.borrow_mut().push(format!("a:{e:?}")));
        let l = log.clone();
        let _all = bus.subscribe_all(move |e: &Ping| l.borrow_mut().push(format!("all:{e:?}")));

        assert_eq!(bus.publish(&Ping::A(1)), 2);
        assert_eq!(bus.publish(&Ping::B), 1);

        assert_eq!(
            *log.borrow(),
            vec!["a:A(1)", "all:A(1)", "all:B"]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = Bus::new();
        let c = count.clone();
        let sub = bus.subscribe(PingKind::B, move |_: &Ping| *c.borrow_mut() += 1);

        bus.publish(&Ping::B);
        assert!(bus.unsubscribe(sub));
        bus.publish(&Ping::B);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
