use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use log::trace;

pub type Callback<T> = Rc<dyn Fn(&T)>;
pub type SubscriptionId = u64;

struct Listeners<T> {
    next_id: SubscriptionId,
    callbacks: Vec<(SubscriptionId, Callback<T>)>,
}

/// Synchronous fan-out of events to subscribers on the same thread.
pub struct Channel<T: Debug> {
    listeners: Rc<RefCell<Listeners<T>>>,
}

impl<T: Debug> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<T: Debug> Channel<T> {
    pub fn new() -> (EventEmitter<T>, EventObserver<T>) {
        let channel = Channel {
            listeners: Rc::new(RefCell::new(Listeners {
                next_id: 0,
                callbacks: Vec::new(),
            })),
        };
        (
            EventEmitter {
                channel: channel.clone(),
            },
            EventObserver { channel },
        )
    }

    fn subscribe(&self, callback: Callback<T>) -> SubscriptionId {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.callbacks.push((id, callback));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.callbacks.len();
        listeners.callbacks.retain(|(existing, _)| *existing != id);
        listeners.callbacks.len() != before
    }

    fn emit(&self, event: &T) {
        // Snapshot so a callback may subscribe or unsubscribe while handling.
        let callbacks: Vec<Callback<T>> = self
            .listeners
            .borrow()
            .callbacks
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        trace!(target: "events", "Emitting to {} listeners: {:?}", callbacks.len(), event);
        for callback in callbacks {
            callback(event);
        }
    }
}

pub struct EventEmitter<T: Debug> {
    channel: Channel<T>,
}

impl<T: Debug> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

impl<T: Debug> Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.channel.listeners.borrow().callbacks.len();
        f.debug_struct("EventEmitter")
            .field("listeners", &listeners)
            .finish()
    }
}

impl<T: Debug> EventEmitter<T> {
    pub fn emit(&self, event: &T) {
        self.channel.emit(event);
    }
}

pub struct EventObserver<T: Debug> {
    channel: Channel<T>,
}

impl<T: Debug> Clone for EventObserver<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

impl<T: Debug> EventObserver<T> {
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        self.channel.subscribe(Rc::new(callback))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.channel.unsubscribe(id)
    }
}
