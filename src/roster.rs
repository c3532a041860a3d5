//! The user roster: a shared snapshot of all known users, distributed to
//! interested components through reference-counted subscriptions.
//!
//! The roster is fetched once per composer session and never mutated by
//! consumers; updates replace the whole snapshot. Snapshot data is retained
//! while components are subscribed and dropped automatically when the last
//! subscriber leaves.
//!
//! Unlike a global singleton, a [`RosterManager`] is owned by whoever
//! creates it and handed to components explicitly, so tests (and multiple
//! independent sessions) can each have their own.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::models::User;

/// Components implement this trait to receive roster updates.
pub trait RosterSubscriber: 'static + Send {
    /// Called when the roster snapshot is replaced.
    fn on_roster_updated(&mut self, users: Arc<Vec<User>>);
}

struct SubscriberEntry {
    subscriber: Arc<Mutex<dyn RosterSubscriber>>,
    id: u64,
}

#[derive(Default)]
struct RosterInner {
    /// The latest fetched snapshot, if any.
    users: Option<Arc<Vec<User>>>,
    subscribers: Vec<SubscriberEntry>,
    next_subscriber_id: u64,
}

/// Holds the latest roster snapshot and notifies subscribers of changes.
///
/// Cloning a `RosterManager` yields another handle to the same roster.
#[derive(Clone, Default)]
pub struct RosterManager {
    inner: Arc<Mutex<RosterInner>>,
}

impl RosterManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot, if one has been fetched.
    pub fn current(&self) -> Option<Arc<Vec<User>>> {
        self.inner.lock().unwrap().users.clone()
    }

    /// Replaces the roster snapshot and notifies all subscribers.
    ///
    /// An update whose membership (set of user IDs) is identical to the
    /// current snapshot is skipped, since nothing observable changed.
    pub fn update_roster(&self, users: Vec<User>) {
        let mut inner = self.inner.lock().unwrap();

        if let Some(existing) = &inner.users {
            let existing_ids: HashSet<_> = existing.iter().map(|u| u.user_id).collect();
            let new_ids: HashSet<_> = users.iter().map(|u| u.user_id).collect();
            if existing_ids == new_ids {
                info!("Skipping roster update ({} users, no membership change)", users.len());
                return;
            }
        }

        let shared = Arc::new(users);
        inner.users = Some(shared.clone());

        let to_notify: Vec<_> = inner
            .subscribers
            .iter()
            .map(|entry| entry.subscriber.clone())
            .collect();

        info!(
            "Updated roster to {} users, notifying {} subscribers",
            shared.len(),
            to_notify.len()
        );

        // Release the lock before running subscriber callbacks.
        drop(inner);

        for subscriber in to_notify {
            match subscriber.lock() {
                Ok(mut sub) => sub.on_roster_updated(shared.clone()),
                Err(_) => warn!("Unable to acquire roster subscriber lock"),
            }
        }
    }

    /// Subscribes to roster updates, returning the subscription ID.
    ///
    /// If a snapshot already exists, the new subscriber receives it
    /// immediately.
    pub fn subscribe(&self, subscriber: Arc<Mutex<dyn RosterSubscriber>>) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        let subscriber_id = inner.next_subscriber_id;
        inner.next_subscriber_id += 1;
        inner.subscribers.push(SubscriberEntry {
            subscriber: subscriber.clone(),
            id: subscriber_id,
        });
        let existing = inner.users.clone();
        drop(inner);

        if let Some(users) = existing {
            if let Ok(mut sub) = subscriber.lock() {
                sub.on_roster_updated(users);
            }
        }
        subscriber_id
    }

    /// Removes a subscription. When the last subscriber leaves, the
    /// snapshot is dropped.
    pub fn unsubscribe(&self, subscriber_id: u64) {
        let mut inner = self.inner.lock().unwrap();
        inner.subscribers.retain(|entry| entry.id != subscriber_id);
        if inner.subscribers.is_empty() {
            inner.users = None;
            info!("Dropped roster snapshot (no subscribers remain)");
        }
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap().subscribers.len()
    }
}

/// RAII guard for a roster subscription; unsubscribes on drop.
pub struct RosterSubscription {
    roster: RosterManager,
    subscription_id: u64,
    unsubscribed: bool,
}

impl RosterSubscription {
    pub fn new(roster: RosterManager, subscriber: Arc<Mutex<dyn RosterSubscriber>>) -> Self {
        let subscription_id = roster.subscribe(subscriber);
        Self { roster, subscription_id, unsubscribed: false }
    }

    /// Manually ends the subscription before drop.
    pub fn unsubscribe(&mut self) {
        if !self.unsubscribed {
            self.roster.unsubscribe(self.subscription_id);
            self.unsubscribed = true;
        }
    }
}

impl Drop for RosterSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
