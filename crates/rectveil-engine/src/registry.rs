#![forbid(unsafe_code)]

//! Identity-keyed weak registration of live rectangles.
//!
//! The registry is a side-table from rectangle identity to the notifier,
//! context, and policy accessor needed to fake that instance later. It
//! holds only `Weak` references: the registry is never the reason a
//! rectangle stays alive, and entries for dropped rectangles are pruned as
//! they are encountered.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::ContextId;
use crate::policy::PolicyAccessor;
use crate::tracked::TrackedRect;

/// Identity token for a tracked rectangle.
///
/// Derived from the allocation address; only meaningful while the `Rc` is
/// alive, which is why every match is re-validated against the live
/// pointer before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RectId(usize);

impl RectId {
    /// Identity of a live rectangle.
    pub fn of(rect: &Rc<TrackedRect>) -> Self {
        Self(Rc::as_ptr(rect) as usize)
    }
}

/// One-shot guard around the installer's notification callback.
///
/// Multiple property reads can resolve the same registered rectangle
/// before it materializes; the user-facing "value was faked" event must
/// still fire at most once per instance.
pub struct OneShotNotifier {
    fired: Cell<bool>,
    callback: Rc<dyn Fn(&str)>,
}

impl OneShotNotifier {
    /// Wrap a callback.
    pub fn new(callback: Rc<dyn Fn(&str)>) -> Self {
        Self {
            fired: Cell::new(false),
            callback,
        }
    }

    /// Fire the callback, at most once for this notifier's lifetime.
    pub fn notify(&self, key: &str) {
        if !self.fired.replace(true) {
            (self.callback)(key);
        }
    }

    /// True once the callback has fired.
    pub fn fired(&self) -> bool {
        self.fired.get()
    }
}

impl fmt::Debug for OneShotNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneShotNotifier")
            .field("fired", &self.fired.get())
            .finish_non_exhaustive()
    }
}

/// What a registration carries for later faking.
#[derive(Debug, Clone)]
pub struct Registration {
    /// One-shot notifier for this rectangle instance.
    pub notify: Rc<OneShotNotifier>,
    /// Context whose randomness stream and policy scope apply.
    pub context: ContextId,
    /// Policy accessor captured at registration time.
    pub policy: Rc<dyn PolicyAccessor>,
}

#[derive(Debug)]
struct RegistryEntry {
    rect: Weak<TrackedRect>,
    registration: Registration,
}

/// Side-table from rectangle identity to its registration.
#[derive(Debug, Default)]
pub struct RectRegistry {
    entries: RefCell<FxHashMap<RectId, RegistryEntry>>,
}

impl RectRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `rect` with a fresh one-shot notifier, context, and policy
    /// accessor. Replaces any prior entry for the same identity.
    pub fn register(
        &self,
        rect: &Rc<TrackedRect>,
        notify: Rc<dyn Fn(&str)>,
        context: ContextId,
        policy: Rc<dyn PolicyAccessor>,
    ) {
        let mut entries = self.entries.borrow_mut();
        entries.retain(|_, entry| entry.rect.strong_count() > 0);
        entries.insert(
            RectId::of(rect),
            RegistryEntry {
                rect: Rc::downgrade(rect),
                registration: Registration {
                    notify: Rc::new(OneShotNotifier::new(notify)),
                    context,
                    policy,
                },
            },
        );
    }

    /// Look up the registration for a live rectangle.
    ///
    /// A stale entry whose key address was reused by a new allocation is
    /// removed and treated as absent.
    pub fn lookup(&self, rect: &Rc<TrackedRect>) -> Option<Registration> {
        let id = RectId::of(rect);
        let mut entries = self.entries.borrow_mut();
        match entries.get(&id) {
            Some(entry) => match entry.rect.upgrade() {
                Some(live) if Rc::ptr_eq(&live, rect) => Some(entry.registration.clone()),
                _ => {
                    entries.remove(&id);
                    None
                }
            },
            None => None,
        }
    }

    /// Remove the association for `rect`. Used by the write path after
    /// materialization.
    pub fn unregister(&self, rect: &Rc<TrackedRect>) {
        self.entries.borrow_mut().remove(&RectId::of(rect));
    }

    /// Drop entries whose rectangles are gone.
    pub fn prune(&self) {
        self.entries
            .borrow_mut()
            .retain(|_, entry| entry.rect.strong_count() > 0);
    }

    /// Number of entries, including not-yet-pruned dead ones.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// True if no entries are held.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::SettingsPolicy;

    fn noop_notify() -> Rc<dyn Fn(&str)> {
        Rc::new(|_key: &str| {})
    }

    fn policy() -> Rc<dyn PolicyAccessor> {
        Rc::new(SettingsPolicy::default())
    }

    #[test]
    fn register_then_lookup() {
        let registry = RectRegistry::new();
        let rect = TrackedRect::mutable(1.0, 2.0, 3.0, 4.0);

        assert!(registry.lookup(&rect).is_none());
        registry.register(&rect, noop_notify(), ContextId(9), policy());

        let reg = registry.lookup(&rect).expect("registered");
        assert_eq!(reg.context, ContextId(9));
    }

    #[test]
    fn reregistering_replaces_the_entry() {
        let registry = RectRegistry::new();
        let rect = TrackedRect::mutable(0.0, 0.0, 0.0, 0.0);

        registry.register(&rect, noop_notify(), ContextId(1), policy());
        let first = registry.lookup(&rect).unwrap();
        first.notify.notify("fakedDOMRectReadout");
        assert!(first.notify.fired());

        // Overwrite brings a fresh one-shot notifier.
        registry.register(&rect, noop_notify(), ContextId(2), policy());
        let second = registry.lookup(&rect).unwrap();
        assert_eq!(second.context, ContextId(2));
        assert!(!second.notify.fired());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregister_removes_the_entry() {
        let registry = RectRegistry::new();
        let rect = TrackedRect::mutable(0.0, 0.0, 0.0, 0.0);

        registry.register(&rect, noop_notify(), ContextId(1), policy());
        registry.unregister(&rect);
        assert!(registry.lookup(&rect).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn dropped_rect_is_pruned() {
        let registry = RectRegistry::new();
        let rect = TrackedRect::mutable(0.0, 0.0, 0.0, 0.0);
        registry.register(&rect, noop_notify(), ContextId(1), policy());
        drop(rect);

        assert_eq!(registry.len(), 1);
        registry.prune();
        assert!(registry.is_empty());
    }

    #[test]
    fn register_sweeps_dead_entries() {
        let registry = RectRegistry::new();
        let dead = TrackedRect::mutable(0.0, 0.0, 0.0, 0.0);
        registry.register(&dead, noop_notify(), ContextId(1), policy());
        drop(dead);

        let live = TrackedRect::mutable(1.0, 1.0, 1.0, 1.0);
        registry.register(&live, noop_notify(), ContextId(1), policy());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn notifier_fires_once() {
        let count = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&count);
        let notifier = OneShotNotifier::new(Rc::new(move |_key| {
            seen.set(seen.get() + 1);
        }));

        notifier.notify("fakedDOMRectReadout");
        notifier.notify("fakedDOMRectReadout");
        notifier.notify("fakedDOMRectReadout");
        assert_eq!(count.get(), 1);
    }
}
