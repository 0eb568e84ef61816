use crate::backends::{BackendHandle, IDeliveryListener};
use dayfuse_domain::{ReminderEntry, ReminderKey, TaskId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

struct Slot {
    entry: ReminderEntry,
    handle: Option<BackendHandle>,
}

/// Every reminder the scheduler knows about, one slot per `ReminderKey`.
///
/// Fired entries stay in their slot until the key is cancelled or armed again.
#[derive(Default)]
pub struct ReminderLedger {
    slots: Mutex<HashMap<ReminderKey, Slot>>,
    generation: AtomicU64,
}

impl ReminderLedger {
    fn lock(&self) -> MutexGuard<'_, HashMap<ReminderKey, Slot>> {
        self.slots.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Stores an entry that is about to be armed. Callers cancel the key
    /// first, so any slot that is replaced here has no live handle.
    pub fn insert(&self, entry: ReminderEntry) {
        self.lock()
            .insert(entry.key.clone(), Slot { entry, handle: None });
    }

    /// Attaches the backend handle once arming succeeded. Returns false when
    /// the entry already fired or was replaced, the handle is then dropped.
    pub fn attach(&self, key: &ReminderKey, generation: u64, handle: BackendHandle) -> bool {
        match self.lock().get_mut(key) {
            Some(slot) if slot.entry.generation == generation && slot.entry.is_pending() => {
                slot.handle = Some(handle);
                true
            }
            _ => false,
        }
    }

    /// Drops the entry of a failed arm attempt
    pub fn discard(&self, key: &ReminderKey, generation: u64) {
        let mut slots = self.lock();
        if matches!(slots.get(key), Some(slot) if slot.entry.generation == generation) {
            slots.remove(key);
        }
    }

    /// Removes the slot, returning the handle to disarm if the entry was still pending
    pub fn cancel(&self, key: &ReminderKey) -> Option<(ReminderEntry, BackendHandle)> {
        let Slot { mut entry, handle } = self.lock().remove(key)?;
        if entry.cancel() {
            handle.map(|handle| (entry, handle))
        } else {
            None
        }
    }

    /// Marks the current entry under `key` fired. Ignored when the entry has
    /// been replaced by a newer generation in the meantime.
    pub fn fire(&self, key: &ReminderKey, generation: u64) -> bool {
        let mut slots = self.lock();
        match slots.get_mut(key) {
            Some(slot) if slot.entry.generation == generation => {
                let fired = slot.entry.fire();
                if fired {
                    slot.handle = None;
                }
                fired
            }
            _ => {
                debug!("Ignoring delivery of stale reminder {}", key);
                false
            }
        }
    }

    /// Marks whatever entry is current under `key` fired
    pub fn fire_current(&self, key: &ReminderKey) -> bool {
        let generation = match self.entry(key) {
            Some(entry) => entry.generation,
            None => return false,
        };
        self.fire(key, generation)
    }

    pub fn entry(&self, key: &ReminderKey) -> Option<ReminderEntry> {
        self.lock().get(key).map(|slot| slot.entry.clone())
    }

    pub fn pending(&self, task_id: &TaskId) -> Vec<ReminderEntry> {
        let mut entries = ReminderKey::all_for(task_id)
            .iter()
            .filter_map(|key| self.entry(key))
            .filter(|entry| entry.is_pending())
            .collect::<Vec<_>>();
        entries.sort_by_key(|entry| entry.trigger_at);
        entries
    }
}

impl IDeliveryListener for ReminderLedger {
    fn delivered(&self, key: &ReminderKey, generation: u64) {
        self.fire(key, generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::payload;
    use dayfuse_domain::{Channel, ReminderState};

    fn entry(ledger: &ReminderLedger, key: ReminderKey) -> ReminderEntry {
        ReminderEntry {
            payload: payload(key.task_id.as_str()),
            key,
            trigger_at: 100,
            channel: Channel::NativeOs,
            state: ReminderState::Pending,
            generation: ledger.next_generation(),
        }
    }

    #[test]
    fn stale_delivery_is_ignored() {
        let ledger = ReminderLedger::default();
        let key = ReminderKey::primary(&"task".into());
        let old = entry(&ledger, key.clone());
        ledger.insert(old.clone());
        assert!(ledger.attach(&key, old.generation, BackendHandle::Native("task".into())));
        ledger.cancel(&key);
        let new = entry(&ledger, key.clone());
        ledger.insert(new.clone());
        assert!(!ledger.attach(&key, old.generation, BackendHandle::Native("task".into())));

        assert!(!ledger.fire(&key, old.generation));
        assert_eq!(ledger.pending(&"task".into()).len(), 1);
        assert!(ledger.fire(&key, new.generation));
        assert!(ledger.pending(&"task".into()).is_empty());
        assert_eq!(
            ledger.entry(&key).map(|e| e.state),
            Some(ReminderState::Fired)
        );
    }

    #[test]
    fn cancel_hands_back_only_pending_handles() {
        let ledger = ReminderLedger::default();
        let key = ReminderKey::primary(&"task".into());
        assert!(ledger.cancel(&key).is_none());

        let e = entry(&ledger, key.clone());
        let generation = e.generation;
        ledger.insert(e);
        ledger.attach(&key, generation, BackendHandle::Native("task".into()));
        assert!(ledger.fire_current(&key));
        assert!(ledger.cancel(&key).is_none());
        assert!(ledger.entry(&key).is_none());
    }

    #[test]
    fn delivery_before_attach_is_kept() {
        let ledger = ReminderLedger::default();
        let key = ReminderKey::primary(&"task".into());
        let e = entry(&ledger, key.clone());
        let generation = e.generation;
        ledger.insert(e);

        assert!(ledger.fire(&key, generation));
        assert!(!ledger.attach(&key, generation, BackendHandle::Native("task".into())));
        assert_eq!(
            ledger.entry(&key).map(|e| e.state),
            Some(ReminderState::Fired)
        );
    }
}
