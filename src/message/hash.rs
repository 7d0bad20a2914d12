//! Process-long-lived rolling callsign hash table.
//!
//! Structured like the teacher's `message/callsign_cache.rs` (separate maps
//! per hash width so a lookup never has to guess which width a given
//! candidate carries), but the eviction policy is deliberately different:
//! the teacher evicts by FIFO insertion order capped at a fixed count, this
//! table evicts by age. Entries are stamped with `Instant::now()` on insert
//! and swept out once they're older than `max_age` (default one hour).

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::message::callsign::hash_callsign;

struct Entry {
    callsign: String,
    inserted_at: Instant,
}

struct Tables {
    by_n22: HashMap<u32, Entry>,
    by_n12: HashMap<u16, Entry>,
    by_n10: HashMap<u16, Entry>,
}

impl Tables {
    fn new() -> Self {
        Tables { by_n22: HashMap::new(), by_n12: HashMap::new(), by_n10: HashMap::new() }
    }
}

/// A shared, age-evicting callsign hash table.
pub struct CallsignHashTable {
    max_age: Duration,
    tables: RwLock<Tables>,
}

impl CallsignHashTable {
    pub fn new(max_age: Duration) -> Self {
        CallsignHashTable { max_age, tables: RwLock::new(Tables::new()) }
    }

    /// Record a decoded callsign under all three hash widths.
    pub fn insert(&self, callsign: &str) {
        let hashes = hash_callsign(callsign);
        let now = Instant::now();
        let mut tables = self.tables.write().expect("callsign hash table poisoned");
        tables.by_n22.insert(hashes.n22, Entry { callsign: callsign.to_string(), inserted_at: now });
        tables.by_n12.insert(hashes.n12, Entry { callsign: callsign.to_string(), inserted_at: now });
        tables.by_n10.insert(hashes.n10, Entry { callsign: callsign.to_string(), inserted_at: now });
    }

    pub fn lookup_n22(&self, n22: u32) -> Option<String> {
        let tables = self.tables.read().expect("callsign hash table poisoned");
        self.resolve(tables.by_n22.get(&n22))
    }

    pub fn lookup_n12(&self, n12: u16) -> Option<String> {
        let tables = self.tables.read().expect("callsign hash table poisoned");
        self.resolve(tables.by_n12.get(&n12))
    }

    pub fn lookup_n10(&self, n10: u16) -> Option<String> {
        let tables = self.tables.read().expect("callsign hash table poisoned");
        self.resolve(tables.by_n10.get(&n10))
    }

    fn resolve(&self, entry: Option<&Entry>) -> Option<String> {
        let entry = entry?;
        if entry.inserted_at.elapsed() > self.max_age {
            return None;
        }
        Some(entry.callsign.clone())
    }

    /// Drop every entry older than `max_age`. Called on demand, not on a
    /// background timer; the table is mutated by a single decode pass at a
    /// time.
    pub fn evict_expired(&self) {
        let mut tables = self.tables.write().expect("callsign hash table poisoned");
        let max_age = self.max_age;
        tables.by_n22.retain(|_, e| e.inserted_at.elapsed() <= max_age);
        tables.by_n12.retain(|_, e| e.inserted_at.elapsed() <= max_age);
        tables.by_n10.retain(|_, e| e.inserted_at.elapsed() <= max_age);
    }
}

impl Default for CallsignHashTable {
    fn default() -> Self {
        CallsignHashTable::new(Duration::from_secs(3600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserted_callsign_is_found_by_all_three_widths() {
        let table = CallsignHashTable::default();
        table.insert("N0YPR");
        let h = hash_callsign("N0YPR");
        assert_eq!(table.lookup_n22(h.n22).as_deref(), Some("N0YPR"));
        assert_eq!(table.lookup_n12(h.n12).as_deref(), Some("N0YPR"));
        assert_eq!(table.lookup_n10(h.n10).as_deref(), Some("N0YPR"));
    }

    #[test]
    fn unknown_hash_misses() {
        let table = CallsignHashTable::default();
        assert_eq!(table.lookup_n22(0xABCDEF), None);
    }

    #[test]
    fn entries_older_than_max_age_are_not_returned() {
        let table = CallsignHashTable::new(Duration::from_secs(0));
        table.insert("K1ABC");
        let h = hash_callsign("K1ABC");
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(table.lookup_n22(h.n22), None);
    }

    #[test]
    fn evict_expired_removes_stale_entries() {
        let table = CallsignHashTable::new(Duration::from_secs(0));
        table.insert("VE3ABC");
        std::thread::sleep(Duration::from_millis(5));
        table.evict_expired();
        let tables = table.tables.read().unwrap();
        assert!(tables.by_n22.is_empty());
    }
}
