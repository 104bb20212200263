//! The fixed-capacity linear probing table.
//!
//! See [`LinearTable`] for the full API.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use log::debug;
use log::trace;
use log::warn;

use crate::error::TableError;
use crate::hash::DefaultKeyHasher;
use crate::hash::KeyHasher;

/// Reserved index meaning "no such key".
///
/// Never a valid slot index: construction rejects any capacity that is not
/// strictly below it. Returned by [`LinearTable::index_of_raw`].
pub const NOT_FOUND: usize = usize::MAX;

#[inline(always)]
fn next_index(index: usize, capacity: usize) -> usize {
    let next = index + 1;
    if next == capacity { 0 } else { next }
}

fn alloc_slots<T: Clone>(
    capacity: usize,
    fill: T,
    err: TableError,
) -> Result<Box<[T]>, TableError> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity).map_err(|_| err)?;
    slots.resize(capacity, fill);
    Ok(slots.into_boxed_slice())
}

/// State of a single key slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    /// Never used since construction or the last [`LinearTable::clear`].
    /// Terminates lookups.
    Empty,
    /// Holds a live key.
    Occupied(&'a str),
    /// Held a key that has since been deleted. Lookups probe past it, and
    /// inserts may reuse it.
    Tombstone,
}

/// A fixed-capacity table mapping borrowed string keys to borrowed values.
///
/// Collisions are resolved by open addressing with linear probing, and
/// deletions leave tombstones so that every remaining key stays reachable
/// from its home slot (`hash(key) % capacity`). The slot arrays are allocated
/// once in [`with_hasher`](Self::with_hasher) and never grow: once `capacity`
/// live entries are stored, inserting a new key reports
/// [`TableError::Full`].
///
/// The table stores references only. Keys and values are owned by the
/// caller and must outlive the table, which the `'a` lifetime enforces.
///
/// There is no internal synchronization. Mutation takes `&mut self`, so
/// sharing a table between threads for writing requires wrapping the whole
/// table in a lock.
///
/// ## Example
///
/// ```rust
/// use linear_hash::LinearTable;
/// use linear_hash::hash::Djb2;
///
/// let mut table: LinearTable<'_, str, _> = LinearTable::with_hasher(256, Djb2)?;
///
/// table.set("First", "Your value")?;
/// table.set("Second", "Test value")?;
///
/// assert_eq!(table.get("First"), Some("Your value"));
/// assert_eq!(table.get("Unknown"), None);
///
/// assert_eq!(table.del("First"), Some("Your value"));
/// assert!(!table.has("First"));
/// assert!(table.has("Second"));
/// # Ok::<(), linear_hash::TableError>(())
/// ```
pub struct LinearTable<'a, V: ?Sized, H = DefaultKeyHasher> {
    keys: Box<[Slot<'a>]>,
    values: Box<[Option<&'a V>]>,

    populated: usize,
    tombstones: usize,

    hasher: H,
}

impl<V: ?Sized, H> Debug for LinearTable<'_, V, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::ToString;

        f.debug_struct("LinearTable")
            .field(
                "slots",
                &self
                    .keys
                    .iter()
                    .map(|slot| match slot {
                        Slot::Empty => "..".to_string(),
                        Slot::Tombstone => "##".to_string(),
                        Slot::Occupied(key) => format!("{key:?}"),
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
            )
            .field("populated", &self.populated)
            .field("tombstones", &self.tombstones)
            .field("capacity", &self.keys.len())
            .finish()
    }
}

impl<V: ?Sized, H> Clone for LinearTable<'_, V, H>
where
    H: Clone,
{
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            values: self.values.clone(),
            populated: self.populated,
            tombstones: self.tombstones,
            hasher: self.hasher.clone(),
        }
    }
}

impl<'a, V: ?Sized> LinearTable<'a, V, DefaultKeyHasher> {
    /// Creates a table with `capacity` slots using the default strategy.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or not below [`NOT_FOUND`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linear_hash::LinearTable;
    /// #
    /// let table: LinearTable<'_, u32> = LinearTable::new(64)?;
    /// assert_eq!(table.capacity(), 64);
    /// assert!(table.is_empty());
    /// # Ok::<(), linear_hash::TableError>(())
    /// ```
    pub fn new(capacity: usize) -> Result<Self, TableError> {
        Self::with_hasher(capacity, DefaultKeyHasher::default())
    }
}

impl<'a, V: ?Sized, H> LinearTable<'a, V, H>
where
    H: KeyHasher,
{
    /// Creates a table with exactly `capacity` slots, all empty, hashing keys
    /// with `hasher`.
    ///
    /// This is the only allocation the table ever performs. Fails if either
    /// slot array cannot be allocated, naming the one that failed.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or not below [`NOT_FOUND`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linear_hash::LinearTable;
    /// # use linear_hash::hash::hash_byte_sum;
    /// #
    /// let table: LinearTable<'_, str, _> = LinearTable::with_hasher(100, hash_byte_sum)?;
    /// assert_eq!(table.capacity(), 100);
    /// # Ok::<(), linear_hash::TableError>(())
    /// ```
    pub fn with_hasher(capacity: usize, hasher: H) -> Result<Self, TableError> {
        assert!(capacity > 0, "capacity must be positive");
        assert!(
            capacity < NOT_FOUND,
            "capacity must be below the NOT_FOUND sentinel"
        );

        let keys = alloc_slots(capacity, Slot::Empty, TableError::KeysAllocation { capacity })?;
        let values = alloc_slots(capacity, None, TableError::ValuesAllocation { capacity })?;

        debug!("created linear table with {capacity} slots");

        Ok(Self {
            keys,
            values,
            populated: 0,
            tombstones: 0,
            hasher,
        })
    }

    #[inline(always)]
    fn home_index(&self, key: &str) -> usize {
        (self.hasher.hash_key(key) % self.keys.len() as u64) as usize
    }

    /// Stores `value` under `key`.
    ///
    /// If `key` is already present its value is replaced in place and the
    /// previous value returned. Otherwise the entry goes into the first
    /// tombstone on the key's probe path, or the empty slot that ends it.
    ///
    /// Fails with [`TableError::Full`] when `key` is new and every slot
    /// already holds a live entry. The table is not modified in that case.
    ///
    /// # Panics
    ///
    /// Panics if `key` is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linear_hash::LinearTable;
    /// # use linear_hash::TableError;
    /// # use linear_hash::hash::Djb2;
    /// #
    /// let mut table: LinearTable<'_, i32, _> = LinearTable::with_hasher(2, Djb2)?;
    ///
    /// assert_eq!(table.set("a", &1)?, None);
    /// assert_eq!(table.set("a", &10)?, Some(&1));
    /// assert_eq!(table.set("b", &2)?, None);
    ///
    /// assert_eq!(table.set("c", &3), Err(TableError::Full { capacity: 2 }));
    /// assert_eq!(table.len(), 2);
    /// # Ok::<(), TableError>(())
    /// ```
    pub fn set(&mut self, key: &'a str, value: &'a V) -> Result<Option<&'a V>, TableError> {
        assert!(!key.is_empty(), "keys must be non-empty");

        let capacity = self.keys.len();
        let mut index = self.home_index(key);
        let mut first_tombstone = None;
        let mut first_empty = None;

        for _ in 0..capacity {
            match self.keys[index] {
                Slot::Empty => {
                    first_empty = Some(index);
                    break;
                }
                Slot::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Slot::Occupied(existing) if existing == key => {
                    return Ok(self.values[index].replace(value));
                }
                Slot::Occupied(_) => {}
            }
            index = next_index(index, capacity);
        }

        let target = match first_tombstone.or(first_empty) {
            Some(target) if self.populated < capacity => target,
            _ => {
                warn!("rejected insert of {key:?}: all {capacity} slots are live");
                return Err(TableError::Full { capacity });
            }
        };

        if self.keys[target] == Slot::Tombstone {
            trace!("reusing tombstone at slot {target} for {key:?}");
            self.tombstones -= 1;
        }

        self.keys[target] = Slot::Occupied(key);
        self.values[target] = Some(value);
        self.populated += 1;

        Ok(None)
    }

    /// Returns the slot index holding `key`, or `None` if it is absent.
    ///
    /// Probing starts at the key's home slot, steps past tombstones and
    /// other keys, and stops at the first empty slot. At most `capacity`
    /// slots are inspected, so a table with no empty slot left still
    /// terminates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linear_hash::LinearTable;
    /// # use linear_hash::hash::ByteSum;
    /// #
    /// let mut table: LinearTable<'_, str, _> = LinearTable::with_hasher(100, ByteSum)?;
    /// table.set("04", "value0")?;
    /// table.set("22", "value1")?;
    ///
    /// assert_eq!(table.index_of("04"), Some(0));
    /// assert_eq!(table.index_of("22"), Some(1));
    /// assert_eq!(table.index_of("d"), None);
    /// # Ok::<(), linear_hash::TableError>(())
    /// ```
    pub fn index_of(&self, key: &str) -> Option<usize> {
        if self.populated == 0 {
            return None;
        }

        let capacity = self.keys.len();
        let mut index = self.home_index(key);
        for _ in 0..capacity {
            match self.keys[index] {
                Slot::Empty => return None,
                Slot::Occupied(existing) if existing == key => return Some(index),
                Slot::Occupied(_) | Slot::Tombstone => {}
            }
            index = next_index(index, capacity);
        }

        None
    }

    /// Like [`index_of`](Self::index_of), but reports absence as
    /// [`NOT_FOUND`].
    #[inline]
    pub fn index_of_raw(&self, key: &str) -> usize {
        self.index_of(key).unwrap_or(NOT_FOUND)
    }

    /// Returns the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linear_hash::LinearTable;
    /// #
    /// let mut table: LinearTable<'_, str> = LinearTable::new(8)?;
    /// table.set("key", "value")?;
    ///
    /// assert_eq!(table.get("key"), Some("value"));
    /// assert_eq!(table.get("other"), None);
    /// # Ok::<(), linear_hash::TableError>(())
    /// ```
    #[inline]
    pub fn get(&self, key: &str) -> Option<&'a V> {
        self.index_of(key).and_then(|index| self.values[index])
    }

    /// Returns `true` if `key` is present.
    #[inline]
    pub fn has(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    /// Removes `key`, returning the value it held.
    ///
    /// The slot becomes a tombstone rather than empty, so keys that probed
    /// past it on insertion remain reachable. Returns `None` without touching
    /// the table if `key` is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linear_hash::LinearTable;
    /// # use linear_hash::hash::ByteSum;
    /// #
    /// // "04" and "22" share a home slot, so "22" lands one slot further on.
    /// let mut table: LinearTable<'_, str, _> = LinearTable::with_hasher(100, ByteSum)?;
    /// table.set("04", "value0")?;
    /// table.set("22", "value1")?;
    ///
    /// assert_eq!(table.del("04"), Some("value0"));
    /// assert_eq!(table.del("04"), None);
    /// assert_eq!(table.get("22"), Some("value1"));
    /// # Ok::<(), linear_hash::TableError>(())
    /// ```
    pub fn del(&mut self, key: &str) -> Option<&'a V> {
        let index = self.index_of(key)?;

        trace!("deleting {key:?} from slot {index}");

        self.keys[index] = Slot::Tombstone;
        self.populated -= 1;
        self.tombstones += 1;

        self.values[index].take()
    }
}

impl<'a, V: ?Sized, H> LinearTable<'a, V, H> {
    /// Returns the number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no live entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns `true` if every slot holds a live entry, meaning any new key
    /// will be rejected.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.populated == self.keys.len()
    }

    /// Returns the fixed number of slots chosen at construction.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.keys.len()
    }

    /// Returns the number of tombstone slots left by deletions and not yet
    /// reused.
    #[inline]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns the hash strategy.
    #[inline]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Returns the state of the slot at `index`, or `None` if `index` is out
    /// of range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linear_hash::LinearTable;
    /// # use linear_hash::Slot;
    /// # use linear_hash::hash::ByteSum;
    /// #
    /// let mut table: LinearTable<'_, u8, _> = LinearTable::with_hasher(4, ByteSum)?;
    /// table.set("a", &1)?; // 97 % 4 == 1
    /// table.del("a");
    ///
    /// assert_eq!(table.slot(0), Some(Slot::Empty));
    /// assert_eq!(table.slot(1), Some(Slot::Tombstone));
    /// assert_eq!(table.slot(4), None);
    /// # Ok::<(), linear_hash::TableError>(())
    /// ```
    #[inline]
    pub fn slot(&self, index: usize) -> Option<Slot<'a>> {
        self.keys.get(index).copied()
    }

    /// Resets every slot, tombstones included, to empty.
    pub fn clear(&mut self) {
        debug!(
            "clearing linear table ({} live, {} tombstones)",
            self.populated, self.tombstones
        );

        self.keys.fill(Slot::Empty);
        self.values.fill(None);
        self.populated = 0;
        self.tombstones = 0;
    }

    /// Returns an iterator over live `(key, value)` pairs in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linear_hash::LinearTable;
    /// # use linear_hash::hash::ByteSum;
    /// #
    /// let mut table: LinearTable<'_, str, _> = LinearTable::with_hasher(100, ByteSum)?;
    /// table.set("b", "two")?;
    /// table.set("a", "one")?;
    ///
    /// let entries: Vec<_> = table.iter().collect();
    /// assert_eq!(entries, [("a", "one"), ("b", "two")]);
    /// # Ok::<(), linear_hash::TableError>(())
    /// ```
    pub fn iter(&self) -> Iter<'_, 'a, V, H> {
        Iter {
            table: self,
            index: 0,
            remaining: self.populated,
        }
    }

    /// Writes every slot, one per line, followed by the live entry count.
    ///
    /// Occupied slots show the key and the address of the value; empty and
    /// tombstone slots show only their state. Nothing in the table changes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linear_hash::LinearTable;
    /// # use linear_hash::hash::ByteSum;
    /// #
    /// let mut table: LinearTable<'_, str, _> = LinearTable::with_hasher(2, ByteSum)?;
    /// table.set("b", "value")?; // 98 % 2 == 0
    ///
    /// let mut out = String::new();
    /// table.dump(&mut out).unwrap();
    /// assert!(out.starts_with("0\toccupied\tb\t0x"));
    /// assert!(out.ends_with("1\tempty\nNumber of items: 1\n"));
    /// # Ok::<(), linear_hash::TableError>(())
    /// ```
    pub fn dump<W: core::fmt::Write>(&self, out: &mut W) -> core::fmt::Result {
        for (index, (slot, value)) in self.keys.iter().zip(self.values.iter()).enumerate() {
            match (slot, value) {
                (Slot::Occupied(key), Some(value)) => {
                    writeln!(out, "{index}\toccupied\t{key}\t{:p}", *value)?
                }
                (Slot::Occupied(key), None) => writeln!(out, "{index}\toccupied\t{key}\t-")?,
                (Slot::Empty, _) => writeln!(out, "{index}\tempty")?,
                (Slot::Tombstone, _) => writeln!(out, "{index}\ttombstone")?,
            }
        }
        writeln!(out, "Number of items: {}", self.populated)
    }

    /// Prints [`dump`](Self::dump) output to stdout.
    #[cfg(feature = "std")]
    pub fn print_dump(&self) {
        let mut out = alloc::string::String::new();
        // Writing into a String cannot fail.
        let _ = self.dump(&mut out);
        print!("{out}");
    }
}

/// Iterator over the live entries of a [`LinearTable`], created by
/// [`LinearTable::iter`].
pub struct Iter<'t, 'a, V: ?Sized, H> {
    table: &'t LinearTable<'a, V, H>,
    index: usize,
    remaining: usize,
}

impl<'a, V: ?Sized, H> Iterator for Iter<'_, 'a, V, H> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 && self.index < self.table.keys.len() {
            let index = self.index;
            self.index += 1;

            if let (Slot::Occupied(key), Some(value)) =
                (self.table.keys[index], self.table.values[index])
            {
                self.remaining -= 1;
                return Some((key, value));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V: ?Sized, H> ExactSizeIterator for Iter<'_, '_, V, H> {}

impl<'t, 'a, V: ?Sized, H> IntoIterator for &'t LinearTable<'a, V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'t, 'a, V, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Displacement histogram of the live entries in a table.
///
/// Bin `d` counts entries stored `d` slots past their home slot.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    bins: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Entry counts indexed by displacement. Empty if the table is empty.
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    /// Largest displacement of any live entry, or `None` for an empty table.
    pub fn max_displacement(&self) -> Option<usize> {
        self.bins.len().checked_sub(1)
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total: usize = self.bins.iter().sum();
        println!("probe histogram ({total} entries):");

        for (displacement, &count) in self.bins.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{displacement:>4} | {} ({count})", "█".repeat(width));
        }
    }
}

/// Occupancy statistics for analysing clustering.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live entries
    pub populated: usize,
    /// Number of tombstone slots
    pub tombstones: usize,
    /// Number of never-used slots
    pub empty_slots: usize,
    /// Total number of slots
    pub capacity: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Largest distance of a live entry from its home slot
    pub max_displacement: usize,
    /// Mean distance of live entries from their home slots
    pub mean_displacement: f64,
    /// Total memory in bytes used by both slot arrays
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Linear Table Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slots: {} empty, {} tombstones",
            self.empty_slots, self.tombstones
        );
        println!(
            "Displacement: max {}, mean {:.3}",
            self.max_displacement, self.mean_displacement
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

#[cfg(any(test, feature = "stats"))]
impl<'a, V: ?Sized, H> LinearTable<'a, V, H>
where
    H: KeyHasher,
{
    fn displacements(&self) -> impl Iterator<Item = usize> {
        let capacity = self.keys.len();
        self.keys
            .iter()
            .enumerate()
            .filter_map(move |(index, slot)| match slot {
                Slot::Occupied(key) => {
                    Some((index + capacity - self.home_index(key)) % capacity)
                }
                _ => None,
            })
    }

    /// Computes how far each live entry sits from its home slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linear_hash::LinearTable;
    /// # use linear_hash::hash::ByteSum;
    /// #
    /// let mut table: LinearTable<'_, str, _> = LinearTable::with_hasher(100, ByteSum)?;
    /// for key in ["04", "22", "d"] {
    ///     table.set(key, key)?;
    /// }
    /// assert_eq!(table.probe_histogram().bins(), [1, 1, 1]);
    /// # Ok::<(), linear_hash::TableError>(())
    /// ```
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut bins = Vec::new();
        for displacement in self.displacements() {
            if bins.len() <= displacement {
                bins.resize(displacement + 1, 0);
            }
            bins[displacement] += 1;
        }
        ProbeHistogram { bins }
    }

    /// Returns occupancy and displacement statistics.
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.keys.len();
        let (max_displacement, total_displacement) = self
            .displacements()
            .fold((0, 0), |(max, sum), d| (max.max(d), sum + d));

        DebugStats {
            populated: self.populated,
            tombstones: self.tombstones,
            empty_slots: capacity - self.populated - self.tombstones,
            capacity,
            load_factor: self.populated as f64 / capacity as f64,
            max_displacement,
            mean_displacement: if self.populated == 0 {
                0.0
            } else {
                total_displacement as f64 / self.populated as f64
            },
            total_bytes: capacity
                * (core::mem::size_of::<Slot<'a>>() + core::mem::size_of::<Option<&'a V>>()),
        }
    }
}
