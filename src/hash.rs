/// A strategy mapping a key to an unsigned integer.
///
/// The table only needs a well-distributed number per key; collision
/// resistance is not required. Every `Fn(&str) -> u64` is a strategy, so
/// plain functions such as [`hash_djb2`] and closures can be passed directly
/// to [`LinearTable::with_hasher`].
///
/// [`LinearTable::with_hasher`]: crate::LinearTable::with_hasher
///
/// # Examples
///
/// ```rust
/// use linear_hash::KeyHasher;
/// use linear_hash::hash::Djb2;
///
/// let by_len = |key: &str| key.len() as u64;
/// assert_eq!(by_len.hash_key("abc"), 3);
/// assert_eq!(Djb2.hash_key(""), 5381);
/// ```
pub trait KeyHasher {
    /// Hash `key`. The home slot is this value modulo the table capacity.
    fn hash_key(&self, key: &str) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&str) -> u64,
{
    #[inline(always)]
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Sums the numeric value of every byte in `key`.
///
/// Anagrams and many short keys collide under this strategy, which makes it
/// useful for exercising collision handling.
///
/// ```rust
/// # use linear_hash::hash::hash_byte_sum;
/// assert_eq!(hash_byte_sum("04"), 100);
/// assert_eq!(hash_byte_sum("d"), 100);
/// ```
#[inline]
pub fn hash_byte_sum(key: &str) -> u64 {
    key.bytes()
        .fold(0u64, |hash, byte| hash.wrapping_add(byte as u64))
}

/// Additive DJB2: seed 5381, then `hash = hash + (hash << 5) + byte` for each
/// byte, wrapping at 64 bits.
///
/// This is the additive variant rather than the XOR one, and existing
/// expectations depend on the exact recurrence.
///
/// ```rust
/// # use linear_hash::hash::hash_djb2;
/// assert_eq!(hash_djb2("a"), 5381 * 33 + 97);
/// ```
#[inline]
pub fn hash_djb2(key: &str) -> u64 {
    key.bytes().fold(5381u64, |hash, byte| {
        hash.wrapping_add(hash << 5).wrapping_add(byte as u64)
    })
}

/// Additive byte-sum strategy. See [`hash_byte_sum`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteSum;

impl KeyHasher for ByteSum {
    #[inline(always)]
    fn hash_key(&self, key: &str) -> u64 {
        hash_byte_sum(key)
    }
}

/// DJB2 strategy. See [`hash_djb2`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Djb2;

impl KeyHasher for Djb2 {
    #[inline(always)]
    fn hash_key(&self, key: &str) -> u64 {
        hash_djb2(key)
    }
}

/// Strategy backed by [`foldhash`]'s fast fixed-seed hasher.
///
/// Deterministic for a given seed, and far better distributed than the two
/// reference strategies on real-world keys.
#[cfg(feature = "foldhash")]
#[derive(Clone, Default)]
pub struct FoldHash {
    state: foldhash::fast::FixedState,
}

#[cfg(feature = "foldhash")]
impl FoldHash {
    /// Creates a strategy whose output is fully determined by `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: foldhash::fast::FixedState::with_seed(seed),
        }
    }
}

#[cfg(feature = "foldhash")]
impl core::fmt::Debug for FoldHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FoldHash").finish_non_exhaustive()
    }
}

#[cfg(feature = "foldhash")]
impl KeyHasher for FoldHash {
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        use core::hash::BuildHasher;

        self.state.hash_one(key.as_bytes())
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The strategy used by [`LinearTable::new`](crate::LinearTable::new).
        ///
        /// [`FoldHash`] when the `foldhash` feature is enabled.
        pub type DefaultKeyHasher = FoldHash;
    } else {
        /// The strategy used by [`LinearTable::new`](crate::LinearTable::new).
        ///
        /// [`Djb2`] when the `foldhash` feature is disabled.
        pub type DefaultKeyHasher = Djb2;
    }
}
