use thiserror::Error;

/// Errors reported by [`LinearTable`](crate::LinearTable).
///
/// A missing key is not an error; lookups and deletions report it as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// The key slot array could not be allocated.
    #[error("failed to allocate key slots for a table of capacity {capacity}")]
    KeysAllocation {
        /// Requested capacity.
        capacity: usize,
    },
    /// The value slot array could not be allocated.
    #[error("failed to allocate value slots for a table of capacity {capacity}")]
    ValuesAllocation {
        /// Requested capacity.
        capacity: usize,
    },
    /// Every slot holds a live entry, so a new key cannot be stored.
    ///
    /// The table is left untouched. Construct a larger table up front if this
    /// is reachable in practice.
    #[error("table is full ({capacity} live entries)")]
    Full {
        /// Capacity of the table that rejected the insert.
        capacity: usize,
    },
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages_name_the_failing_resource() {
        assert_eq!(
            TableError::KeysAllocation { capacity: 8 }.to_string(),
            "failed to allocate key slots for a table of capacity 8"
        );
        assert_eq!(
            TableError::ValuesAllocation { capacity: 8 }.to_string(),
            "failed to allocate value slots for a table of capacity 8"
        );
        assert_eq!(
            TableError::Full { capacity: 3 }.to_string(),
            "table is full (3 live entries)"
        );
    }
}
