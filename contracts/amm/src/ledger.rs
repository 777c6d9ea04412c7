use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::AmmError;

/// Key-value store whose writes are range checked before being committed.
///
/// Absent keys read as zero. Entries are never deleted, a key written once stays present even
/// when its value goes back to zero.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BoundedLedger<K: Ord> {
    entries: BTreeMap<K, u128>,
}

impl<K: Ord> Default for BoundedLedger<K> {
    fn default() -> Self {
        BoundedLedger {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord> BoundedLedger<K> {
    pub fn read(&self, key: &K) -> u128 {
        self.entries.get(key).copied().unwrap_or(0)
    }

    /// Stores `value` under `key` if it lies within `bounds`. Leaves the ledger untouched
    /// otherwise.
    pub fn write(
        &mut self,
        key: K,
        value: i128,
        bounds: RangeInclusive<u128>,
    ) -> Result<(), AmmError> {
        let value = check_bounds(value, &bounds)?;
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u128)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }
}

/// Amounts too large for `i128` saturate, which every bound then rejects.
pub(crate) fn as_value(amount: u128) -> i128 {
    i128::try_from(amount).unwrap_or(i128::MAX)
}

pub fn check_bounds(value: i128, bounds: &RangeInclusive<u128>) -> Result<u128, AmmError> {
    let out_of_range = || AmmError::OutOfRange {
        value,
        min: *bounds.start(),
        max: *bounds.end(),
    };
    let unsigned = u128::try_from(value).map_err(|_| out_of_range())?;
    if !bounds.contains(&unsigned) {
        return Err(out_of_range());
    }
    Ok(unsigned)
}
