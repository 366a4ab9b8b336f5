//! Digit-weighted bucket hash
//!
//! Keys are UUID-shaped, so the hash only looks at their decimal digits:
//! every digit is multiplied by its 1-based position among the digits, the
//! products are summed, and the sum is reduced modulo the table size. A key
//! without digits hashes as if its digit sequence were `"0"`.
//!
//! Only ASCII `0`-`9` count as digits. Other Unicode decimal digits, such as
//! full-width `３`, are skipped like any other non-digit character.
//!
//! The distribution is far from uniform. Persisted index files depend on the
//! exact bucket assignment, so the function must not change.

/// Returns the bucket for `key` in a table of `table_size` slots.
///
/// `table_size` must be non-zero; `HashIndex` guarantees it.
pub fn bucket_of(key: &str, table_size: usize) -> usize {
    debug_assert!(table_size > 0);

    // No digits sums to 0, the same value the "0" fallback produces.
    let weighted: u64 = key
        .chars()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, digit)| u64::from(digit) * (i as u64 + 1))
        .sum();

    (weighted % table_size as u64) as usize
}
