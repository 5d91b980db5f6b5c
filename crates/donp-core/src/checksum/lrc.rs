pub const FIELD_LEN: usize = 1;

/// Two's complement of the 8-bit sum of `data`.
pub fn calculate(data: &[u8]) -> u8 {
    data.iter()
        .fold(0u8, |sum, byte| sum.wrapping_add(*byte))
        .wrapping_neg()
}
