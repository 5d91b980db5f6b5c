use log::warn;

/// Big-endian rendering of `value` into exactly `width` bytes.
///
/// Zero-padded on the left; values wider than the field keep their
/// low-order bytes.
pub fn pack_value(value: u64, width: usize) -> Vec<u8> {
    if width < 8 && value >> (8 * width) != 0 {
        warn!("Protocol: value {value:#X} does not fit in {width} byte(s), truncating");
    }
    (0..width)
        .rev()
        .map(|index| {
            let shift = 8 * index;
            if shift >= u64::BITS as usize {
                0
            } else {
                (value >> shift) as u8
            }
        })
        .collect()
}

/// Pack each value independently at the same per-value width.
pub fn pack_values(values: &[u64], width: usize, out: &mut Vec<u8>) {
    for value in values {
        out.extend(pack_value(*value, width));
    }
}

#[cfg(test)]
mod tests {
    use super::{pack_value, pack_values};

    #[test]
    fn pads_to_field_width() {
        assert_eq!(pack_value(10, 2), vec![0x00, 0x0A]);
        assert_eq!(pack_value(255, 1), vec![0xFF]);
        assert_eq!(pack_value(0x11, 4), vec![0x00, 0x00, 0x00, 0x11]);
    }

    #[test]
    fn wide_fields_are_zero_extended() {
        let packed = pack_value(0x0102, 10);
        assert_eq!(packed.len(), 10);
        assert_eq!(&packed[8..], &[0x01, 0x02]);
        assert!(packed[..8].iter().all(|b| *b == 0));
    }

    #[test]
    fn oversized_values_keep_low_bytes() {
        assert_eq!(pack_value(0x1234, 1), vec![0x34]);
    }

    #[test]
    fn zero_width_packs_nothing() {
        assert!(pack_value(7, 0).is_empty());
    }

    #[test]
    fn values_are_padded_independently() {
        let mut out = Vec::new();
        pack_values(&[0xAB, 0xCD], 2, &mut out);
        assert_eq!(out, vec![0x00, 0xAB, 0x00, 0xCD]);
    }
}
