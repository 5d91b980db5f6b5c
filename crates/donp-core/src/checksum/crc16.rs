pub const POLYNOMIAL: u16 = 0xA001;
pub const SEED: u16 = 0xFFFF;
pub const FIELD_LEN: usize = 2;

/// Bit-reflected CRC-16 register as defined by Modbus (low byte sent first).
pub fn crc16_modbus(data: &[u8]) -> u16 {
    let mut crc = SEED;
    for byte in data {
        crc ^= u16::from(*byte);
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ POLYNOMIAL;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

/// CRC in frame order: packing the result big-endian yields the Modbus wire bytes.
pub fn calculate(data: &[u8]) -> u16 {
    crc16_modbus(data).swap_bytes()
}
