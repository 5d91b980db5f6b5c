pub const ROOT: &str = "protocol";

pub const PROTOTYPE: &str = "prototype";
pub const DEVICE: &str = "device";
pub const PREFIX: &str = "prefix";
pub const SUFFIX: &str = "suffix";
pub const TIMEOUT: &str = "timeout";
pub const SOURCE_ADDRESS: &str = "source_address";
pub const TRANSMISSION_MODE: &str = "transmission_mode";
pub const CHECKSUM_CALCULATION: &str = "checksum_calculation";

pub const NAME: &str = "name";
pub const DESC: &str = "desc";
pub const BITS: &str = "bits";
pub const TRANSMIT: &str = "transmit";
pub const RECEIVE: &str = "receive";
pub const ADDRESS: &str = "address";
pub const MESSAGE: &str = "message";

pub const DATA_TYPE: &str = "data_type";
pub const LENGTH: &str = "length";

pub const DEFAULT_TRANSMISSION_MODE: &str = "hex";
pub const DEFAULT_CHECKSUM_CALCULATION: &str = "CRC16";

pub const MAX_SEGMENT_BITS: u64 = 255;
