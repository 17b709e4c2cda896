//! Flash memory layout constants shared by the encoder and merger.

/// Start of the flash region the base firmware occupies.
pub const FLASH_BASE: u32 = 0x1000_0000;
/// Size of the base firmware's flash region.
pub const FLASH_SIZE: u32 = 0x0008_0000;
/// Fixed offset at which the base firmware expects to find the wrapped payload.
pub const PAYLOAD_BASE: u32 = 0x1008_0000;
/// Size of the region reserved for the payload.
pub const PAYLOAD_REGION_SIZE: u32 = 0x0018_0000;
