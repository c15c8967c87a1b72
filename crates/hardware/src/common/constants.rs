//! BCM283x GPIO register layout.
//!
//! Byte offsets are relative to the start of the GPIO register block, which is
//! what `/dev/gpiomem` maps at file offset 0.

/// Number of GPIO lines on the BCM2835/6/7 (BCM 0..=53).
pub const PIN_COUNT: u8 = 54;

/// Size in bytes of one register word.
pub const WORD_SIZE: usize = 4;

/// Size of the GPIO register block actually decoded by the chip.
pub const REGISTER_BLOCK_LEN: usize = 0xB4;

/// Default mapping length (one page; the device refuses smaller maps).
pub const DEFAULT_MAP_LEN: usize = 4096;

/// Physical base of the GPIO block on BCM2837 (Pi 3), for `/dev/mem` mappings.
pub const BCM2837_GPIO_BASE: u64 = 0x3F20_0000;

/// GPFSEL0: function select for pins 0-9. GPFSEL1..5 follow at 4-byte steps.
pub const GPFSEL0: usize = 0x00;

/// Pins covered by one function-select register.
pub const PINS_PER_FSEL: u8 = 10;

/// Width of one function-select field in bits.
pub const FSEL_BITS: u32 = 3;

/// Mask of one function-select field.
pub const FSEL_MASK: u32 = 0b111;

/// Function-select encoding for input.
pub const FSEL_INPUT: u32 = 0b000;

/// Function-select encoding for output.
pub const FSEL_OUTPUT: u32 = 0b001;

/// GPSET0: output set for pins 0-31; GPSET1 at +4.
pub const GPSET0: usize = 0x1C;

/// GPCLR0: output clear for pins 0-31; GPCLR1 at +4.
pub const GPCLR0: usize = 0x28;

/// GPLEV0: pin level for pins 0-31; GPLEV1 at +4.
pub const GPLEV0: usize = 0x34;

/// Pins covered by one set/clear/level bank.
pub const PINS_PER_BANK: u8 = 32;
