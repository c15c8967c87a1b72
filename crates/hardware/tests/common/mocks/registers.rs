use gpiomem_core::common::constants::{GPCLR0, GPLEV0, GPSET0, REGISTER_BLOCK_LEN, WORD_SIZE};
use gpiomem_core::soc::RegisterAccess;
use gpiomem_core::{GpioError, GpioResult};
use std::sync::Mutex;

/// A single recorded register access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read(usize),
    Write(usize, u32),
}

/// In-memory GPIO block with BCM set/clear semantics.
///
/// Writes to GPSETn/GPCLRn update GPLEVn the way a pin wired back to itself
/// would, so level reads observe driven values. Every access is logged.
#[derive(Debug)]
pub struct FakeRegisters {
    words: Mutex<Vec<u32>>,
    log: Mutex<Vec<Access>>,
}

impl Default for FakeRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRegisters {
    pub fn new() -> Self {
        Self {
            words: Mutex::new(vec![0; REGISTER_BLOCK_LEN / WORD_SIZE]),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Reads a word without logging it.
    pub fn peek(&self, offset: usize) -> u32 {
        self.words.lock().unwrap()[offset / WORD_SIZE]
    }

    /// Writes a word without logging it or applying set/clear semantics.
    pub fn poke(&self, offset: usize, value: u32) {
        self.words.lock().unwrap()[offset / WORD_SIZE] = value;
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }

    fn check(&self, offset: usize) -> GpioResult<usize> {
        if offset % WORD_SIZE != 0 || offset + WORD_SIZE > REGISTER_BLOCK_LEN {
            return Err(GpioError::OutOfRange {
                offset,
                len: REGISTER_BLOCK_LEN,
            });
        }
        Ok(offset / WORD_SIZE)
    }
}

impl RegisterAccess for FakeRegisters {
    fn len(&self) -> usize {
        REGISTER_BLOCK_LEN
    }

    fn read_word(&self, offset: usize) -> GpioResult<u32> {
        let index = self.check(offset)?;
        self.log.lock().unwrap().push(Access::Read(offset));
        Ok(self.words.lock().unwrap()[index])
    }

    fn write_word(&self, offset: usize, value: u32) -> GpioResult<()> {
        let index = self.check(offset)?;
        self.log.lock().unwrap().push(Access::Write(offset, value));
        let mut words = self.words.lock().unwrap();
        match offset {
            o if o == GPSET0 || o == GPSET0 + WORD_SIZE => {
                let lev = (GPLEV0 + (o - GPSET0)) / WORD_SIZE;
                words[lev] |= value;
            }
            o if o == GPCLR0 || o == GPCLR0 + WORD_SIZE => {
                let lev = (GPLEV0 + (o - GPCLR0)) / WORD_SIZE;
                words[lev] &= !value;
            }
            _ => words[index] = value,
        }
        Ok(())
    }
}

/// Register backing that fails the test on any access.
#[derive(Debug, Default)]
pub struct UntouchableRegisters;

impl RegisterAccess for UntouchableRegisters {
    fn len(&self) -> usize {
        REGISTER_BLOCK_LEN
    }

    fn read_word(&self, offset: usize) -> GpioResult<u32> {
        panic!("unexpected register read at {offset:#x}");
    }

    fn write_word(&self, offset: usize, value: u32) -> GpioResult<()> {
        panic!("unexpected register write of {value:#x} at {offset:#x}");
    }
}
