#![cfg_attr(not(test), no_std)]

mod bcd;
mod datetime;
mod register_access;
mod status;

pub use register_access::RegisterAccess;
pub use rtcc::{DateTimeAccess, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub use crate::bcd::{decode_bcd, encode_bcd};
pub use crate::datetime::{HourMode, InitialTime, TimeReading};
pub use crate::register_access::{ControlReg, FlagsReg, I2cInterface, Register};

/// Slave address of the clock and watchdog.
pub const DEFAULT_ADDRESS: u8 = 0x68; // 0xD0 (W) + 0xD1 (R)
/// First block of the on-chip EEPROM. Not driven by this crate.
pub const EEPROM_BLOCK_1_ADDRESS: u8 = 0x69;
/// Second block of the on-chip EEPROM. Not driven by this crate.
pub const EEPROM_BLOCK_2_ADDRESS: u8 = 0x6A;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug)]
pub enum Error<E> {
    /// The bus transfer failed.
    Interface(E),
    /// A field passed in for writing is outside the range its register can hold.
    InvalidFieldRange,
    /// The time registers do not hold a valid calendar date and time.
    InvalidDateTime,
}

/// DS1388 real-time clock with watchdog.
pub struct Ds1388<I> {
    interface: I,
}

impl<I, E> Ds1388<I>
where
    I: RegisterAccess<Error = E>,
{
    pub fn new(interface: I) -> Self {
        Ds1388 { interface }
    }

    pub fn release(self) -> I {
        self.interface
    }

    /// Enables the oscillator and disables the watchdog counter.
    pub fn init(&mut self) -> Result<(), Error<E>> {
        self.write_control_register(
            ControlReg::default()
                .with_oscillator(true)
                .with_watchdog(false)
                .with_watchdog_reset(false),
        )
    }
}

impl<I2C, E> Ds1388<I2cInterface<I2C>>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    pub fn new_with_i2c(i2c: I2C) -> Self {
        Self::new(I2cInterface::new(i2c, DEFAULT_ADDRESS))
    }
}
