use crate::{Ds1388, Error};

/// Register map of the clock/watchdog block.
pub struct Register;

impl Register {
    pub const HUNDREDTHS: u8 = 0x00;
    pub const SECONDS: u8 = 0x01;
    pub const MINUTES: u8 = 0x02;
    pub const HOURS: u8 = 0x03;
    pub const WEEKDAYS: u8 = 0x04;
    pub const DAYS: u8 = 0x05;
    pub const MONTHS: u8 = 0x06;
    pub const YEARS: u8 = 0x07;

    pub const WATCHDOG_HUNDREDTHS: u8 = 0x08;
    pub const WATCHDOG_SECONDS: u8 = 0x09;
    pub const TRICKLE_CHARGER: u8 = 0x0A;
    pub const FLAGS: u8 = 0x0B;
    pub const CONTROL: u8 = 0x0C;
}

/// Contents of the flags register.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagsReg(u8);

impl FlagsReg {
    /// Oscillator stop flag, set whenever the oscillator has stopped.
    pub const OSF: u8 = 7;
    /// Watchdog flag, set when the watchdog counter reached zero.
    pub const WF: u8 = 6;

    pub fn oscillator_stopped(&self) -> bool {
        self.0 & (1 << Self::OSF) > 0
    }

    pub fn watchdog_triggered(&self) -> bool {
        self.0 & (1 << Self::WF) > 0
    }

    pub fn without_oscillator_stopped(self) -> Self {
        Self(self.0 & (1 << Self::WF))
    }

    pub fn without_watchdog_triggered(self) -> Self {
        Self(self.0 & (1 << Self::OSF))
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl From<u8> for FlagsReg {
    fn from(val: u8) -> Self {
        Self(val)
    }
}

/// Contents of the control register.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlReg(u8);

impl ControlReg {
    /// Oscillator disable (active high)
    pub const EOSC: u8 = 7;
    /// Watchdog counter enable
    pub const WDE: u8 = 1;
    /// Pull RST low when the watchdog counter expires
    pub const WD_RST: u8 = 0;

    pub fn oscillator_enabled(&self) -> bool {
        self.0 & (1 << Self::EOSC) == 0
    }

    pub fn watchdog_enabled(&self) -> bool {
        self.0 & (1 << Self::WDE) > 0
    }

    pub fn watchdog_reset(&self) -> bool {
        self.0 & (1 << Self::WD_RST) > 0
    }

    pub fn with_oscillator(self, enabled: bool) -> Self {
        if enabled {
            Self(self.0 & !(1 << Self::EOSC))
        } else {
            Self(self.0 | (1 << Self::EOSC))
        }
    }

    pub fn with_watchdog(self, enabled: bool) -> Self {
        if enabled {
            Self(self.0 | (1 << Self::WDE))
        } else {
            Self(self.0 & !(1 << Self::WDE))
        }
    }

    pub fn with_watchdog_reset(self, enabled: bool) -> Self {
        if enabled {
            Self(self.0 | (1 << Self::WD_RST))
        } else {
            Self(self.0 & !(1 << Self::WD_RST))
        }
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

/// Oscillator running, watchdog counter and reset disabled.
impl Default for ControlReg {
    fn default() -> Self {
        Self(0x00)
    }
}

impl From<u8> for ControlReg {
    fn from(val: u8) -> Self {
        Self(val)
    }
}

impl<I, E> Ds1388<I>
where
    I: RegisterAccess<Error = E>,
{
    pub(crate) fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<E>> {
        self.interface
            .write_register(register, value)
            .map_err(Error::Interface)
    }

    pub(crate) fn read_register(&mut self, register: u8) -> Result<u8, Error<E>> {
        self.interface
            .read_register(register)
            .map_err(Error::Interface)
    }

    pub fn read_flags_register(&mut self) -> Result<FlagsReg, Error<E>> {
        Ok(FlagsReg(self.read_register(Register::FLAGS)?))
    }

    pub fn write_flags_register(&mut self, flags: FlagsReg) -> Result<(), Error<E>> {
        self.write_register(Register::FLAGS, flags.as_u8())
    }

    pub fn read_control_register(&mut self) -> Result<ControlReg, Error<E>> {
        Ok(ControlReg(self.read_register(Register::CONTROL)?))
    }

    pub fn write_control_register(&mut self, control: ControlReg) -> Result<(), Error<E>> {
        self.write_register(Register::CONTROL, control.as_u8())
    }

    /// Reads the watchdog counter as `(hundredths, seconds)` register bytes.
    pub fn read_watchdog_counter(&mut self) -> Result<(u8, u8), Error<E>> {
        let hundredths = self.read_register(Register::WATCHDOG_HUNDREDTHS)?;
        let seconds = self.read_register(Register::WATCHDOG_SECONDS)?;

        Ok((hundredths, seconds))
    }

    /// Loads the watchdog counter. Both bytes are written as-is.
    pub fn write_watchdog_counter(&mut self, hundredths: u8, seconds: u8) -> Result<(), Error<E>> {
        self.write_register(Register::WATCHDOG_HUNDREDTHS, hundredths)?;
        self.write_register(Register::WATCHDOG_SECONDS, seconds)
    }

    /// Starts the watchdog counter, keeping the oscillator setting.
    pub fn enable_watchdog(&mut self, reset_on_expiry: bool) -> Result<(), Error<E>> {
        let control = self
            .read_control_register()?
            .with_watchdog(true)
            .with_watchdog_reset(reset_on_expiry);
        self.write_control_register(control)
    }

    pub fn disable_watchdog(&mut self) -> Result<(), Error<E>> {
        let control = self
            .read_control_register()?
            .with_watchdog(false)
            .with_watchdog_reset(false);
        self.write_control_register(control)
    }

    pub fn read_trickle_charger_register(&mut self) -> Result<u8, Error<E>> {
        self.read_register(Register::TRICKLE_CHARGER)
    }

    pub fn write_trickle_charger_register(&mut self, value: u8) -> Result<(), Error<E>> {
        self.write_register(Register::TRICKLE_CHARGER, value)
    }
}

/// Single register transport to the chip.
///
/// Neither method retries; a failed transfer is reported as is.
pub trait RegisterAccess {
    type Error;

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;
    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error>;
}

pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterAccess for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        let payload = [register, value];

        #[cfg(feature = "defmt")]
        defmt::trace!("ds1388 write {=u8:#x} <- {=u8:#x}", register, value);

        self.i2c.write(self.address, &payload)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
        let mut value = [0u8; 1];

        self.i2c.write_read(self.address, &[register], &mut value)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("ds1388 read {=u8:#x} -> {=u8:#x}", register, value[0]);

        Ok(value[0])
    }
}

#[cfg(test)]
mod tests {
    use crate::DEFAULT_ADDRESS;

    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    #[test]
    fn test_write_register() {
        let expectations = [I2cTransaction::write(DEFAULT_ADDRESS, vec![0x0C, 0x00])];

        let i2c = I2cMock::new(&expectations);

        let mut rtc = I2cInterface::new(i2c, DEFAULT_ADDRESS);
        rtc.write_register(0x0C, 0x00).unwrap();

        let mut i2c = rtc.release();

        i2c.done();
    }

    #[test]
    fn test_read_register() {
        let expectations = [I2cTransaction::write_read(
            DEFAULT_ADDRESS,
            vec![0x0B],
            vec![0x80],
        )];

        let i2c = I2cMock::new(&expectations);

        let mut rtc = I2cInterface::new(i2c, DEFAULT_ADDRESS);
        let reg_val = rtc.read_register(0x0B).unwrap();
        assert_eq!(reg_val, 0x80);

        let mut i2c = rtc.release();

        i2c.done();
    }

    #[test]
    fn test_read_register_error() {
        let expectations = [
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x01], vec![0x00])
                .with_error(ErrorKind::Other),
        ];

        let i2c = I2cMock::new(&expectations);

        let mut rtc = I2cInterface::new(i2c, DEFAULT_ADDRESS);
        assert_eq!(rtc.read_register(0x01), Err(ErrorKind::Other));

        let mut i2c = rtc.release();

        i2c.done();
    }

    #[test]
    fn test_flags_reg() {
        let flags = FlagsReg::from(0xC0);
        assert!(flags.oscillator_stopped());
        assert!(flags.watchdog_triggered());
        assert_eq!(flags.without_oscillator_stopped().as_u8(), 0x40);
        assert_eq!(flags.without_watchdog_triggered().as_u8(), 0x80);

        let flags = FlagsReg::from(0x3F);
        assert!(!flags.oscillator_stopped());
        assert!(!flags.watchdog_triggered());
    }

    #[test]
    fn test_control_reg() {
        let control = ControlReg::default();
        assert!(control.oscillator_enabled());
        assert!(!control.watchdog_enabled());
        assert!(!control.watchdog_reset());

        let control = control.with_watchdog(true).with_watchdog_reset(true);
        assert_eq!(control.as_u8(), 0x03);

        let control = control.with_oscillator(false).with_watchdog(false);
        assert_eq!(control.as_u8(), 0x81);
        assert!(!control.oscillator_enabled());
    }

    #[test]
    fn test_enable_watchdog_keeps_oscillator_bit() {
        let expectations = [
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![Register::CONTROL], vec![0x80]),
            I2cTransaction::write(DEFAULT_ADDRESS, vec![Register::CONTROL, 0x83]),
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![Register::CONTROL], vec![0x83]),
            I2cTransaction::write(DEFAULT_ADDRESS, vec![Register::CONTROL, 0x80]),
        ];

        let i2c = I2cMock::new(&expectations);
        let mut rtc = Ds1388::new_with_i2c(i2c);

        rtc.enable_watchdog(true).unwrap();
        rtc.disable_watchdog().unwrap();

        let mut i2c = rtc.release().release();
        i2c.done();
    }

    #[test]
    fn test_watchdog_counter() {
        let expectations = [
            I2cTransaction::write(DEFAULT_ADDRESS, vec![Register::WATCHDOG_HUNDREDTHS, 0x50]),
            I2cTransaction::write(DEFAULT_ADDRESS, vec![Register::WATCHDOG_SECONDS, 0x02]),
            I2cTransaction::write_read(
                DEFAULT_ADDRESS,
                vec![Register::WATCHDOG_HUNDREDTHS],
                vec![0x49],
            ),
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![Register::WATCHDOG_SECONDS], vec![0x01]),
        ];

        let i2c = I2cMock::new(&expectations);
        let mut rtc = Ds1388::new_with_i2c(i2c);

        rtc.write_watchdog_counter(0x50, 0x02).unwrap();
        assert_eq!(rtc.read_watchdog_counter().unwrap(), (0x49, 0x01));

        let mut i2c = rtc.release().release();
        i2c.done();
    }
}
