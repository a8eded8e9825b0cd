use crate::register_access::RegisterAccess;
use crate::{Ds1388, Error};

// The clear operations are a read followed by a separate write of the flags
// register. Another bus master touching the chip in between can lose an update.
impl<I, E> Ds1388<I>
where
    I: RegisterAccess<Error = E>,
{
    /// Returns `false` once the oscillator has stopped since the flag was last
    /// cleared, e.g. after losing both main and backup power.
    pub fn is_time_valid(&mut self) -> Result<bool, Error<E>> {
        Ok(!self.oscillator_stopped()?)
    }

    pub fn oscillator_stopped(&mut self) -> Result<bool, Error<E>> {
        Ok(self.read_flags_register()?.oscillator_stopped())
    }

    /// Clears the oscillator stop flag, leaving the watchdog flag untouched.
    pub fn clear_oscillator_flag(&mut self) -> Result<(), Error<E>> {
        let flags = self.read_flags_register()?;
        self.write_flags_register(flags.without_oscillator_stopped())
    }

    /// Whether the watchdog counter reached zero and asserted a reset.
    pub fn watchdog_triggered(&mut self) -> Result<bool, Error<E>> {
        Ok(self.read_flags_register()?.watchdog_triggered())
    }

    /// Clears the watchdog flag, leaving the oscillator stop flag untouched.
    pub fn clear_watchdog_flag(&mut self) -> Result<(), Error<E>> {
        let flags = self.read_flags_register()?;
        self.write_flags_register(flags.without_watchdog_triggered())
    }
}
