use crate::bcd::{decode_bcd, encode_bcd};
use crate::register_access::{Register, RegisterAccess};
use crate::{Ds1388, Error};

use rtcc::{DateTimeAccess, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Hour format of the hour register, with the AM/PM half for 12-hour mode.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HourMode {
    TwentyFourHour,
    TwelveHourAM,
    TwelveHourPM,
}

impl HourMode {
    /// Hour register bit selecting 12-hour mode
    pub const H12: u8 = 1 << 6;
    /// Hour register bit marking PM in 12-hour mode
    pub const PM: u8 = 1 << 5;

    /// Bits OR-ed into the encoded hour when writing the hour register.
    pub fn as_u8(self) -> u8 {
        match self {
            HourMode::TwentyFourHour => 0x00,
            HourMode::TwelveHourAM => Self::H12,
            HourMode::TwelveHourPM => Self::H12 | Self::PM,
        }
    }

    pub fn is_12h(self) -> bool {
        self != HourMode::TwentyFourHour
    }

    fn hour_range(self) -> core::ops::RangeInclusive<u8> {
        if self.is_12h() {
            1..=12
        } else {
            0..=23
        }
    }
}

/// One decoded snapshot of the time registers. All fields are binary.
///
/// `hour` is 0-23 in 24-hour mode and 1-12 otherwise, see [`TimeReading::hour_24`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimeReading {
    /// Years since 2000
    pub year: u8,
    pub month: u8,
    pub date: u8,
    /// 1 = Monday .. 7 = Sunday
    pub day_of_week: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub hundredths: u8,
    pub hour_mode: HourMode,
}

impl TimeReading {
    pub fn hour_24(&self) -> u8 {
        match self.hour_mode {
            HourMode::TwentyFourHour => self.hour,
            HourMode::TwelveHourAM => {
                if self.hour == 12 {
                    0
                } else {
                    self.hour
                }
            }
            HourMode::TwelveHourPM => {
                if self.hour == 12 {
                    12
                } else {
                    self.hour.wrapping_add(12)
                }
            }
        }
    }
}

/// Binary values used to seed the clock with [`Ds1388::init_time`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InitialTime {
    /// Years since 2000, 0-99
    pub year: u8,
    pub month: u8,
    pub date: u8,
    /// 1 = Monday .. 7 = Sunday
    pub day_of_week: u8,
    /// 0-23 for [`HourMode::TwentyFourHour`], 1-12 otherwise
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub hundredths: u8,
    pub hour_mode: HourMode,
}

impl InitialTime {
    pub fn is_valid(&self) -> bool {
        self.year <= 99
            && (1..=12).contains(&self.month)
            && (1..=31).contains(&self.date)
            && (1..=7).contains(&self.day_of_week)
            && self.hour_mode.hour_range().contains(&self.hour)
            && self.minute <= 59
            && self.second <= 59
            && self.hundredths <= 99
    }

    /// Splits a 24-hour clock hour into the representation used by `hour_mode`.
    fn from_24h(hour: u8, twelve_hour: bool) -> (u8, HourMode) {
        if !twelve_hour {
            (hour, HourMode::TwentyFourHour)
        } else if hour <= 11 {
            if hour == 0 {
                (12, HourMode::TwelveHourAM)
            } else {
                (hour, HourMode::TwelveHourAM)
            }
        } else {
            if hour == 12 {
                (12, HourMode::TwelveHourPM)
            } else {
                (hour - 12, HourMode::TwelveHourPM)
            }
        }
    }
}

impl<I, E> DateTimeAccess for Ds1388<I>
where
    I: RegisterAccess<Error = E>,
{
    type Error = Error<E>;

    fn datetime(&mut self) -> Result<NaiveDateTime, Self::Error> {
        self.datetime()
    }

    fn set_datetime(&mut self, datetime: &NaiveDateTime) -> Result<(), Self::Error> {
        self.set_datetime(datetime)
    }
}

impl<I, E> Ds1388<I>
where
    I: RegisterAccess<Error = E>,
{
    /// Reads the eight time registers one at a time and decodes them.
    ///
    /// The registers are not latched between the single reads, so a carry
    /// that happens mid-sequence (e.g. 12:59.99 -> 13:00.00) can produce a
    /// mixed reading. Any failed read aborts the whole call.
    pub fn read_time(&mut self) -> Result<TimeReading, Error<E>> {
        let hundredths = self.read_register(Register::HUNDREDTHS)?;
        let seconds = self.read_register(Register::SECONDS)?;
        let minutes = self.read_register(Register::MINUTES)?;
        let hours = self.read_register(Register::HOURS)?;
        let day_of_week = self.read_register(Register::WEEKDAYS)?;
        let date = self.read_register(Register::DAYS)?;
        let month = self.read_register(Register::MONTHS)?;
        let year = self.read_register(Register::YEARS)?;

        let (hour, hour_mode) = decode_hours(hours);

        Ok(TimeReading {
            year: decode_bcd(year),
            month: decode_bcd(month),
            date: decode_bcd(date),
            day_of_week,
            hour,
            minute: decode_bcd(minutes),
            second: decode_bcd(seconds),
            hundredths: decode_bcd(hundredths),
            hour_mode,
        })
    }

    /// Writes all time registers from binary values.
    ///
    /// Nothing is written if any field is out of range.
    pub fn init_time(&mut self, time: &InitialTime) -> Result<(), Error<E>> {
        if !time.is_valid() {
            return Err(Error::InvalidFieldRange);
        }

        self.write_register(Register::HUNDREDTHS, encode_bcd(time.hundredths))?;
        self.write_register(Register::SECONDS, encode_bcd(time.second))?;
        self.write_register(Register::MINUTES, encode_bcd(time.minute))?;
        self.write_register(
            Register::HOURS,
            encode_bcd(time.hour) | time.hour_mode.as_u8(),
        )?;
        self.write_register(Register::WEEKDAYS, time.day_of_week)?;
        self.write_register(Register::DAYS, encode_bcd(time.date))?;
        self.write_register(Register::MONTHS, encode_bcd(time.month))?;
        self.write_register(Register::YEARS, encode_bcd(time.year))?;

        Ok(())
    }

    pub fn datetime(&mut self) -> Result<NaiveDateTime, Error<E>> {
        let reading = self.read_time()?;

        let date = NaiveDate::from_ymd_opt(
            2000 + i32::from(reading.year),
            reading.month.into(),
            reading.date.into(),
        )
        .ok_or(Error::InvalidDateTime)?;
        let time = NaiveTime::from_hms_milli_opt(
            reading.hour_24().into(),
            reading.minute.into(),
            reading.second.into(),
            u32::from(reading.hundredths) * 10,
        )
        .ok_or(Error::InvalidDateTime)?;

        Ok(date.and_time(time))
    }

    /// Sets the clock from a calendar date/time, keeping the configured
    /// 12/24-hour mode.
    pub fn set_datetime(&mut self, datetime: &NaiveDateTime) -> Result<(), Error<E>> {
        let year = years_since_2000(datetime.year())?;
        let twelve_hour = self.read_register(Register::HOURS)? & HourMode::H12 > 0;
        let (hour, hour_mode) = InitialTime::from_24h(datetime.hour() as u8, twelve_hour);

        self.init_time(&InitialTime {
            year,
            month: datetime.month() as u8,
            date: datetime.day() as u8,
            day_of_week: datetime.weekday().number_from_monday() as u8,
            hour,
            minute: datetime.minute() as u8,
            second: datetime.second() as u8,
            // leap seconds report nanoseconds above 1e9
            hundredths: (datetime.nanosecond() / 10_000_000).min(99) as u8,
            hour_mode,
        })
    }
}

fn decode_hours(hours: u8) -> (u8, HourMode) {
    if hours & HourMode::H12 > 0 {
        let h12_hour = decode_bcd(hours & 0b00011111);
        if hours & HourMode::PM > 0 {
            (h12_hour, HourMode::TwelveHourPM)
        } else {
            (h12_hour, HourMode::TwelveHourAM)
        }
    } else {
        (decode_bcd(hours), HourMode::TwentyFourHour)
    }
}

fn years_since_2000<E>(year: i32) -> Result<u8, Error<E>> {
    if !(2000..=2099).contains(&year) {
        Err(Error::InvalidFieldRange)
    } else {
        Ok((year - 2000) as u8)
    }
}
