//! The pseudobinary-C sensor table.
//!
//! Each block names its sensor with a single character, `A` for index zero and counting up from
//! there. The index picks the sensor's tag, how its raw integers are scaled into engineering units,
//! and how many decimals it gets in the output.

use std::fmt;

/// Number of sensor slots in the table.
pub const SENSOR_COUNT: u8 = 32;

const FIRST_AVAILABLE: u8 = 23;
const LAST_AVAILABLE: u8 = 28;

/// A pseudobinary-C sensor.
///
/// # Examples
///
/// ```
/// use pseudobinary::sensor::{Scaling, Sensor};
/// let sensor = Sensor::from_index(7).unwrap();
/// assert_eq!(Sensor::Bat, sensor);
/// assert_eq!("BAT", sensor.tag());
/// assert_eq!(Scaling::Voltage, sensor.scaling());
/// assert_eq!(1, sensor.precision());
/// ```
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sensor {
    Prs,
    Rad,
    Ra2,
    Ra3,
    Ras,
    Enc,
    Bub,
    Bat,
    Sst,
    Atm,
    Psd,
    Rsd,
    Pr2,
    Sw1,
    Sw2,
    Tst,
    Ts2,
    Ts3,
    Tma,
    Wav,
    Wmx,
    Wdr,
    Rin,
    /// An unassigned slot, carrying its index.
    Available(u8),
    Sw1Samples,
    Sw2Samples,
    PrsSamples,
}

/// How raw integers are turned into engineering units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scaling {
    /// Millimeters to meters.
    Length,

    /// Tenths of a volt to volts.
    Voltage,

    /// Tenths of a hectopascal to hectopascals.
    Pressure,

    /// Tenths of a degree C to degrees C.
    ///
    /// Only pseudobinary-C transmits sea surface temperature this way.
    Temperature,

    /// The raw integer is the value.
    None,
}

impl Sensor {
    /// Returns the sensor at this table index, or none if the index is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudobinary::sensor::Sensor;
    /// assert_eq!(Some(Sensor::Prs), Sensor::from_index(0));
    /// assert_eq!(Some(Sensor::Available(25)), Sensor::from_index(25));
    /// assert_eq!(None, Sensor::from_index(32));
    /// ```
    pub fn from_index(index: u8) -> Option<Sensor> {
        use self::Sensor::*;
        let sensor = match index {
            0 => Prs,
            1 => Rad,
            2 => Ra2,
            3 => Ra3,
            4 => Ras,
            5 => Enc,
            6 => Bub,
            7 => Bat,
            8 => Sst,
            9 => Atm,
            10 => Psd,
            11 => Rsd,
            12 => Pr2,
            13 => Sw1,
            14 => Sw2,
            15 => Tst,
            16 => Ts2,
            17 => Ts3,
            18 => Tma,
            19 => Wav,
            20 => Wmx,
            21 => Wdr,
            22 => Rin,
            FIRST_AVAILABLE..=LAST_AVAILABLE => Available(index),
            29 => Sw1Samples,
            30 => Sw2Samples,
            31 => PrsSamples,
            _ => return None,
        };
        Some(sensor)
    }

    /// Returns every sensor in table order.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudobinary::sensor::Sensor;
    /// assert_eq!(32, Sensor::all().len());
    /// ```
    pub fn all() -> Vec<Sensor> {
        (0..SENSOR_COUNT).filter_map(Sensor::from_index).collect()
    }

    /// Returns this sensor's index in the table.
    pub fn index(&self) -> u8 {
        use self::Sensor::*;
        match *self {
            Prs => 0,
            Rad => 1,
            Ra2 => 2,
            Ra3 => 3,
            Ras => 4,
            Enc => 5,
            Bub => 6,
            Bat => 7,
            Sst => 8,
            Atm => 9,
            Psd => 10,
            Rsd => 11,
            Pr2 => 12,
            Sw1 => 13,
            Sw2 => 14,
            Tst => 15,
            Ts2 => 16,
            Ts3 => 17,
            Tma => 18,
            Wav => 19,
            Wmx => 20,
            Wdr => 21,
            Rin => 22,
            Available(index) => index,
            Sw1Samples => 29,
            Sw2Samples => 30,
            PrsSamples => 31,
        }
    }

    /// Returns this sensor's tag.
    ///
    /// Tags are three characters except for the unassigned slots and the sample count channels.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudobinary::sensor::Sensor;
    /// assert_eq!("PRS", Sensor::Prs.tag());
    /// assert_eq!("SW1 samples", Sensor::Sw1Samples.tag());
    /// ```
    pub fn tag(&self) -> &'static str {
        use self::Sensor::*;
        match *self {
            Prs => "PRS",
            Rad => "RAD",
            Ra2 => "RA2",
            Ra3 => "RA3",
            Ras => "RAS",
            Enc => "ENC",
            Bub => "BUB",
            Bat => "BAT",
            Sst => "SST",
            Atm => "ATM",
            Psd => "PSD",
            Rsd => "RSD",
            Pr2 => "PR2",
            Sw1 => "SW1",
            Sw2 => "SW2",
            Tst => "TST",
            Ts2 => "TS2",
            Ts3 => "TS3",
            Tma => "TMA",
            Wav => "WAV",
            Wmx => "WMX",
            Wdr => "WDR",
            Rin => "RIN",
            Available(_) => "Avail",
            Sw1Samples => "SW1 samples",
            Sw2Samples => "SW2 samples",
            PrsSamples => "PRS samples",
        }
    }

    /// Returns how this sensor's raw values are scaled.
    pub fn scaling(&self) -> Scaling {
        use self::Sensor::*;
        match *self {
            Prs | Rad | Ra2 | Ra3 | Ras | Enc | Bub | Pr2 | Tst | Ts2 | Ts3 => Scaling::Length,
            Bat => Scaling::Voltage,
            Atm => Scaling::Pressure,
            Sst => Scaling::Temperature,
            _ => Scaling::None,
        }
    }

    /// Returns the number of decimals used when writing this sensor's values.
    pub fn precision(&self) -> usize {
        use self::Sensor::*;
        match *self {
            Sw1 | Sw2 => 0,
            Bat | Atm | Sst | Rsd => 1,
            _ => 3,
        }
    }

    /// Returns true if this channel counts samples rather than measuring anything.
    ///
    /// These channels are decoded so the blocks line up, but they are never written out.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudobinary::sensor::Sensor;
    /// assert!(Sensor::PrsSamples.is_sample_count());
    /// assert!(!Sensor::Prs.is_sample_count());
    /// ```
    pub fn is_sample_count(&self) -> bool {
        match *self {
            Sensor::Sw1Samples | Sensor::Sw2Samples | Sensor::PrsSamples => true,
            _ => false,
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl Scaling {
    /// Returns the divisor applied to raw values.
    pub fn divisor(&self) -> f64 {
        match *self {
            Scaling::Length => 1000.,
            Scaling::Voltage | Scaling::Pressure | Scaling::Temperature => 10.,
            Scaling::None => 1.,
        }
    }

    /// Scales a raw value.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudobinary::sensor::Scaling;
    /// assert_eq!(1.234, Scaling::Length.apply(1234));
    /// assert_eq!(12.5, Scaling::Voltage.apply(125));
    /// ```
    pub fn apply(&self, raw: i64) -> f64 {
        raw as f64 / self.divisor()
    }
}

impl fmt::Display for Scaling {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match *self {
            Scaling::Length => "mm -> m",
            Scaling::Voltage => "V / 10",
            Scaling::Pressure => "hPa / 10",
            Scaling::Temperature => "degC / 10",
            Scaling::None => "none",
        };
        f.write_str(s)
    }
}
