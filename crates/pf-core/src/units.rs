// pf-core/src/units.rs

use core::fmt;

use uom::si::f64::{
    AngularVelocity as UomAngularVelocity, Energy as UomEnergy, Length as UomLength,
    Mass as UomMass, MassDensity as UomMassDensity, Power as UomPower, Ratio as UomRatio,
    Time as UomTime, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type AngularVelocity = UomAngularVelocity;
pub type Density = UomMassDensity;
pub type Energy = UomEnergy;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Power = UomPower;
pub type Ratio = UomRatio;
pub type Time = UomTime;
pub type Velocity = UomVelocity;

#[inline]
pub fn kw(v: f64) -> Power {
    use uom::si::power::kilowatt;
    Power::new::<kilowatt>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn rpm(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::revolution_per_minute;
    AngularVelocity::new::<revolution_per_minute>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

/// Unit label attached to every graph signal and port.
///
/// Values on the graph are plain `f64` in the unit named here; connecting a
/// signal to a port with a different label is a graph error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalUnit {
    Unitless,
    Kilowatt,
    Rpm,
    Kilogram,
    KilogramPerSecond,
    Newton,
    Second,
    Meter,
    KilogramPerCubicMeter,
    MeterPerSecond,
    Kilojoule,
    Dollar,
}

impl SignalUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            SignalUnit::Unitless => "-",
            SignalUnit::Kilowatt => "kW",
            SignalUnit::Rpm => "rpm",
            SignalUnit::Kilogram => "kg",
            SignalUnit::KilogramPerSecond => "kg/s",
            SignalUnit::Newton => "N",
            SignalUnit::Second => "s",
            SignalUnit::Meter => "m",
            SignalUnit::KilogramPerCubicMeter => "kg/m**3",
            SignalUnit::MeterPerSecond => "m/s",
            SignalUnit::Kilojoule => "kJ",
            SignalUnit::Dollar => "USD",
        }
    }
}

impl fmt::Display for SignalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

pub mod conversions {
    //! Conversions from catalogue units into the graph's working units.

    use uom::si::f64::{Energy, Length, Mass, Power, Time};

    /// Brake specific fuel consumption in lb/(hp·h) to kg/(kW·s).
    pub fn psfc_to_kg_per_kw_s(lb_per_hp_hr: f64) -> f64 {
        use uom::si::mass::{kilogram, pound};
        use uom::si::power::{horsepower, kilowatt};
        use uom::si::time::{hour, second};

        let fuel = Mass::new::<pound>(lb_per_hp_hr).get::<kilogram>();
        let power = Power::new::<horsepower>(1.0).get::<kilowatt>();
        let time = Time::new::<hour>(1.0).get::<second>();
        fuel / (power * time)
    }

    /// Specific energy in Wh/kg to kJ/kg.
    pub fn wh_per_kg_to_kj_per_kg(wh_per_kg: f64) -> f64 {
        use uom::si::energy::{kilojoule, watt_hour};
        Energy::new::<watt_hour>(wh_per_kg).get::<kilojoule>()
    }

    pub fn kw_to_hp(v: f64) -> f64 {
        use uom::si::power::{horsepower, kilowatt};
        Power::new::<kilowatt>(v).get::<horsepower>()
    }

    pub fn m_to_ft(v: f64) -> f64 {
        use uom::si::length::{foot, meter};
        Length::new::<meter>(v).get::<foot>()
    }

    pub fn lb_to_kg(v: f64) -> f64 {
        use uom::si::mass::{kilogram, pound};
        Mass::new::<pound>(v).get::<kilogram>()
    }
}
