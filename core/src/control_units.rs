//! Control units the firmware can query for measurements.
//!
//! The settings record stores the diagnostic address of each table's control
//! unit, not its position in this list. Decoding therefore hands the raw
//! address back; see [`crate::record::settings`].

pub struct ControlUnit {
    pub name: &'static str,
    /// Address on the diagnostic bus.
    pub address: u16,
}

pub static CONTROL_UNITS: &[ControlUnit] = &[
    ControlUnit { name: "Engine", address: 0x01 },
    ControlUnit { name: "Transmission", address: 0x02 },
    ControlUnit { name: "Brakes", address: 0x03 },
    ControlUnit { name: "Climate", address: 0x08 },
    ControlUnit { name: "Central Electrics", address: 0x09 },
    ControlUnit { name: "Airbag", address: 0x15 },
    ControlUnit { name: "Instruments", address: 0x17 },
    ControlUnit { name: "Gateway", address: 0x19 },
    ControlUnit { name: "Steering", address: 0x44 },
    ControlUnit { name: "Battery Regulation", address: 0x61 },
];

/// Diagnostic address for a list index, `None` when the index is out of
/// range.
pub fn address_for(index: u16) -> Option<u16> {
    CONTROL_UNITS.get(index as usize).map(|unit| unit.address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_index() {
        assert_eq!(address_for(0), Some(0x01));
        assert_eq!(address_for(8), Some(0x44));
        assert_eq!(address_for(CONTROL_UNITS.len() as u16), None);
    }

    #[test]
    fn addresses_are_unique() {
        for (i, a) in CONTROL_UNITS.iter().enumerate() {
            for b in &CONTROL_UNITS[i + 1..] {
                assert_ne!(a.address, b.address, "{} and {}", a.name, b.name);
            }
        }
    }
}
