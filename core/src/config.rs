use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// Display language of the cluster firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::FromRepr, strum_macros::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Language {
    #[default]
    German = 0,
    English = 1,
    French = 2,
    Italian = 3,
    Spanish = 4,
    Portuguese = 5,
}

/// Whether the display takes over automatically when the ignition comes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::FromRepr, strum_macros::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Autostart {
    #[default]
    Off = 0,
    On = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::FromRepr, strum_macros::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Bluetooth {
    #[default]
    Off = 0,
    On = 1,
}

/// Screen layout the firmware boots into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::FromRepr, strum_macros::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Layout {
    #[default]
    ThreeGauges = 0,
    TwoGauges = 1,
    SingleGauge = 2,
    Table = 3,
    Numeric = 4,
    Chart = 5,
}

/// The 14 optional firmware features, one wire bit each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModsConfig {
    pub mfsw_roller: bool,
    pub drive_select: bool,
    pub egt_to_can: bool,
    pub half_resolution: bool,
    pub ignore_pdc: bool,
    pub scroll_tables: bool,
    pub statusbar_gauge: bool,
    pub statusbar_table: bool,
    pub virtual_cockpit: bool,
    pub star_button: bool,
    pub texture: bool,
    pub hide_drive: bool,
    pub hide_mmi: bool,
    pub alarm: bool,
}

impl ModsConfig {
    /// Packs the flags into the two wire bytes. Bits 1 and 5 of the first
    /// byte are reserved by the firmware and stay clear.
    pub fn to_bits(self) -> [u8; 2] {
        let mut first = 0u8;
        first |= (self.mfsw_roller as u8) << 0;
        first |= (self.drive_select as u8) << 2;
        first |= (self.egt_to_can as u8) << 3;
        first |= (self.half_resolution as u8) << 4;
        first |= (self.ignore_pdc as u8) << 6;
        first |= (self.scroll_tables as u8) << 7;

        let mut second = 0u8;
        second |= (self.statusbar_gauge as u8) << 0;
        second |= (self.statusbar_table as u8) << 1;
        second |= (self.virtual_cockpit as u8) << 2;
        second |= (self.star_button as u8) << 3;
        second |= (self.texture as u8) << 4;
        second |= (self.hide_drive as u8) << 5;
        second |= (self.hide_mmi as u8) << 6;
        second |= (self.alarm as u8) << 7;

        [first, second]
    }

    pub fn from_bits(bits: [u8; 2]) -> Self {
        Self {
            mfsw_roller: bits[0] & 1 << 0 != 0,
            drive_select: bits[0] & 1 << 2 != 0,
            egt_to_can: bits[0] & 1 << 3 != 0,
            half_resolution: bits[0] & 1 << 4 != 0,
            ignore_pdc: bits[0] & 1 << 6 != 0,
            scroll_tables: bits[0] & 1 << 7 != 0,
            statusbar_gauge: bits[1] & 1 << 0 != 0,
            statusbar_table: bits[1] & 1 << 1 != 0,
            virtual_cockpit: bits[1] & 1 << 2 != 0,
            star_button: bits[1] & 1 << 3 != 0,
            texture: bits[1] & 1 << 4 != 0,
            hide_drive: bits[1] & 1 << 5 != 0,
            hide_mmi: bits[1] & 1 << 6 != 0,
            alarm: bits[1] & 1 << 7 != 0,
        }
    }
}

/// Metrics and colors of the large numeric digits.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DigitsConfig {
    pub height: u8,
    pub width: u8,
    pub dot_width: u8,
    pub spacing: u8,
    /// `#rrggbb` hex string.
    pub normal_color: String,
    /// `#rrggbb` hex string, used once a warning threshold is crossed.
    pub warning_color: String,
}

impl Default for DigitsConfig {
    fn default() -> Self {
        Self {
            height: 0,
            width: 0,
            dot_width: 0,
            spacing: 0,
            normal_color: String::from("#ffffff"),
            warning_color: String::from("#ff0000"),
        }
    }
}

/// Geometry and scale of one analog needle gauge.
///
/// Angles are degrees, limits are physical units; the record stores tenths
/// and thousandths respectively.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaugeConfig {
    pub needle_width: u8,
    pub needle_height: u8,
    pub needle_center_x: i16,
    pub needle_center_y: i16,
    pub needle_pos_x: i16,
    pub needle_pos_y: i16,
    pub indicator_pos_x: i16,
    pub indicator_pos_y: i16,
    pub start_angle: f32,
    pub scale_range: f32,
    pub lower_limit: f32,
    pub upper_limit: f32,
}

/// Screen position of one numeric readout.
///
/// `centered` and `position_x` share a single signed field on the wire
/// (negative means centered), so a centered readout at x = 0 loses its flag
/// on a round trip.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumericalGaugeConfig {
    pub position_x: i16,
    pub position_y: i16,
    pub centered: bool,
}

/// One measurement channel of a table.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableRowConfig {
    /// Device metric id, passed through uninterpreted.
    pub measurement: u16,
    /// At most 30 ASCII characters; longer labels are truncated on encode.
    pub label: String,
    /// At most 20 bytes once encoded; the substring `*lambda*` occupies a
    /// single byte on the wire.
    pub unit: String,
    pub decimals: i8,
    pub factor: i8,
    pub pressure: i8,
    pub lower_warning: f32,
    pub upper_warning: f32,
}

/// One measurement table and the control unit its rows are read from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableConfig {
    /// Index into [`crate::control_units::CONTROL_UNITS`]. Decoding a record
    /// stores the raw wire address here instead; see the module docs of
    /// [`crate::record::settings`].
    pub control_unit_index: u16,
    /// Exactly 10 rows.
    pub rows: Vec<TableRowConfig>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            control_unit_index: 0,
            rows: vec![TableRowConfig::default(); 10],
        }
    }
}

/// The complete device settings record, as the caller sees it.
///
/// The array lengths are wire-format contracts: 3 gauges, 10 numerical
/// gauges, 5 tables of 10 rows. [`crate::record::settings::encode`] rejects
/// anything else.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    pub language: Language,
    pub autostart: Autostart,
    pub bluetooth: Bluetooth,
    /// Index into the device's car list.
    pub car: u8,
    pub layout: Layout,
    /// Index of the view shown first.
    pub view1: u8,
    /// `#rrggbb` hex string.
    pub background_color: String,
    /// `#rrggbb` hex string.
    pub font_color: String,
    pub mods: ModsConfig,
    pub digits: DigitsConfig,
    pub gauges: Vec<GaugeConfig>,
    pub numerical_gauges: Vec<NumericalGaugeConfig>,
    pub tables: Vec<TableConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            autostart: Autostart::default(),
            bluetooth: Bluetooth::default(),
            car: 0,
            layout: Layout::default(),
            view1: 0,
            background_color: String::from("#000000"),
            font_color: String::from("#ffffff"),
            mods: ModsConfig::default(),
            digits: DigitsConfig::default(),
            gauges: vec![GaugeConfig::default(); 3],
            numerical_gauges: vec![NumericalGaugeConfig::default(); 10],
            tables: vec![TableConfig::default(); 5],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn mods_bits_round_trip_each_flag() {
        let flags: [fn(&mut ModsConfig); 14] = [
            |m| m.mfsw_roller = true,
            |m| m.drive_select = true,
            |m| m.egt_to_can = true,
            |m| m.half_resolution = true,
            |m| m.ignore_pdc = true,
            |m| m.scroll_tables = true,
            |m| m.statusbar_gauge = true,
            |m| m.statusbar_table = true,
            |m| m.virtual_cockpit = true,
            |m| m.star_button = true,
            |m| m.texture = true,
            |m| m.hide_drive = true,
            |m| m.hide_mmi = true,
            |m| m.alarm = true,
        ];
        for set in flags {
            let mut mods = ModsConfig::default();
            set(&mut mods);
            let bits = mods.to_bits();
            assert_eq!(
                (bits[0] as u16 | (bits[1] as u16) << 8).count_ones(),
                1,
                "each flag must own exactly one bit"
            );
            assert_eq!(ModsConfig::from_bits(bits), mods);
        }
    }

    #[test]
    fn mods_bit_positions() {
        let mut mods = ModsConfig::default();
        mods.mfsw_roller = true;
        mods.scroll_tables = true;
        mods.statusbar_gauge = true;
        mods.alarm = true;
        assert_eq!(mods.to_bits(), [0b1000_0001, 0b1000_0001]);
    }

    #[test]
    fn reserved_mod_bits_stay_clear() {
        let mods = ModsConfig {
            mfsw_roller: true,
            drive_select: true,
            egt_to_can: true,
            half_resolution: true,
            ignore_pdc: true,
            scroll_tables: true,
            ..ModsConfig::default()
        };
        assert_eq!(mods.to_bits()[0] & 0b0010_0010, 0);
    }

    #[test]
    fn enums_survive_their_wire_bytes() {
        for language in Language::iter() {
            assert_eq!(Language::from_repr(language as u8), Some(language));
        }
        for layout in Layout::iter() {
            assert_eq!(Layout::from_repr(layout as u8), Some(layout));
        }
        assert_eq!(Language::from_repr(6), None);
        assert_eq!(Layout::from_repr(6), None);
        assert_eq!(Autostart::from_repr(2), None);
        assert_eq!(Bluetooth::from_repr(2), None);
    }

    #[test]
    fn default_config_has_contract_lengths() {
        let config = Config::default();
        assert_eq!(config.gauges.len(), 3);
        assert_eq!(config.numerical_gauges.len(), 10);
        assert_eq!(config.tables.len(), 5);
        assert!(config.tables.iter().all(|t| t.rows.len() == 10));
    }
}
