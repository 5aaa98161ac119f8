//! The 16,384-byte settings record.
//!
//! Everything is little-endian. Bytes 0..48 are the header, the five
//! measurement tables follow as 100-byte row records at
//! `1000 * table + 100 * row + 100`, and the last two bytes hold a
//! CRC-16/XMODEM over the rest. Analog gauge geometry and the numeric
//! readout positions have no region of their own; the firmware reads them
//! out of the first table's rows, so the codec folds them in there.
//!
//! One asymmetry is inherited from the firmware's tooling: `encode` maps
//! each table's `control_unit_index` to its diagnostic address through
//! [`crate::control_units`], while `decode` stores the raw wire address back
//! into the field without an inverse lookup.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use log::info;
use zerocopy::little_endian::{I16, I32, U16, U32};
use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout};

use crate::config::{
    Autostart, Bluetooth, Config, DigitsConfig, GaugeConfig, Language, Layout, ModsConfig,
    NumericalGaugeConfig, TableConfig, TableRowConfig,
};
use crate::control_units;
use crate::crc::crc16_xmodem;
use crate::error::{Error, Result};

/// Size of the settings record in bytes.
pub const RECORD_LEN: usize = 16384;

/// Format version this codec reads and writes.
pub const FORMAT_VERSION: u8 = 5;

const PAYLOAD_LEN: usize = RECORD_LEN - 2;

const GAUGE_COUNT: usize = 3;
const NUMERICAL_GAUGE_COUNT: usize = 10;
const TABLE_COUNT: usize = 5;
const TABLE_ROWS: usize = 10;

const LABEL_LEN: usize = 30;
const UNIT_LEN: usize = 20;

/// Substring of a unit the firmware renders as the lambda symbol.
const LAMBDA_TOKEN: &str = "*lambda*";
/// Private-use code point the firmware maps to that symbol.
const LAMBDA_BYTE: u8 = 0x81;

const ALPHA_OPAQUE: u32 = 0xFF00_0000;
const RGB_MASK: u32 = 0x00FF_FFFF;

#[repr(C)]
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable)]
struct Header {
    version: u8,
    language: u8,
    autostart: u8,
    bluetooth: u8,
    car: u8,
    _reserved0: [u8; 2],
    layout: u8,
    _reserved1: u8,
    view1: u8,
    background_color: U32,
    font_color: U32,
    mods: [u8; 2],
    _reserved2: [u8; 6],
    control_units: [U16; TABLE_COUNT],
    digits_height: u8,
    digits_width: u8,
    digits_dot_width: u8,
    digits_spacing: u8,
    digits_normal_color: U32,
    digits_warning_color: U32,
}

#[repr(C)]
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable)]
struct RowRecord {
    measurement: U16,
    label: [u8; LABEL_LEN],
    unit: [u8; UNIT_LEN],
    // Gauge geometry, meaningful in rows 0..3 of the first table only.
    needle_width: u8,
    needle_height: u8,
    needle_center_x: I16,
    needle_center_y: I16,
    needle_pos_x: I16,
    needle_pos_y: I16,
    indicator_pos_x: I16,
    indicator_pos_y: I16,
    start_angle: I32,
    scale_range: I32,
    lower_limit: I32,
    upper_limit: I32,
    decimals: i8,
    factor: i8,
    pressure: i8,
    lower_warning: I32,
    upper_warning: I32,
    // Numeric readout position, meaningful in the first table only.
    numerical_position_x: I16,
    numerical_position_y: I16,
    _reserved: [u8; 3],
}

const fn row_address(table: usize, row: usize) -> usize {
    1000 * table + 100 * row + 100
}

fn parse_color(text: &str) -> Result<u32> {
    let hex = text
        .strip_prefix('#')
        .ok_or(Error::InvalidInput("color must start with '#'"))?;
    if hex.len() != 6 {
        return Err(Error::InvalidInput("color must be six hex digits"));
    }
    u32::from_str_radix(hex, 16).map_err(|_| Error::InvalidInput("color must be six hex digits"))
}

fn format_color(value: u32) -> String {
    alloc::format!("#{:06x}", value & RGB_MASK)
}

fn encode_label(label: &str, out: &mut [u8]) {
    for (slot, ch) in out.iter_mut().zip(label.chars()) {
        *slot = ch as u8;
    }
}

fn encode_unit(unit: &str, out: &mut [u8]) {
    let mut rest = unit;
    let mut cursor = 0;
    while cursor < out.len() {
        if let Some(tail) = rest.strip_prefix(LAMBDA_TOKEN) {
            out[cursor] = LAMBDA_BYTE;
            rest = tail;
        } else {
            let mut chars = rest.chars();
            let Some(ch) = chars.next() else { break };
            out[cursor] = ch as u8;
            rest = chars.as_str();
        }
        cursor += 1;
    }
}

fn decode_text(bytes: &[u8]) -> String {
    let mut text = String::new();
    for &byte in bytes {
        if byte == 0 {
            break;
        }
        if byte == LAMBDA_BYTE {
            text.push_str(LAMBDA_TOKEN);
        } else {
            text.push(byte as char);
        }
    }
    text
}

fn to_fixed(value: f32, scale: f32) -> i32 {
    let scaled = value * scale;
    if scaled >= 0.0 { (scaled + 0.5) as i32 } else { (scaled - 0.5) as i32 }
}

fn from_fixed(value: i32, scale: f32) -> f32 {
    value as f32 / scale
}

fn fold_position(gauge: &NumericalGaugeConfig) -> i16 {
    if gauge.centered { -gauge.position_x } else { gauge.position_x }
}

/// Encodes a [`Config`] into the settings record.
///
/// The element counts are wire contracts: 3 gauges, 10 numerical gauges,
/// 5 tables of 10 rows each. Anything else is rejected before a single byte
/// is written.
pub fn encode(config: &Config) -> Result<Box<[u8; RECORD_LEN]>> {
    if config.gauges.len() != GAUGE_COUNT {
        return Err(Error::InvalidInput("expected exactly 3 gauges"));
    }
    if config.numerical_gauges.len() != NUMERICAL_GAUGE_COUNT {
        return Err(Error::InvalidInput("expected exactly 10 numerical gauges"));
    }
    if config.tables.len() != TABLE_COUNT {
        return Err(Error::InvalidInput("expected exactly 5 tables"));
    }
    for table in &config.tables {
        if table.rows.len() != TABLE_ROWS {
            return Err(Error::InvalidInput("expected exactly 10 rows per table"));
        }
    }

    let mut record = Box::new([0u8; RECORD_LEN]);

    let mut header = Header::new_zeroed();
    header.version = FORMAT_VERSION;
    header.language = config.language as u8;
    header.autostart = config.autostart as u8;
    header.bluetooth = config.bluetooth as u8;
    header.car = config.car;
    header.layout = config.layout as u8;
    header.view1 = config.view1;
    header.background_color = U32::new(parse_color(&config.background_color)? | ALPHA_OPAQUE);
    header.font_color = U32::new(parse_color(&config.font_color)? & RGB_MASK);
    header.mods = config.mods.to_bits();
    for (slot, table) in header.control_units.iter_mut().zip(&config.tables) {
        let address = control_units::address_for(table.control_unit_index)
            .ok_or(Error::InvalidInput("control unit index out of range"))?;
        *slot = U16::new(address);
    }
    header.digits_height = config.digits.height;
    header.digits_width = config.digits.width;
    header.digits_dot_width = config.digits.dot_width;
    header.digits_spacing = config.digits.spacing;
    header.digits_normal_color = U32::new(parse_color(&config.digits.normal_color)? | ALPHA_OPAQUE);
    header.digits_warning_color = U32::new(parse_color(&config.digits.warning_color)? | ALPHA_OPAQUE);
    record[..size_of::<Header>()].copy_from_slice(header.as_bytes());

    for (table_index, table) in config.tables.iter().enumerate() {
        for (row_index, row) in table.rows.iter().enumerate() {
            let mut wire = RowRecord::new_zeroed();
            wire.measurement = U16::new(row.measurement);
            encode_label(&row.label, &mut wire.label);
            encode_unit(&row.unit, &mut wire.unit);
            wire.decimals = row.decimals;
            wire.factor = row.factor;
            wire.pressure = row.pressure;
            wire.lower_warning = I32::new(to_fixed(row.lower_warning, 1000.0));
            wire.upper_warning = I32::new(to_fixed(row.upper_warning, 1000.0));

            if table_index == 0 {
                let numerical = &config.numerical_gauges[row_index];
                wire.numerical_position_x = I16::new(fold_position(numerical));
                wire.numerical_position_y = I16::new(numerical.position_y);

                if row_index < GAUGE_COUNT {
                    let gauge = &config.gauges[row_index];
                    wire.needle_width = gauge.needle_width;
                    wire.needle_height = gauge.needle_height;
                    wire.needle_center_x = I16::new(gauge.needle_center_x);
                    wire.needle_center_y = I16::new(gauge.needle_center_y);
                    wire.needle_pos_x = I16::new(gauge.needle_pos_x);
                    wire.needle_pos_y = I16::new(gauge.needle_pos_y);
                    wire.indicator_pos_x = I16::new(gauge.indicator_pos_x);
                    wire.indicator_pos_y = I16::new(gauge.indicator_pos_y);
                    wire.start_angle = I32::new(to_fixed(gauge.start_angle, 10.0));
                    wire.scale_range = I32::new(to_fixed(gauge.scale_range, 10.0));
                    wire.lower_limit = I32::new(to_fixed(gauge.lower_limit, 1000.0));
                    wire.upper_limit = I32::new(to_fixed(gauge.upper_limit, 1000.0));
                }
            }

            let at = row_address(table_index, row_index);
            record[at..at + size_of::<RowRecord>()].copy_from_slice(wire.as_bytes());
        }
    }

    let crc = crc16_xmodem(&record[..PAYLOAD_LEN]);
    record[PAYLOAD_LEN..].copy_from_slice(&crc.to_le_bytes());

    Ok(record)
}

/// Decodes a settings record back into a [`Config`].
///
/// Trusts the version byte and does not verify the checksum, exactly like
/// the firmware's own loader. Use [`decode_strict`] to reject a record whose
/// trailer does not match its payload.
pub fn decode(data: &[u8]) -> Result<Config> {
    if data.len() != RECORD_LEN {
        return Err(Error::InvalidInput("settings record must be 16384 bytes"));
    }
    let version = data[0];
    if version != FORMAT_VERSION {
        return Err(Error::UnsupportedVersion { expected: FORMAT_VERSION, actual: version });
    }

    let header = Header::read_from_bytes(&data[..size_of::<Header>()]).unwrap();

    let language = Language::from_repr(header.language)
        .ok_or(Error::InvalidInput("unknown language byte"))?;
    let autostart = Autostart::from_repr(header.autostart)
        .ok_or(Error::InvalidInput("unknown autostart byte"))?;
    let bluetooth = Bluetooth::from_repr(header.bluetooth)
        .ok_or(Error::InvalidInput("unknown bluetooth byte"))?;
    let layout =
        Layout::from_repr(header.layout).ok_or(Error::InvalidInput("unknown layout byte"))?;

    let mut gauges = Vec::with_capacity(GAUGE_COUNT);
    let mut numerical_gauges = Vec::with_capacity(NUMERICAL_GAUGE_COUNT);
    let mut tables = Vec::with_capacity(TABLE_COUNT);

    for table_index in 0..TABLE_COUNT {
        let mut rows = Vec::with_capacity(TABLE_ROWS);
        for row_index in 0..TABLE_ROWS {
            let at = row_address(table_index, row_index);
            let wire = RowRecord::ref_from_bytes(&data[at..at + size_of::<RowRecord>()]).unwrap();

            rows.push(TableRowConfig {
                measurement: wire.measurement.get(),
                label: decode_text(&wire.label),
                unit: decode_text(&wire.unit),
                decimals: wire.decimals,
                factor: wire.factor,
                pressure: wire.pressure,
                lower_warning: from_fixed(wire.lower_warning.get(), 1000.0),
                upper_warning: from_fixed(wire.upper_warning.get(), 1000.0),
            });

            if table_index == 0 {
                let packed = wire.numerical_position_x.get();
                numerical_gauges.push(NumericalGaugeConfig {
                    position_x: packed.unsigned_abs() as i16,
                    position_y: wire.numerical_position_y.get(),
                    centered: packed < 0,
                });

                if row_index < GAUGE_COUNT {
                    gauges.push(GaugeConfig {
                        needle_width: wire.needle_width,
                        needle_height: wire.needle_height,
                        needle_center_x: wire.needle_center_x.get(),
                        needle_center_y: wire.needle_center_y.get(),
                        needle_pos_x: wire.needle_pos_x.get(),
                        needle_pos_y: wire.needle_pos_y.get(),
                        indicator_pos_x: wire.indicator_pos_x.get(),
                        indicator_pos_y: wire.indicator_pos_y.get(),
                        start_angle: from_fixed(wire.start_angle.get(), 10.0),
                        scale_range: from_fixed(wire.scale_range.get(), 10.0),
                        lower_limit: from_fixed(wire.lower_limit.get(), 1000.0),
                        upper_limit: from_fixed(wire.upper_limit.get(), 1000.0),
                    });
                }
            }
        }
        tables.push(TableConfig {
            // The raw wire address, not a list index; encode and decode are
            // deliberately asymmetric here.
            control_unit_index: header.control_units[table_index].get(),
            rows,
        });
    }

    info!("Parsed settings record: language={language:?}, layout={layout:?}");

    Ok(Config {
        language,
        autostart,
        bluetooth,
        car: header.car,
        layout,
        view1: header.view1,
        background_color: format_color(header.background_color.get()),
        font_color: format_color(header.font_color.get()),
        mods: ModsConfig::from_bits(header.mods),
        digits: DigitsConfig {
            height: header.digits_height,
            width: header.digits_width,
            dot_width: header.digits_dot_width,
            spacing: header.digits_spacing,
            normal_color: format_color(header.digits_normal_color.get()),
            warning_color: format_color(header.digits_warning_color.get()),
        },
        gauges,
        numerical_gauges,
        tables,
    })
}

/// [`decode`], but the payload checksum must match the trailer.
pub fn decode_strict(data: &[u8]) -> Result<Config> {
    if data.len() != RECORD_LEN {
        return Err(Error::InvalidInput("settings record must be 16384 bytes"));
    }
    let expected = u16::from_le_bytes([data[PAYLOAD_LEN], data[PAYLOAD_LEN + 1]]);
    let actual = crc16_xmodem(&data[..PAYLOAD_LEN]);
    if expected != actual {
        return Err(Error::ChecksumMismatch { expected, actual });
    }
    decode(data)
}
