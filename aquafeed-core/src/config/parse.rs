//! Simple TOML parser for feeder configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `feeder.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - `[timing]`, `[relay]` and `[servo]` section headers
//! - `key = integer` pairs, decimal or `0x` hex, with `_` separators
//! - Comments (`# ...`), whole-line or trailing
//!
//! Unknown sections and keys are rejected so a typo cannot silently fall
//! back to a default pump count.

use super::hardware::FeederConfig;
use super::timing::ConfigError;

/// What went wrong on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseErrorKind {
    /// Malformed `[section]` header
    InvalidSection,
    /// Section name not recognised
    UnknownSection,
    /// Key not recognised in its section
    UnknownKey,
    /// Line is not `key = value`
    ExpectedKeyValue,
    /// Key/value pair before any section header
    KeyOutsideSection,
    /// Value is not an integer or does not fit the field
    InvalidValue,
    /// Parsed values violate a config invariant (line 0)
    Invalid(ConfigError),
}

/// Parse error with the 1-based line it occurred on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseError {
    /// Line number, or 0 for whole-file validation errors
    pub line: usize,
    /// Error kind
    pub kind: ParseErrorKind,
}

impl ParseError {
    fn at(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if let ParseErrorKind::Invalid(e) = self.kind {
            return write!(f, "invalid config: {}", e);
        }
        let msg = match self.kind {
            ParseErrorKind::InvalidSection => "malformed section header",
            ParseErrorKind::UnknownSection => "unknown section",
            ParseErrorKind::UnknownKey => "unknown key",
            ParseErrorKind::ExpectedKeyValue => "expected key = value",
            ParseErrorKind::KeyOutsideSection => "key outside of a section",
            ParseErrorKind::InvalidValue => "invalid value",
            ParseErrorKind::Invalid(_) => "",
        };
        write!(f, "line {}: {}", self.line, msg)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Timing,
    Relay,
    Servo,
}

/// Parse configuration text into a validated [`FeederConfig`]
///
/// Keys that are not present keep their default values.
pub fn parse_config(input: &str) -> Result<FeederConfig, ParseError> {
    let mut config = FeederConfig::default();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        // Check for section header
        if line.starts_with('[') {
            section = parse_section_header(line)
                .map_err(|kind| ParseError::at(line_no, kind))?;
            continue;
        }

        let (key, value) = parse_key_value(line)
            .ok_or(ParseError::at(line_no, ParseErrorKind::ExpectedKeyValue))?;

        apply_value(section, key, value, &mut config)
            .map_err(|kind| ParseError::at(line_no, kind))?;
    }

    config
        .validate()
        .map_err(|e| ParseError::at(0, ParseErrorKind::Invalid(e)))?;

    Ok(config)
}

/// Drop a trailing `# comment`
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse a section header like `[timing]`
fn parse_section_header(line: &str) -> Result<Section, ParseErrorKind> {
    if !line.ends_with(']') || line.len() < 3 {
        return Err(ParseErrorKind::InvalidSection);
    }

    match line[1..line.len() - 1].trim() {
        "timing" => Ok(Section::Timing),
        "relay" => Ok(Section::Relay),
        "servo" => Ok(Section::Servo),
        "" => Err(ParseErrorKind::InvalidSection),
        _ => Err(ParseErrorKind::UnknownSection),
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse an unsigned integer (decimal or 0x hex, `_` separators allowed)
fn parse_uint(value: &str) -> Result<u64, ParseErrorKind> {
    let (digits, radix) = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };

    if digits.is_empty() || digits.starts_with('_') {
        return Err(ParseErrorKind::InvalidValue);
    }

    let mut result: u64 = 0;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(radix).ok_or(ParseErrorKind::InvalidValue)?;
        result = result
            .checked_mul(radix as u64)
            .and_then(|r| r.checked_add(digit as u64))
            .ok_or(ParseErrorKind::InvalidValue)?;
    }
    Ok(result)
}

fn parse_int<T: TryFrom<u64>>(value: &str) -> Result<T, ParseErrorKind> {
    T::try_from(parse_uint(value)?).map_err(|_| ParseErrorKind::InvalidValue)
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut FeederConfig,
) -> Result<(), ParseErrorKind> {
    match section {
        Section::Root => Err(ParseErrorKind::KeyOutsideSection),
        Section::Timing => {
            let t = &mut config.timing;
            match key {
                "prime_in_cycles" => t.prime_in_cycles = parse_int(value)?,
                "prime_out_cycles" => t.prime_out_cycles = parse_int(value)?,
                "pump_on_ms" => t.pump_on_ms = parse_int(value)?,
                "pump_off_ms" => t.pump_off_ms = parse_int(value)?,
                "feeder_repeat" => t.feeder_repeat = parse_int(value)?,
                "servo_settle_ms" => t.servo_settle_ms = parse_int(value)?,
                "stream_out_cycles" => t.stream_out_cycles = parse_int(value)?,
                "stream_in_cycles" => t.stream_in_cycles = parse_int(value)?,
                "stream_repeat_cycles" => t.stream_repeat_cycles = parse_int(value)?,
                "clean_in_cycles" => t.clean_in_cycles = parse_int(value)?,
                "clean_out_cycles" => t.clean_out_cycles = parse_int(value)?,
                "clean_repeat_cycles" => t.clean_repeat_cycles = parse_int(value)?,
                "final_clean_cycles" => t.final_clean_cycles = parse_int(value)?,
                _ => return Err(ParseErrorKind::UnknownKey),
            }
            Ok(())
        }
        Section::Relay => {
            let r = &mut config.relay;
            match key {
                "address" => r.address = parse_int(value)?,
                "air_pump_register" => r.air_pump_register = parse_int(value)?,
                "inlet_solenoid_register" => r.inlet_solenoid_register = parse_int(value)?,
                "inlet_pump_register" => r.inlet_pump_register = parse_int(value)?,
                "outlet_pump_register" => r.outlet_pump_register = parse_int(value)?,
                "on_value" => r.on_value = parse_int(value)?,
                "off_value" => r.off_value = parse_int(value)?,
                _ => return Err(ParseErrorKind::UnknownKey),
            }
            Ok(())
        }
        Section::Servo => match key {
            "frame_hz" => {
                config.servo.frame_hz = parse_int(value)?;
                Ok(())
            }
            _ => Err(ParseErrorKind::UnknownKey),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uint() {
        assert_eq!(parse_uint("15"), Ok(15));
        assert_eq!(parse_uint("0x10"), Ok(0x10));
        assert_eq!(parse_uint("0xFF"), Ok(255));
        assert_eq!(parse_uint("1_000"), Ok(1000));
        assert_eq!(parse_uint("-1"), Err(ParseErrorKind::InvalidValue));
        assert_eq!(parse_uint("0x"), Err(ParseErrorKind::InvalidValue));
        assert_eq!(parse_uint("0.5"), Err(ParseErrorKind::InvalidValue));
    }

    #[test]
    fn test_parse_int_range() {
        assert_eq!(parse_int::<u8>("255"), Ok(255u8));
        assert_eq!(parse_int::<u8>("256"), Err(ParseErrorKind::InvalidValue));
        assert_eq!(parse_int::<u16>("65535"), Ok(65535u16));
    }

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("[timing]"), Ok(Section::Timing));
        assert_eq!(parse_section_header("[ relay ]"), Ok(Section::Relay));
        assert_eq!(parse_section_header("[servo]"), Ok(Section::Servo));
        assert_eq!(
            parse_section_header("[heater]"),
            Err(ParseErrorKind::UnknownSection)
        );
        assert_eq!(
            parse_section_header("[timing"),
            Err(ParseErrorKind::InvalidSection)
        );
        assert_eq!(parse_section_header("[]"), Err(ParseErrorKind::InvalidSection));
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# Feeder configuration
[timing]
prime_in_cycles = 2
prime_out_cycles = 1   # drain once
pump_on_ms = 10
pump_off_ms = 10
feeder_repeat = 1
stream_out_cycles = 1
stream_in_cycles = 1
stream_repeat_cycles = 1
clean_repeat_cycles = 0
final_clean_cycles = 0

[relay]
address = 0x20
on_value = 0x01

[servo]
frame_hz = 50
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.timing.prime_in_cycles, 2);
        assert_eq!(config.timing.prime_out_cycles, 1);
        assert_eq!(config.timing.pump_on_ms, 10);
        assert_eq!(config.timing.clean_repeat_cycles, 0);
        // Untouched keys keep defaults
        assert_eq!(config.timing.clean_in_cycles, 9);
        assert_eq!(config.relay.address, 0x20);
        assert_eq!(config.relay.on_value, 0x01);
        assert_eq!(config.relay.off_value, 0x00);
        assert_eq!(config.servo.frame_hz, 50);
    }

    #[test]
    fn test_empty_input_is_default() {
        assert_eq!(parse_config("").unwrap(), FeederConfig::default());
    }

    #[test]
    fn test_unknown_key_reports_line() {
        let err = parse_config("[timing]\nprime_cycles = 3\n").unwrap_err();
        assert_eq!(err, ParseError::at(2, ParseErrorKind::UnknownKey));
    }

    #[test]
    fn test_key_outside_section() {
        let err = parse_config("pump_on_ms = 3\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::KeyOutsideSection);
    }

    #[test]
    fn test_missing_equals() {
        let err = parse_config("[timing]\npump_on_ms 3\n").unwrap_err();
        assert_eq!(err, ParseError::at(2, ParseErrorKind::ExpectedKeyValue));
    }

    #[test]
    fn test_frame_rate_bound_applied() {
        let err = parse_config("[servo]\nframe_hz = 50000\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::at(0, ParseErrorKind::Invalid(ConfigError::FrameRateTooHigh(50_000)))
        );
    }

    #[test]
    fn test_validation_applied() {
        let err = parse_config("[timing]\npump_off_ms = 0\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::at(
                0,
                ParseErrorKind::Invalid(ConfigError::ZeroDuration("pump_off_ms"))
            )
        );
    }
}
