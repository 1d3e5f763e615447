//! Editor boundary: turning user input into typed setting values
//!
//! Every configuration surface converts raw input through [`parse_input`],
//! so the store only ever receives values of the descriptor's kind.

use anyhow::{bail, Result};

use super::catalog::{SettingDescriptor, SettingId, SettingKind, SettingValue};
use super::store::SharedSettings;

/// Parse raw text entered for `descriptor` into a value of its kind
///
/// Enum settings with an option list only accept listed options; enum
/// settings without one take any text.
pub fn parse_input(descriptor: &SettingDescriptor, input: &str) -> Result<SettingValue> {
    let input = input.trim();
    match descriptor.kind {
        SettingKind::Number => {
            let Ok(n) = input.parse::<f64>() else {
                bail!("'{input}' is not a number (setting {})", descriptor.id);
            };
            if !n.is_finite() {
                bail!("'{input}' is not a finite number (setting {})", descriptor.id);
            }
            Ok(SettingValue::Number(n))
        }
        SettingKind::Boolean => match input.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(SettingValue::Boolean(true)),
            "false" | "0" | "no" | "off" => Ok(SettingValue::Boolean(false)),
            _ => bail!("'{input}' is not a boolean (setting {})", descriptor.id),
        },
        SettingKind::Enum => {
            if let Some(options) = descriptor.options {
                if !options.contains(&input) {
                    bail!(
                        "'{input}' is not a valid option for {} (expected one of: {})",
                        descriptor.id,
                        options.join(", ")
                    );
                }
            }
            Ok(SettingValue::Enum(input.to_string()))
        }
    }
}

/// Parse `input` for setting `id` and store it; invalid input leaves the
/// current value untouched
pub fn apply_input(settings: &SharedSettings, id: SettingId, input: &str) -> Result<SettingValue> {
    let catalog = settings.catalog();
    let value = parse_input(catalog.descriptor(id), input)?;
    settings.set_value(id, value.clone());
    Ok(value)
}

/// One-line summary of a setting for terminal listings
pub fn describe(descriptor: &SettingDescriptor, value: &SettingValue, overridden: bool) -> String {
    let mut line = format!("{} = {}", descriptor.id, value);
    if overridden {
        line.push_str(&format!(" (default: {})", descriptor.default_value));
    }
    if let Some(options) = descriptor.options {
        line.push_str(&format!(" [{}]", options.join(" | ")));
    } else {
        line.push_str(&format!(" <{}>", descriptor.kind));
    }
    line
}
