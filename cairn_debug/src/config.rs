// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persisted debug settings read from JSON.
//!
//! [`JsonSettings`] implements [`SettingsSource`] over a JSON object. Keys
//! may be written flat (`"navigation/3d/debug/agents/enable_paths": true`)
//! or as nested objects split on `/`. Colors are `[r, g, b]` or
//! `[r, g, b, a]` arrays of floats in `0.0..=1.0`.
//!
//! Unknown keys are ignored. Through [`SettingsSource`], values of the wrong
//! type are logged and treated as missing, so the default stays in place;
//! [`JsonSettings::validate`] reports them as errors instead.

use std::fmt;
use std::io::Read;

use serde_json::{Map, Value};

use cairn_core::color::Color;
use cairn_core::settings::{BOOL_KEYS, COLOR_KEYS, PATH_POINT_SIZE_KEY, SettingsSource};

/// Error loading a settings document.
#[derive(Debug)]
pub enum ConfigError {
    /// The document is not valid JSON.
    Parse(serde_json::Error),
    /// The document parsed, but its root is not an object.
    NotAnObject,
    /// A known key holds a value of the wrong type.
    WrongType {
        /// The offending key.
        key: String,
        /// What the key should hold.
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "malformed settings document: {err}"),
            Self::NotAnObject => f.write_str("settings document root must be an object"),
            Self::WrongType { key, expected } => write!(f, "setting {key}: expected {expected}"),
        }
    }
}

impl core::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::NotAnObject | Self::WrongType { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// A [`SettingsSource`] backed by a JSON object.
#[derive(Clone, Debug, Default)]
pub struct JsonSettings {
    root: Map<String, Value>,
}

impl JsonSettings {
    /// Wraps an already-parsed document.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    /// Parses a document from a string.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Parses a document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    /// Checks every known key that is present for a value of the right type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let wrong = |key: &str, expected| ConfigError::WrongType {
            key: key.into(),
            expected,
        };
        for &(key, _) in BOOL_KEYS {
            if self.lookup(key).is_some_and(|v| !v.is_boolean()) {
                return Err(wrong(key, BOOLEAN));
            }
        }
        for &(key, _) in COLOR_KEYS {
            if self.lookup(key).is_some_and(|v| parse_color(v).is_none()) {
                return Err(wrong(key, COLOR));
            }
        }
        if self.lookup(PATH_POINT_SIZE_KEY).is_some_and(|v| !v.is_number()) {
            return Err(wrong(PATH_POINT_SIZE_KEY, NUMBER));
        }
        Ok(())
    }

    /// Looks up `key`, first as a flat key, then as a `/`-separated path.
    fn lookup(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.root.get(key) {
            return Some(value);
        }
        let mut parts = key.split('/');
        let mut value = self.root.get(parts.next()?)?;
        for part in parts {
            value = value.as_object()?.get(part)?;
        }
        Some(value)
    }
}

const BOOLEAN: &str = "a boolean";
const COLOR: &str = "an [r, g, b, a] array";
const NUMBER: &str = "a number";

fn wrong_type(key: &str, expected: &str, value: &Value) {
    log::warn!("setting {key}: expected {expected}, found {value}");
}

#[expect(clippy::cast_possible_truncation, reason = "color channels are unit floats")]
fn parse_color(value: &Value) -> Option<Color> {
    let items = value.as_array()?;
    if !(3..=4).contains(&items.len()) {
        return None;
    }
    let mut rgba = [1.0_f32; 4];
    for (slot, item) in rgba.iter_mut().zip(items) {
        *slot = item.as_f64()? as f32;
    }
    let [r, g, b, a] = rgba;
    Some(Color::new(r, g, b, a))
}

impl SettingsSource for JsonSettings {
    fn get_bool(&self, key: &str) -> Option<bool> {
        let value = self.lookup(key)?;
        let b = value.as_bool();
        if b.is_none() {
            wrong_type(key, BOOLEAN, value);
        }
        b
    }

    fn get_color(&self, key: &str) -> Option<Color> {
        let value = self.lookup(key)?;
        let color = parse_color(value);
        if color.is_none() {
            wrong_type(key, COLOR, value);
        }
        color
    }

    fn get_float(&self, key: &str) -> Option<f64> {
        let value = self.lookup(key)?;
        let f = value.as_f64();
        if f.is_none() {
            wrong_type(key, NUMBER, value);
        }
        f
    }
}
