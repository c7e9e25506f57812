//! Declarative cursor configuration.

use crate::descriptor::{DescriptorTable, ValueKind};
use crate::error::{CursorError, CursorResult};
use crate::record::{TIMESTAMP_WIDTH, TS_WIDTH};

/// One property declaration, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyConfig {
    pub id: i64,
    /// Record offset of the property's slot.
    pub offset: usize,
    /// Slot size in bytes. Negative ids grow the per-event cleared region
    /// to cover `offset + size`.
    pub size: usize,
    /// Kind name: `"string"`, `"integer"`, `"factor"`, `"float"`,
    /// `"boolean"` or `""`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: String,
}

impl PropertyConfig {
    #[must_use]
    pub fn new(id: i64, offset: usize, size: usize, kind: &str) -> Self {
        Self {
            id,
            offset,
            size,
            kind: kind.to_owned(),
        }
    }

    #[must_use]
    pub fn value_kind(&self) -> ValueKind {
        ValueKind::from_name(&self.kind)
    }
}

/// Everything needed to build a configured cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CursorConfig {
    pub min_property_id: i32,
    pub max_property_id: i32,
    /// Total record size in bytes.
    pub data_size: usize,
    pub timestamp_offset: usize,
    pub ts_offset: usize,
    /// Idle gap that ends a session; 0 disables sessionization.
    pub session_idle_secs: u32,
    pub properties: Vec<PropertyConfig>,
}

impl CursorConfig {
    /// Checks the id range, every property id and every record slot.
    pub fn validate(&self) -> CursorResult<()> {
        let table = DescriptorTable::new(self.min_property_id, self.max_property_id)?;
        self.check_slot(self.timestamp_offset, TIMESTAMP_WIDTH)?;
        self.check_slot(self.ts_offset, TS_WIDTH)?;
        let (min, max) = table.padded_range();
        for property in &self.properties {
            if !(min..=max).contains(&property.id) {
                return Err(CursorError::PropertyOutOfRange {
                    id: property.id,
                    min,
                    max,
                });
            }
            let width = property.value_kind().width().max(property.size);
            self.check_slot(property.offset, width)?;
        }
        Ok(())
    }

    fn check_slot(&self, offset: usize, width: usize) -> CursorResult<()> {
        let fits = offset
            .checked_add(width)
            .is_some_and(|end| end <= self.data_size);
        if fits {
            Ok(())
        } else {
            Err(CursorError::SlotOutOfBounds {
                offset,
                width,
                data_size: self.data_size,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CursorConfig {
        CursorConfig {
            min_property_id: -1,
            max_property_id: 1,
            data_size: 32,
            timestamp_offset: 16,
            ts_offset: 24,
            session_idle_secs: 0,
            properties: vec![
                PropertyConfig::new(-1, 0, 8, "string"),
                PropertyConfig::new(1, 8, 4, "integer"),
            ],
        }
    }

    #[test]
    fn sample_is_valid() {
        sample().validate().unwrap();
    }

    #[test]
    fn slot_past_record_is_rejected() {
        let mut config = sample();
        config.properties.push(PropertyConfig::new(0, 30, 8, "float"));
        assert_eq!(
            config.validate().unwrap_err(),
            CursorError::SlotOutOfBounds {
                offset: 30,
                width: 8,
                data_size: 32
            }
        );
    }

    #[test]
    fn kind_width_overrides_short_size() {
        let mut config = sample();
        config.properties.push(PropertyConfig::new(0, 28, 1, "float"));
        assert!(matches!(
            config.validate(),
            Err(CursorError::SlotOutOfBounds { width: 8, .. })
        ));
    }

    #[test]
    fn id_beyond_padding_is_rejected() {
        let mut config = sample();
        config.properties.push(PropertyConfig::new(100, 0, 0, ""));
        assert!(matches!(
            config.validate(),
            Err(CursorError::PropertyOutOfRange { id: 100, .. })
        ));
    }

    #[test]
    fn timestamp_slot_is_checked() {
        let mut config = sample();
        config.ts_offset = 28;
        assert!(config.validate().is_err());
    }

    #[test]
    fn kind_names_resolve() {
        assert_eq!(
            PropertyConfig::new(1, 0, 4, "factor").value_kind(),
            ValueKind::Integer
        );
    }
}
