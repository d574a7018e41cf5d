//! Serialized forms of tables, bindings, groups and the playback manager.
//!
//! Ids inside serialized bindings are resolved against already-loaded bodies
//! and tables. Any unresolved id fails the whole deserialization; nothing is
//! handed back partially assembled.

use futures::future::{try_join, try_join_all};
use serde::{Deserialize, Serialize};

use crate::binding::Binding;
use crate::config::{IngestConfig, TimeUnit};
use crate::error::MotionError;
use crate::group::{BindingGroup, DEFAULT_GROUP_NAME};
use crate::ids::{BodyId, TableId};
use crate::manager::PlaybackManager;
use crate::store::TableLookup;
use crate::table::MotionTable;
use crate::tabular::Cell;
use crate::target::{BodyResolver, Collaborators, Reporter};
use crate::Result;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedTable {
    pub id: TableId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Exported tabular form, header row first.
    pub csv: Vec<Vec<Cell>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedBinding {
    #[serde(alias = "objectId")]
    pub target_body_id: BodyId,
    #[serde(alias = "animationTableId")]
    pub table_id: TableId,
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub lengthen: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "animations")]
    pub bindings: Vec<SerializedBinding>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedManager {
    #[serde(default, alias = "activeAnimations")]
    pub active_groups: Vec<SerializedGroup>,
    #[serde(default, alias = "storedAnimations")]
    pub stored_groups: Vec<SerializedGroup>,
    #[serde(default)]
    pub last_time: f64,
}

impl SerializedManager {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl MotionTable {
    pub fn serialize(&self) -> SerializedTable {
        SerializedTable {
            id: self.id().clone(),
            name: self.name().to_string(),
            url: self.url().map(str::to_string),
            csv: self.to_rows(),
        }
    }

    /// Re-parse the exported rows. Their time column is already in seconds.
    pub async fn deserialize(serial: &SerializedTable, reporter: &dyn Reporter) -> Result<Self> {
        let config = IngestConfig::with_time_unit(TimeUnit::Second);
        let mut table = MotionTable::from_rows_reported(&serial.csv, &config, reporter)?
            .with_id(serial.id.clone())
            .with_name(&serial.name);
        if let Some(url) = &serial.url {
            table = table.with_url(url.clone());
        }
        Ok(table)
    }
}

impl Binding {
    pub fn serialize(&self) -> SerializedBinding {
        SerializedBinding {
            target_body_id: self.body().clone(),
            table_id: self.table().id().clone(),
            offset: self.offset(),
            lengthen: self.lengthen(),
        }
    }

    /// Resolve the body and table ids. A dangling id is sent to `reporter`
    /// and returned.
    pub async fn deserialize(
        serial: &SerializedBinding,
        bodies: &dyn BodyResolver,
        tables: &dyn TableLookup,
        reporter: &dyn Reporter,
    ) -> Result<Self> {
        if !bodies.contains(&serial.target_body_id) {
            let err = MotionError::unresolved_body(serial.target_body_id.as_str());
            reporter.error(&err);
            return Err(err);
        }
        let Some(table) = tables.table(&serial.table_id) else {
            let err = MotionError::unresolved_table(serial.table_id.as_str());
            reporter.error(&err);
            return Err(err);
        };
        Ok(Binding::with_timing(
            serial.target_body_id.clone(),
            table,
            serial.offset,
            serial.lengthen,
        ))
    }
}

impl BindingGroup {
    pub fn serialize(&self) -> SerializedGroup {
        SerializedGroup {
            name: Some(self.name().to_string()),
            bindings: self.bindings().iter().map(Binding::serialize).collect(),
        }
    }

    /// Resolve every member concurrently; the first failure fails the group.
    pub async fn deserialize(
        serial: &SerializedGroup,
        bodies: &dyn BodyResolver,
        tables: &dyn TableLookup,
        reporter: &dyn Reporter,
    ) -> Result<Self> {
        let bindings = try_join_all(
            serial
                .bindings
                .iter()
                .map(|b| Binding::deserialize(b, bodies, tables, reporter)),
        )
        .await?;
        let name = serial.name.as_deref().unwrap_or(DEFAULT_GROUP_NAME);
        Ok(BindingGroup::with_bindings(name, bindings))
    }
}

impl PlaybackManager {
    pub fn serialize(&self) -> SerializedManager {
        SerializedManager {
            active_groups: self.active_groups().map(BindingGroup::serialize).collect(),
            stored_groups: self.stored_groups().map(BindingGroup::serialize).collect(),
            last_time: self.time(),
        }
    }

    /// Rebuild a manager. Both partitions are resolved concurrently and any
    /// failure is reported through the collaborators' reporter and returned
    /// before a manager exists.
    pub async fn deserialize(
        serial: &SerializedManager,
        bodies: &dyn BodyResolver,
        tables: &dyn TableLookup,
        collaborators: Collaborators,
    ) -> Result<Self> {
        let reporter = collaborators.reporter.as_ref();
        let active = try_join_all(
            serial
                .active_groups
                .iter()
                .map(|g| BindingGroup::deserialize(g, bodies, tables, reporter)),
        );
        let stored = try_join_all(
            serial
                .stored_groups
                .iter()
                .map(|g| BindingGroup::deserialize(g, bodies, tables, reporter)),
        );
        let (active, stored) = try_join(active, stored).await?;

        let mut manager = PlaybackManager::new(collaborators);
        for group in active {
            manager.add_active(group);
        }
        for group in stored {
            manager.add_stored(group);
        }
        if serial.last_time != 0.0 {
            manager.restore_time(serial.last_time);
        }
        Ok(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_field_names_are_accepted() {
        let json = r#"{
            "activeAnimations": [
                {"name": "g", "animations": [
                    {"objectId": "r1", "animationTableId": "t1", "offset": 1.5, "lengthen": 0}
                ]}
            ],
            "storedAnimations": [],
            "lastTime": 2
        }"#;
        let serial = SerializedManager::from_json(json).unwrap();
        let binding = &serial.active_groups[0].bindings[0];
        assert_eq!(binding.target_body_id, BodyId::from("r1"));
        assert_eq!(binding.table_id, TableId::from("t1"));
        assert_eq!(binding.offset, 1.5);
        assert_eq!(serial.last_time, 2.0);
    }

    #[test]
    fn current_field_names_are_written() {
        let serial = SerializedManager {
            active_groups: vec![SerializedGroup {
                name: None,
                bindings: vec![SerializedBinding {
                    target_body_id: "r".into(),
                    table_id: "t".into(),
                    offset: 0.0,
                    lengthen: 0.0,
                }],
            }],
            ..SerializedManager::default()
        };
        let json = serial.to_json().unwrap();
        assert!(json.contains("\"activeGroups\""));
        assert!(json.contains("\"targetBodyId\""));
        assert!(json.contains("\"tableId\""));
        assert!(json.contains("\"lastTime\""));
    }

    #[test]
    fn bad_json_is_a_serialization_error() {
        let err = SerializedManager::from_json("{").unwrap_err();
        assert_eq!(err.category(), "serialization");
    }
}
