//! Minimal RO-Crate 1.1 model.
//!
//! An RO-Crate is a directory with an `ro-crate-metadata.json` JSON-LD
//! descriptor plus, optionally, the physical payload the metadata talks
//! about. This crate keeps the model deliberately small: a flat entity
//! graph keyed by `@id`, helpers for the entity shapes the generator
//! needs (File, Dataset, Person, contextual entities, the workflow), and
//! a single `write()` that stages payload copies and serializes the graph
//! in one pass at the very end of a run.

use chrono::{SecondsFormat, Utc};
use provcrate_core::error::{CrateError, CrateResult};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const METADATA_FILENAME: &str = "ro-crate-metadata.json";
const CONTEXT: &str = "https://w3id.org/ro/crate/1.1/context";
const SPEC_ID: &str = "https://w3id.org/ro/crate/1.1";

/// Current time in the ISO-8601 second-resolution form used throughout
/// the metadata.
pub fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// One node of the JSON-LD graph.
#[derive(Debug, Clone)]
pub struct Entity {
    id: String,
    types: Vec<String>,
    properties: Map<String, Value>,
}

impl Entity {
    pub fn new(id: impl Into<String>, types: &[&str]) -> Self {
        Self {
            id: id.into(),
            types: types.iter().map(|t| t.to_string()).collect(),
            properties: Map::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set a property, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Append to a property, promoting an existing scalar to an array.
    pub fn append_to(&mut self, key: &str, value: Value) -> &mut Self {
        match self.properties.get_mut(key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                self.properties
                    .insert(key.to_string(), Value::Array(vec![first, value]));
            }
            None => {
                self.properties
                    .insert(key.to_string(), Value::Array(vec![value]));
            }
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    fn to_json(&self) -> Value {
        let mut node = Map::new();
        node.insert("@id".into(), Value::String(self.id.clone()));
        let types: Value = if self.types.len() == 1 {
            Value::String(self.types[0].clone())
        } else {
            Value::Array(self.types.iter().map(|t| json!(t)).collect())
        };
        node.insert("@type".into(), types);
        for (key, value) in &self.properties {
            node.insert(key.clone(), value.clone());
        }
        Value::Object(node)
    }
}

/// Shorthand for a `{"@id": ...}` reference object.
pub fn reference(id: &str) -> Value {
    json!({ "@id": id })
}

// ---------------------------------------------------------------------------
// Payload staging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Payload {
    /// Copy a real file into the crate at `dest`.
    Copy { source: PathBuf, dest: String },
    /// Create an empty marker file (represents an empty directory).
    Placeholder { dest: String },
}

// ---------------------------------------------------------------------------
// Crate
// ---------------------------------------------------------------------------

/// An RO-Crate under construction.
///
/// Entities are added at most once per `@id`; a second addition is
/// ignored and reported via the return value, which matches how INOUT
/// files surface both as inputs and outputs without duplicating nodes.
pub struct RoCrate {
    root: Entity,
    entities: Vec<Entity>,
    ids: HashSet<String>,
    payloads: Vec<Payload>,
}

impl Default for RoCrate {
    fn default() -> Self {
        Self::new()
    }
}

impl RoCrate {
    pub fn new() -> Self {
        let mut root = Entity::new("./", &["Dataset"]);
        root.set("datePublished", json!(iso_now()));
        Self {
            root,
            entities: Vec::new(),
            ids: HashSet::new(),
            payloads: Vec::new(),
        }
    }

    /// The root dataset (`./`).
    pub fn root_mut(&mut self) -> &mut Entity {
        &mut self.root
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Add an entity. Returns false (and keeps the first one) when the id
    /// is already present.
    pub fn add(&mut self, entity: Entity) -> bool {
        if !self.ids.insert(entity.id.clone()) {
            tracing::debug!(id = %entity.id, "entity already present, keeping first");
            return false;
        }
        self.entities.push(entity);
        true
    }

    /// Add a File entity that references data by location only.
    pub fn add_file(&mut self, id: &str, entity: Entity) -> bool {
        debug_assert_eq!(id, entity.id);
        self.add_data_entity(entity)
    }

    /// Add a File entity whose content is copied into the crate at the
    /// entity id (a crate-relative path).
    pub fn add_file_from(&mut self, source: &Path, entity: Entity) -> bool {
        let dest = entity.id.clone();
        if self.add_data_entity(entity) {
            self.payloads.push(Payload::Copy {
                source: source.to_path_buf(),
                dest,
            });
            return true;
        }
        false
    }

    /// Add a File entity backed by an empty marker file.
    pub fn add_placeholder_file(&mut self, entity: Entity) -> bool {
        let dest = entity.id.clone();
        if self.add_data_entity(entity) {
            self.payloads.push(Payload::Placeholder { dest });
            return true;
        }
        false
    }

    /// Add a Dataset (directory) entity. Dataset ids always end in `/`.
    pub fn add_dataset(&mut self, entity: Entity) -> bool {
        debug_assert!(entity.id.ends_with('/'));
        self.add_data_entity(entity)
    }

    /// Data entities hang off the root dataset through `hasPart`.
    fn add_data_entity(&mut self, entity: Entity) -> bool {
        let id = entity.id.clone();
        if self.add(entity) {
            self.root.append_to("hasPart", reference(&id));
            return true;
        }
        false
    }

    /// Add the main workflow file and wire it as the root's `mainEntity`,
    /// together with its `ComputerLanguage` entity.
    pub fn add_workflow(
        &mut self,
        source: Option<&Path>,
        entity: Entity,
        language_name: &str,
        language_id: &str,
        language_version: &str,
    ) -> bool {
        let id = entity.id.clone();
        let mut entity = entity;
        entity.set("programmingLanguage", reference(language_id));

        let added = match source {
            Some(source) => self.add_file_from(source, entity),
            None => self.add_data_entity(entity),
        };
        if added {
            let mut language = Entity::new(language_id, &["ComputerLanguage"]);
            language
                .set("name", json!(language_name))
                .set("version", json!(language_version));
            self.add(language);
            self.root.set("mainEntity", reference(&id));
        }
        added
    }

    /// Serialize the metadata descriptor and graph, staging payload
    /// copies first. The crate directory is created here; nothing is
    /// written before this call.
    pub fn write(&self, dir: &Path) -> CrateResult<()> {
        std::fs::create_dir_all(dir)?;

        for payload in &self.payloads {
            match payload {
                Payload::Copy { source, dest } => {
                    let target = dir.join(dest);
                    if let Some(parent) = target.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::copy(source, &target).map_err(|e| {
                        CrateError::Filesystem(format!(
                            "cannot copy {} into the crate: {e}",
                            source.display()
                        ))
                    })?;
                }
                Payload::Placeholder { dest } => {
                    let target = dir.join(dest);
                    if let Some(parent) = target.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    File::create(&target)?;
                }
            }
        }

        let file = File::create(dir.join(METADATA_FILENAME))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.to_json())?;
        writer.flush()?;

        tracing::info!(
            dir = %dir.display(),
            entities = self.entities.len() + 2,
            payloads = self.payloads.len(),
            "crate written"
        );
        Ok(())
    }

    fn to_json(&self) -> Value {
        let mut descriptor = Entity::new(METADATA_FILENAME, &["CreativeWork"]);
        descriptor
            .set("conformsTo", reference(SPEC_ID))
            .set("about", reference("./"));

        let mut graph = vec![descriptor.to_json(), self.root.to_json()];
        graph.extend(self.entities.iter().map(Entity::to_json));

        json!({
            "@context": CONTEXT,
            "@graph": graph,
        })
    }
}
