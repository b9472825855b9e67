//! User configuration (`ro-crate-info.yaml`).
//!
//! A flat YAML mapping describing the run: crate metadata, declared source
//! files, optional manual input/output overrides, and the people behind the
//! workflow. Legacy keys `files` and `sources_dir` are still accepted and
//! merged into `sources`.

use provcrate_core::error::{CrateError, CrateResult};
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// A YAML value that may be a single item or a list of items.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Section<T> {
    One(T),
    Many(Vec<T>),
}

impl<T: Clone> Section<T> {
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            Section::One(item) => vec![item.clone()],
            Section::Many(items) => items.clone(),
        }
    }
}

/// One author (or submitter) record.
#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub name: String,
    /// ORCID URL; the mandatory stable identifier of the person.
    pub orcid: String,
    #[serde(rename = "e-mail")]
    pub email: Option<String>,
    pub organisation_name: Option<String>,
    /// ROR URL of the affiliation; requires `organisation_name`.
    pub ror: Option<String>,
}

/// Parsed and validated run configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    pub license: Option<String>,

    pub sources: Option<Section<String>>,
    /// Legacy alias for `sources`.
    pub files: Option<Section<String>>,
    /// Legacy alias for `sources`.
    pub sources_dir: Option<Section<String>>,
    pub sources_main_file: Option<String>,

    #[serde(default)]
    pub data_persistence: bool,

    pub inputs: Option<Section<String>>,
    pub outputs: Option<Section<String>>,

    #[serde(rename = "Authors")]
    pub authors: Option<Section<Author>>,
    #[serde(rename = "Submitter")]
    pub submitter: Option<Author>,
}

impl RunConfig {
    /// Load and validate a configuration file.
    ///
    /// A missing file writes a template next to the expected path as a
    /// remediation aid, then aborts.
    pub fn load(path: &Path) -> CrateResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let template = path.with_file_name(TEMPLATE_FILENAME);
                std::fs::write(&template, TEMPLATE)?;
                return Err(CrateError::Config(format!(
                    "configuration file {} not found; a template has been generated at {}",
                    path.display(),
                    template.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let config: RunConfig = serde_yaml::from_str(&text)?;
        config.validate()?;

        tracing::debug!(
            path = %path.display(),
            authors = config.authors().len(),
            persistence = config.data_persistence,
            "configuration loaded"
        );

        Ok(config)
    }

    /// Declared authors; a single mapping is accepted as well as a list.
    pub fn authors(&self) -> Vec<Author> {
        self.authors.as_ref().map(Section::to_vec).unwrap_or_default()
    }

    /// Declared source paths: `sources` plus both legacy aliases, in
    /// declaration order.
    pub fn declared_sources(&self) -> Vec<String> {
        let mut list = Vec::new();
        for section in [&self.sources, &self.files, &self.sources_dir]
            .into_iter()
            .flatten()
        {
            list.extend(section.to_vec());
        }
        list
    }

    /// True when any of the source keys is present, even if empty.
    pub fn has_sources_key(&self) -> bool {
        self.sources.is_some() || self.files.is_some() || self.sources_dir.is_some()
    }

    pub fn declared_inputs(&self) -> Vec<String> {
        self.inputs.as_ref().map(Section::to_vec).unwrap_or_default()
    }

    pub fn declared_outputs(&self) -> Vec<String> {
        self.outputs.as_ref().map(Section::to_vec).unwrap_or_default()
    }

    /// Structural validation beyond what deserialization enforces.
    fn validate(&self) -> CrateResult<()> {
        for author in &self.authors() {
            validate_person(author, "Author")?;
        }
        if let Some(submitter) = &self.submitter {
            validate_person(submitter, "Submitter")?;
            // The run record wires the submitter's contact and
            // affiliation, so the optional fields become required here.
            for (field, value) in [
                ("e-mail", &submitter.email),
                ("organisation_name", &submitter.organisation_name),
                ("ror", &submitter.ror),
            ] {
                if value.is_none() {
                    return Err(CrateError::Config(format!(
                        "'{field}' must be defined for the Submitter"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn validate_person(person: &Author, section: &str) -> CrateResult<()> {
    if person.name.is_empty() {
        return Err(CrateError::Config(format!(
            "both 'orcid' and 'name' must be defined together for an {section}"
        )));
    }
    Url::parse(&person.orcid).map_err(|e| {
        CrateError::Config(format!(
            "{section} '{}' has an invalid orcid URL ({}): {e}",
            person.name, person.orcid
        ))
    })?;
    if let Some(ror) = &person.ror {
        if person.organisation_name.is_none() {
            return Err(CrateError::Config(format!(
                "both 'ror' and 'organisation_name' must be defined together for an {section} organisation"
            )));
        }
        Url::parse(ror).map_err(|e| {
            CrateError::Config(format!(
                "{section} '{}' has an invalid ror URL ({ror}): {e}",
                person.name
            ))
        })?;
    }
    Ok(())
}

/// Filename of the generated remediation template.
pub const TEMPLATE_FILENAME: &str = "ro-crate-info_TEMPLATE.yaml";

/// Where the generated template lands for a given configuration path.
pub fn template_path(config_path: &Path) -> PathBuf {
    config_path.with_file_name(TEMPLATE_FILENAME)
}

const TEMPLATE: &str = "\
name: Name of your workflow application
description: Detailed description of your workflow application
license: Apache-2.0
# URL preferred, but plain SPDX identifiers are accepted.
sources: [/absolute_path_to/dir_1/, relative_path_to/dir_2/, main_file.py, relative_path/aux_file_1.py, /abs_path/aux_file_2.py]
# List of application source files and directories. Relative or absolute paths can be used.
sources_main_file: my_main_file.py
# Optional: manually specify the name of the main file of the application, located in one of the 'sources' defined.
# Relative paths from a 'sources' entry, or absolute paths can be used.
data_persistence: false
# True to include all input and output files of the application in the resulting crate.
# If false, input and output files won't be included, just referenced. False by default or if not set.
inputs: [/abs_path_to/dir_1, rel_path_to/dir_2, file_1, rel_path/file_2]
# Optional: manually specify the inputs of the workflow. Relative or absolute paths can be used.
outputs: [/abs_path_to/dir_1, rel_path_to/dir_2, file_1, rel_path/file_2]
# Optional: manually specify the outputs of the workflow. Relative or absolute paths can be used.

Authors:
  - name: Author_1 Name
    e-mail: author_1@email.com
    orcid: https://orcid.org/XXXX-XXXX-XXXX-XXXX
    organisation_name: Institution_1 name
    ror: https://ror.org/XXXXXXXXX
    # Find them in ror.org
  - name: Author_2 Name
    e-mail: author2@email.com
    orcid: https://orcid.org/YYYY-YYYY-YYYY-YYYY
    organisation_name: Institution_2 name
    ror: https://ror.org/YYYYYYYYY

Submitter:
  name: Name
  e-mail: submitter@email.com
  orcid: https://orcid.org/XXXX-XXXX-XXXX-XXXX
  organisation_name: Submitter Institution name
  ror: https://ror.org/XXXXXXXXX
";
