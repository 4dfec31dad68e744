//! Named dataset registry and primary key declarations.
//!
//! The registry is the sole long-lived owner of its datasets; every analysis
//! borrows them read-only. Datasets are validated once when they enter the
//! registry, so downstream components assume validity by construction.

use serde::{Deserialize, Serialize};

use crate::models::Dataset;
use crate::{Result, TabSurveyorError};

/// A named dataset held by the registry.
#[derive(Debug)]
struct RegistryEntry {
    name: String,
    dataset: Box<dyn Dataset>,
}

/// Ordered mapping from dataset name to dataset.
///
/// Insertion order is preserved and used as report order.
#[derive(Debug, Default)]
pub struct DatasetRegistry {
    entries: Vec<RegistryEntry>,
}

impl DatasetRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dataset under a unique name.
    ///
    /// # Errors
    /// Returns [`TabSurveyorError::Configuration`] if the name is empty or
    /// already registered.
    pub fn insert(&mut self, name: impl Into<String>, dataset: impl Dataset + 'static) -> Result<()> {
        self.insert_boxed(name, Box::new(dataset))
    }

    /// Adds an already boxed dataset under a unique name.
    pub fn insert_boxed(&mut self, name: impl Into<String>, dataset: Box<dyn Dataset>) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(TabSurveyorError::configuration(
                "dataset name must not be empty",
            ));
        }
        if self.contains(&name) {
            return Err(TabSurveyorError::configuration(format!(
                "dataset '{}' is already registered",
                name
            )));
        }

        tracing::debug!(
            "Registered dataset '{}' ({} rows, {} columns)",
            name,
            dataset.row_count(),
            dataset.column_count()
        );
        self.entries.push(RegistryEntry { name, dataset });
        Ok(())
    }

    /// Builder form of [`DatasetRegistry::insert`].
    pub fn with_dataset(
        mut self,
        name: impl Into<String>,
        dataset: impl Dataset + 'static,
    ) -> Result<Self> {
        self.insert(name, dataset)?;
        Ok(self)
    }

    /// Looks up a dataset by name.
    pub fn get(&self, name: &str) -> Option<&dyn Dataset> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.dataset.as_ref())
    }

    /// Returns true if a dataset with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Iterates over `(name, dataset)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Dataset)> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.dataset.as_ref()))
    }

    /// Dataset names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Number of registered datasets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no dataset is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered key columns identifying a record of one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeySpec {
    /// Dataset the key applies to
    #[serde(alias = "dataframe")]
    pub dataset: String,
    /// Key columns, in order
    pub primary_key: Vec<String>,
}

impl PrimaryKeySpec {
    /// Creates a new primary key spec.
    pub fn new<I, S>(dataset: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dataset: dataset.into(),
            primary_key: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Collection of primary key specs, at most one per dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimaryKeys {
    specs: Vec<PrimaryKeySpec>,
}

impl PrimaryKeys {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a spec.
    ///
    /// # Errors
    /// Returns [`TabSurveyorError::Configuration`] if the dataset already has
    /// a spec or the key has no columns.
    pub fn insert(&mut self, spec: PrimaryKeySpec) -> Result<()> {
        if spec.primary_key.is_empty() {
            return Err(TabSurveyorError::configuration(format!(
                "primary key for dataset '{}' has no columns",
                spec.dataset
            )));
        }
        if self.get(&spec.dataset).is_some() {
            return Err(TabSurveyorError::configuration(format!(
                "dataset '{}' has more than one primary key declaration",
                spec.dataset
            )));
        }
        self.specs.push(spec);
        Ok(())
    }

    /// Builder form of [`PrimaryKeys::insert`].
    pub fn with<I, S>(mut self, dataset: impl Into<String>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(PrimaryKeySpec::new(dataset, columns))?;
        Ok(self)
    }

    /// Builds a collection from specs, rejecting conflicting declarations.
    pub fn from_specs(specs: impl IntoIterator<Item = PrimaryKeySpec>) -> Result<Self> {
        let mut keys = Self::new();
        for spec in specs {
            keys.insert(spec)?;
        }
        Ok(keys)
    }

    /// Spec for a dataset, if declared.
    pub fn get(&self, dataset: &str) -> Option<&PrimaryKeySpec> {
        self.specs.iter().find(|s| s.dataset == dataset)
    }

    /// Iterates over declared specs.
    pub fn iter(&self) -> impl Iterator<Item = &PrimaryKeySpec> {
        self.specs.iter()
    }

    /// Number of key declarations.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns true if no key is declared.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
