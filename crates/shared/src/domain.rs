use std::{
    collections::{BTreeMap, HashSet},
    fmt,
};

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl PreviewTable {
    pub fn from_rows(rows: Vec<Vec<(String, String)>>) -> Result<Self, ProtocolError> {
        let Some(first) = rows.first() else {
            return Ok(Self::default());
        };
        let columns: Vec<String> = first.iter().map(|(name, _)| name.clone()).collect();
        let expected: HashSet<&str> = columns.iter().map(String::as_str).collect();

        let mut table_rows = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let found: HashSet<&str> = row.iter().map(|(name, _)| name.as_str()).collect();
            if found != expected || row.len() != columns.len() {
                return Err(ProtocolError::RaggedPreviewRow {
                    row: index,
                    expected: columns.clone(),
                    found: row.iter().map(|(name, _)| name.clone()).collect(),
                });
            }

            let values = columns
                .iter()
                .map(|column| {
                    row.iter()
                        .find(|(name, _)| name == column)
                        .map(|(_, value)| value.clone())
                        .unwrap_or_default()
                })
                .collect();
            table_rows.push(values);
        }

        Ok(Self {
            columns,
            rows: table_rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementCatalog {
    elements: Vec<ElementId>,
}

impl ElementCatalog {
    pub fn contains(&self, element: &ElementId) -> bool {
        self.elements.contains(element)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementId> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<T: Into<ElementId>> FromIterator<T> for ElementCatalog {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut elements: Vec<ElementId> = Vec::new();
        for element in iter {
            let element = element.into();
            if !elements.contains(&element) {
                elements.push(element);
            }
        }
        Self { elements }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: Option<String>,
    /// `None` marks a gap in the series.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetMap {
    entries: BTreeMap<ElementId, Dataset>,
}

impl DatasetMap {
    pub fn insert(&mut self, element: ElementId, dataset: Dataset) {
        self.entries.insert(element, dataset);
    }

    pub fn get(&self, element: &ElementId) -> Option<&Dataset> {
        self.entries.get(element)
    }

    pub fn contains(&self, element: &ElementId) -> bool {
        self.entries.contains_key(element)
    }

    /// Drops entries the catalog does not advertise and returns how many were removed.
    pub fn retain_catalog(&mut self, catalog: &ElementCatalog) -> usize {
        let before = self.entries.len();
        self.entries.retain(|element, _| catalog.contains(element));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(ElementId, Dataset)> for DatasetMap {
    fn from_iter<I: IntoIterator<Item = (ElementId, Dataset)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
