use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{Dataset, DatasetMap, ElementCatalog, ElementId, PreviewTable, Series},
    error::ProtocolError,
};

pub const UPLOAD_PATH: &str = "/upload";
pub const ELEMENT_TITLES_PATH: &str = "/element-titles";
pub const GRAPHS_PATH: &str = "/graphs";
pub const UPLOAD_FILE_FIELD: &str = "file";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewPayload>,
}

// Either an array of row objects or `{column: {row_index: value}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreviewPayload {
    Rows(Vec<Map<String, Value>>),
    Columns(Map<String, Value>),
}

impl UploadResponse {
    pub fn into_preview_table(self) -> Result<PreviewTable, ProtocolError> {
        match self.preview {
            Some(preview) => preview.into_table(),
            None => Ok(PreviewTable::default()),
        }
    }
}

impl PreviewPayload {
    pub fn into_table(self) -> Result<PreviewTable, ProtocolError> {
        match self {
            PreviewPayload::Rows(rows) => PreviewTable::from_rows(
                rows.into_iter()
                    .map(|row| {
                        row.into_iter()
                            .map(|(column, value)| (column, cell_text(&value)))
                            .collect()
                    })
                    .collect(),
            ),
            PreviewPayload::Columns(columns) => PreviewTable::from_rows(pivot_columns(columns)?),
        }
    }
}

fn pivot_columns(columns: Map<String, Value>) -> Result<Vec<Vec<(String, String)>>, ProtocolError> {
    let mut rows: Vec<Vec<(String, String)>> = Vec::new();
    let mut row_keys: Vec<String> = Vec::new();
    let mut first_column: Option<String> = None;

    for (column, cells) in columns {
        let Value::Object(cells) = cells else {
            return Err(ProtocolError::MalformedPreviewColumn { column });
        };

        match &first_column {
            None => {
                row_keys = cells.keys().cloned().collect();
                // Numeric row indices first, in index order.
                row_keys.sort_by_key(|key| key.parse::<u64>().unwrap_or(u64::MAX));
                rows = vec![Vec::new(); row_keys.len()];
                first_column = Some(column.clone());
            }
            Some(first) => {
                if cells.len() != row_keys.len() || row_keys.iter().any(|k| !cells.contains_key(k))
                {
                    return Err(ProtocolError::MisalignedPreviewColumn {
                        column,
                        first: first.clone(),
                    });
                }
            }
        }

        for (row, key) in rows.iter_mut().zip(&row_keys) {
            let text = cells.get(key).map(cell_text).unwrap_or_default();
            row.push((column.clone(), text));
        }
    }

    Ok(rows)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementTitlesResponse {
    #[serde(default)]
    pub titles: Vec<String>,
}

impl ElementTitlesResponse {
    pub fn into_catalog(self) -> ElementCatalog {
        self.titles.into_iter().collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetPayload {
    #[serde(default)]
    pub labels: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<Vec<Vec<Option<f64>>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasets: Option<Vec<ChartSeriesPayload>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeriesPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<Option<f64>>,
}

impl DatasetPayload {
    pub fn into_dataset(self, element: &ElementId) -> Result<Dataset, ProtocolError> {
        let labels: Vec<String> = self.labels.iter().map(cell_text).collect();
        let series: Vec<Series> = self
            .series
            .unwrap_or_default()
            .into_iter()
            .map(|values| Series {
                label: None,
                values,
            })
            .chain(
                self.datasets
                    .unwrap_or_default()
                    .into_iter()
                    .map(|entry| Series {
                        label: entry.label,
                        values: entry.data,
                    }),
            )
            .collect();

        if series.is_empty() {
            return Err(ProtocolError::EmptySeries {
                element: element.to_string(),
            });
        }
        if let Some((index, bad)) = series
            .iter()
            .enumerate()
            .find(|(_, s)| s.values.len() != labels.len())
        {
            return Err(ProtocolError::MisalignedSeries {
                element: element.to_string(),
                series: index,
                expected: labels.len(),
                found: bad.values.len(),
            });
        }

        Ok(Dataset { labels, series })
    }
}

pub type GraphsResponse = Map<String, Value>;

/// Entries that fail to decode are returned alongside the map instead of
/// failing the whole response.
pub fn datasets_from_graphs(graphs: GraphsResponse) -> (DatasetMap, Vec<ProtocolError>) {
    let mut datasets = DatasetMap::default();
    let mut rejected = Vec::new();
    for (element, payload) in graphs {
        let element = ElementId::new(element);
        let decoded = serde_json::from_value::<DatasetPayload>(payload)
            .map_err(|e| ProtocolError::MalformedDataset {
                element: element.to_string(),
                reason: e.to_string(),
            })
            .and_then(|payload| payload.into_dataset(&element));
        match decoded {
            Ok(dataset) => datasets.insert(element, dataset),
            Err(err) => rejected.push(err),
        }
    }
    (datasets, rejected)
}
