use shared::domain::{Dataset, ElementId};

use crate::workflow::{WorkflowSnapshot, WorkflowStatus};

pub const CHOOSE_ELEMENT_PROMPT: &str = "Select an element from the list above to view its graph.";

#[derive(Debug, Clone, PartialEq)]
pub struct ViewProjection {
    pub status: WorkflowStatus,
    pub busy: bool,
    pub candidate_name: Option<String>,
    pub can_upload: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub preview: Option<PreviewView>,
    pub elements: Vec<ElementButton>,
    pub chart: ChartPanel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementButton {
    pub element: ElementId,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartPanel {
    Hidden,
    ChoosePlaceholder,
    Chart { element: ElementId, dataset: Dataset },
}

pub fn project(snapshot: &WorkflowSnapshot) -> ViewProjection {
    let busy = snapshot.is_busy();

    let preview = match (&snapshot.status, &snapshot.preview) {
        (WorkflowStatus::Ready, Some(table)) if !table.is_empty() => Some(PreviewView {
            columns: table.columns().to_vec(),
            rows: table.rows().to_vec(),
        }),
        _ => None,
    };

    // Buttons need both halves; a catalog without datasets has nothing to chart.
    let elements = if snapshot.catalog.is_empty() || snapshot.datasets.is_empty() {
        Vec::new()
    } else {
        snapshot
            .catalog
            .iter()
            .map(|element| ElementButton {
                element: element.clone(),
                active: snapshot.selection.is_selected(element),
            })
            .collect()
    };

    let chart = if snapshot.datasets.is_empty() {
        ChartPanel::Hidden
    } else {
        match snapshot.selection.selected() {
            None => ChartPanel::ChoosePlaceholder,
            Some(element) => match snapshot.datasets.get(element) {
                Some(dataset) => ChartPanel::Chart {
                    element: element.clone(),
                    dataset: dataset.clone(),
                },
                None => ChartPanel::Hidden,
            },
        }
    };

    ViewProjection {
        status: snapshot.status,
        busy,
        candidate_name: snapshot
            .candidate
            .as_ref()
            .map(|candidate| candidate.file_name().to_string()),
        can_upload: snapshot.candidate.is_some() && !busy,
        error: snapshot.error.clone(),
        notice: snapshot.notice.clone(),
        preview,
        elements,
        chart,
    }
}
