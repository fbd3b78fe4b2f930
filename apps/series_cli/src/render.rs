use client_core::{projector::CHOOSE_ELEMENT_PROMPT, ChartPanel, ViewProjection};

pub fn render(view: &ViewProjection) -> String {
    let mut out = Vec::new();

    out.push(format!("status: {}", view.status));
    match (&view.candidate_name, view.busy) {
        (_, true) => out.push("Uploading...".to_string()),
        (Some(name), false) => out.push(format!("file: {name} (ready to upload)")),
        (None, false) => {}
    }
    if let Some(error) = &view.error {
        out.push(format!("error: {error}"));
    }
    if let Some(notice) = &view.notice {
        out.push(notice.clone());
    }

    if let Some(preview) = &view.preview {
        out.push(String::new());
        out.push("File preview:".to_string());
        out.extend(table(&preview.columns, &preview.rows));
    }

    if !view.elements.is_empty() {
        out.push(String::new());
        let buttons: Vec<String> = view
            .elements
            .iter()
            .map(|button| {
                if button.active {
                    format!("[*{}]", button.element)
                } else {
                    format!("[{}]", button.element)
                }
            })
            .collect();
        out.push(format!("Available elements: {}", buttons.join(" ")));
    }

    match &view.chart {
        ChartPanel::Hidden => {}
        ChartPanel::ChoosePlaceholder => {
            out.push(String::new());
            out.push(CHOOSE_ELEMENT_PROMPT.to_string());
        }
        ChartPanel::Chart { element, dataset } => {
            out.push(String::new());
            out.push(format!("{element} graph:"));
            let mut columns = vec!["label".to_string()];
            columns.extend(dataset.series.iter().enumerate().map(|(index, series)| {
                series
                    .label
                    .clone()
                    .unwrap_or_else(|| format!("series {}", index + 1))
            }));
            let rows: Vec<Vec<String>> = dataset
                .labels
                .iter()
                .enumerate()
                .map(|(index, label)| {
                    let mut row = vec![label.clone()];
                    row.extend(
                        dataset
                            .series
                            .iter()
                            .map(|series| {
                                series
                                    .values
                                    .get(index)
                                    .copied()
                                    .flatten()
                                    .map(|value| value.to_string())
                                    .unwrap_or_default()
                            }),
                    );
                    row
                })
                .collect();
            out.extend(table(&columns, &rows));
        }
    }

    out.join("\n")
}

fn table(columns: &[String], rows: &[Vec<String>]) -> Vec<String> {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![line(columns)];
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(rows.iter().map(|row| line(row)));
    lines
}
