use cats_catalog::Table;

/// The slice of a loaded table shown in the preview pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePreview {
    pub dataset_id: String,
    pub columns: Vec<String>,
    pub dtypes: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

impl TablePreview {
    pub fn new(dataset_id: &str, table: &Table, max_rows: usize) -> TablePreview {
        return TablePreview {
            dataset_id: dataset_id.to_string(),
            columns: table.columns().to_vec(),
            dtypes: table.dtypes().iter().map(|d| d.to_string()).collect(),
            rows: table.head(max_rows),
            total_rows: table.height(),
        };
    }
}
