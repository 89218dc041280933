use serde::{Deserialize, Deserializer, Serialize};

/// Rows of cell strings, as returned for one detected table.
pub type Table = Vec<Vec<String>>;

#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest<'a> {
    pub filename: &'a str,
    /// Base64-encoded image bytes.
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub id: String,
}

/// Body of a status poll. `status` is kept as the raw wire string; see
/// [`crate::ocr::JobStatus::from_wire`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PollResponse {
    pub status: String,
    #[serde(default)]
    pub documents: Vec<OcrDocument>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OcrDocument {
    #[serde(rename = "tableList", default, deserialize_with = "null_cells_as_empty")]
    pub table_list: Vec<Table>,
}

fn null_cells_as_empty<'de, D>(deserializer: D) -> Result<Vec<Table>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Vec<Vec<Option<String>>>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|table| {
            table
                .into_iter()
                .map(|row| row.into_iter().map(Option::unwrap_or_default).collect())
                .collect()
        })
        .collect())
}

/// The first table detected across all documents of a completed job.
///
/// Only the first table is ever used; responses with several tables have
/// the rest ignored.
pub fn first_table(documents: &[OcrDocument]) -> Option<&Table> {
    documents.iter().flat_map(|doc| doc.table_list.iter()).next()
}
