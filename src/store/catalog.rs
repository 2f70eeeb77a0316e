use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::Item,
};

const TITLE_COLUMN: &str = "title";

/// Ordered collection of movies with an exact-match title lookup
///
/// Titles are not guaranteed to be unique. When several items share a title,
/// lookups resolve to the first one in load order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    index_by_title: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from titles in load order
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut items = Vec::new();
        let mut index_by_title = HashMap::new();

        for (index, title) in titles.into_iter().enumerate() {
            let title = title.into();
            index_by_title.entry(title.clone()).or_insert(index);
            items.push(Item { index, title });
        }

        Self {
            items,
            index_by_title,
        }
    }

    /// Parses a JSON item table exported from a pandas frame
    pub fn from_json(bytes: &[u8]) -> AppResult<Self> {
        let table: ItemTable = serde_json::from_slice(bytes).map_err(|e| {
            AppError::SourceUnavailable(format!("Failed to parse item table: {}", e))
        })?;
        Ok(Self::from_titles(table.into_titles()?))
    }

    /// Resolves a title to its catalog index (case-sensitive, no trimming)
    pub fn resolve(&self, title: &str) -> AppResult<usize> {
        self.index_by_title
            .get(title)
            .copied()
            .ok_or_else(|| AppError::ItemNotFound(title.to_string()))
    }

    pub fn title(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(|item| item.title.as_str())
    }

    /// All titles in stored order
    pub fn titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|item| item.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Shapes a pandas `DataFrame` takes when exported to JSON
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemTable {
    /// `orient="records"`: `[{"title": ...}, ...]`
    Records(Vec<HashMap<String, Value>>),
    /// `orient="dict"` or `orient="list"`
    Columns(HashMap<String, Column>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Column {
    List(Vec<Value>),
    /// Keyed by row label
    Indexed(HashMap<String, Value>),
}

impl ItemTable {
    fn into_titles(self) -> AppResult<Vec<String>> {
        match self {
            ItemTable::Records(rows) => rows
                .into_iter()
                .enumerate()
                .map(|(row, mut record)| {
                    let value = record.remove(TITLE_COLUMN).ok_or_else(|| {
                        AppError::SourceUnavailable(format!(
                            "Item table row {} has no '{}' field",
                            row, TITLE_COLUMN
                        ))
                    })?;
                    title_from_value(&row.to_string(), value)
                })
                .collect(),
            ItemTable::Columns(mut columns) => {
                let column = columns.remove(TITLE_COLUMN).ok_or_else(|| {
                    AppError::SourceUnavailable(format!(
                        "Item table has no '{}' column",
                        TITLE_COLUMN
                    ))
                })?;
                column.into_titles()
            }
        }
    }
}

impl Column {
    fn into_titles(self) -> AppResult<Vec<String>> {
        match self {
            Column::List(values) => values
                .into_iter()
                .enumerate()
                .map(|(row, value)| title_from_value(&row.to_string(), value))
                .collect(),
            Column::Indexed(cells) => {
                let mut rows = cells
                    .into_iter()
                    .map(|(label, value)| {
                        let position = label.parse::<usize>().map_err(|_| {
                            AppError::SourceUnavailable(format!(
                                "Item table row label '{}' is not a row number",
                                label
                            ))
                        })?;
                        Ok((position, label, value))
                    })
                    .collect::<AppResult<Vec<_>>>()?;
                rows.sort_by_key(|(position, _, _)| *position);

                rows.into_iter()
                    .map(|(_, label, value)| title_from_value(&label, value))
                    .collect()
            }
        }
    }
}

fn title_from_value(row: &str, value: Value) -> AppResult<String> {
    match value {
        Value::String(title) => Ok(title),
        other => Err(AppError::SourceUnavailable(format!(
            "Item table row {} has a non-string title: {}",
            row, other
        ))),
    }
}
