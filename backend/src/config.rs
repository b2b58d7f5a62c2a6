use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ContentsError, Result};

/// The parts of the app configuration that link checks can use.
///
/// Extraction passes it through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptureConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub book_collections: Vec<BookCollection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCollection {
    pub id: String,
    #[serde(default)]
    pub books: Vec<BookConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl ScriptureConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ContentsError::io(path, e))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn has_books(&self) -> bool {
        self.book_collections.iter().any(|c| !c.books.is_empty())
    }

    /// Case-insensitive book id lookup across all collections.
    pub fn has_book(&self, book_id: &str) -> bool {
        self.book_collections
            .iter()
            .flat_map(|c| c.books.iter())
            .any(|b| b.id.eq_ignore_ascii_case(book_id))
    }
}
