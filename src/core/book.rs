// Book record, availability status, and the fixed set of searchable fields.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, ErrorKind};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum BookStatus {
    #[default]
    #[serde(rename = "available")]
    Available,
    #[serde(rename = "checked out")]
    CheckedOut,
}

impl BookStatus {
    /// Text stored in the catalog file and used for search comparisons.
    pub fn as_str(self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::CheckedOut => "checked out",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "available" => Ok(BookStatus::Available),
            "checked out" | "checked-out" | "checked_out" => Ok(BookStatus::CheckedOut),
            _ => Err(Error::new(ErrorKind::Usage)
                .with_message(format!("unknown status: {value}"))
                .with_hint("Use `available` or `checked out`.")),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub status: BookStatus,
}

impl Book {
    pub fn new(id: u64, title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year,
            status: BookStatus::default(),
        }
    }

    /// Stringified value of `field`, as compared by search.
    pub fn field_text(&self, field: SearchField) -> String {
        match field {
            SearchField::Id => self.id.to_string(),
            SearchField::Title => self.title.clone(),
            SearchField::Author => self.author.clone(),
            SearchField::Year => self.year.to_string(),
            SearchField::Status => self.status.as_str().to_string(),
        }
    }

    pub fn matches(&self, field: SearchField, value: &str) -> bool {
        self.field_text(field).to_lowercase() == value.to_lowercase()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SearchField {
    Id,
    Title,
    Author,
    Year,
    Status,
}

impl SearchField {
    pub const ALL: [SearchField; 5] = [
        SearchField::Id,
        SearchField::Title,
        SearchField::Author,
        SearchField::Year,
        SearchField::Status,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SearchField::Id => "id",
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Year => "year",
            SearchField::Status => "status",
        }
    }

    /// Case-insensitive lookup; `None` for names that are not searchable.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
