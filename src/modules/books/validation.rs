//! Parse-and-validate step between raw form/query text and typed values.
//!
//! Nothing here knows about HTTP; handlers pass in whatever strings they
//! extracted and get back either typed values or a [`ValidationError`] whose
//! `Display` is the message shown to the user.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use super::models::{Book, EditableField, FieldUpdate, NewBook};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required.")]
    MissingFields,

    #[error("Price and quantity must be numbers.")]
    NotNumbers,

    #[error("Price and quantity must be positive values.")]
    NotPositive,

    #[error("{} must be numbers.", .0.label())]
    FieldNotNumber(EditableField),

    #[error("{} must be a positive value.", .0.label())]
    FieldNotPositive(EditableField),

    #[error("{} cannot be empty.", .0.label())]
    FieldEmpty(EditableField),

    #[error("Invalid date format. Please use YYYY-MM-DD.")]
    InvalidDate,

    #[error("Invalid price format. Please enter a valid number.")]
    InvalidPrice,
}

impl ValidationError {
    /// Machine-readable detail entries for the error body.
    pub fn details(&self) -> Vec<serde_json::Value> {
        match self {
            ValidationError::MissingFields => vec![json!({"error": "required"})],
            ValidationError::NotNumbers => vec![
                json!({"field": "price", "error": "not_a_number"}),
                json!({"field": "quantity", "error": "not_a_number"}),
            ],
            ValidationError::NotPositive => vec![
                json!({"field": "price", "error": "not_positive"}),
                json!({"field": "quantity", "error": "not_positive"}),
            ],
            ValidationError::FieldNotNumber(field) => {
                vec![json!({"field": field.name(), "error": "not_a_number"})]
            }
            ValidationError::FieldNotPositive(field) => {
                vec![json!({"field": field.name(), "error": "not_positive"})]
            }
            ValidationError::FieldEmpty(field) => {
                vec![json!({"field": field.name(), "error": "empty"})]
            }
            ValidationError::InvalidDate => {
                vec![json!({"field": "date_added", "error": "invalid_format"})]
            }
            ValidationError::InvalidPrice => {
                vec![json!({"field": "price", "error": "invalid_format"})]
            }
        }
    }
}

/// Raw add-book input, exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddBookInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
}

/// Raw search query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub date_added: Option<String>,
    pub price: Option<String>,
}

/// Validated search conditions; all present conditions must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub added_on: Option<NaiveDate>,
    pub max_price: Option<f64>,
}

impl SearchCriteria {
    pub fn from_params(params: &SearchParams) -> Result<Self, ValidationError> {
        let added_on = match present(params.date_added.as_deref()) {
            Some(raw) => Some(parse_date(raw).ok_or(ValidationError::InvalidDate)?),
            None => None,
        };
        let max_price = match present(params.price.as_deref()) {
            Some(raw) => Some(parse_float(raw).ok_or(ValidationError::InvalidPrice)?),
            None => None,
        };

        Ok(Self {
            title: present(params.title.as_deref()).map(str::to_string),
            author: present(params.author.as_deref()).map(str::to_string),
            genre: present(params.genre.as_deref()).map(str::to_string),
            added_on,
            max_price,
        })
    }

    /// No conditions at all; such a search matches nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.genre.is_none()
            && self.added_on.is_none()
            && self.max_price.is_none()
    }

    /// Half-open UTC window `[start, end)` covering the requested day.
    pub fn added_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let midnight = self.added_on?.and_hms_opt(0, 0, 0)?;
        let start = Utc.from_utc_datetime(&midnight);
        Some((start, start + Duration::days(1)))
    }

    pub fn matches(&self, book: &Book) -> bool {
        if self.is_empty() {
            return false;
        }
        contains_ignore_case(&book.title, self.title.as_deref())
            && contains_ignore_case(&book.author, self.author.as_deref())
            && contains_ignore_case(&book.genre, self.genre.as_deref())
            && self
                .added_window()
                .map_or(true, |(start, end)| book.date_added >= start && book.date_added < end)
            && self.max_price.map_or(true, |max| book.price <= max)
    }
}

/// Validate a full add-book submission.
pub fn validate_new_book(
    input: &AddBookInput,
    now: DateTime<Utc>,
) -> Result<NewBook, ValidationError> {
    let (Some(title), Some(author), Some(genre), Some(price), Some(quantity)) = (
        present(input.title.as_deref()),
        present(input.author.as_deref()),
        present(input.genre.as_deref()),
        present(input.price.as_deref()),
        present(input.quantity.as_deref()),
    ) else {
        return Err(ValidationError::MissingFields);
    };

    let (Some(price), Some(quantity)) = (parse_float(price), parse_int(quantity)) else {
        return Err(ValidationError::NotNumbers);
    };

    if price <= 0.0 || quantity <= 0 {
        return Err(ValidationError::NotPositive);
    }

    Ok(NewBook {
        title: title.to_string(),
        author: author.to_string(),
        genre: genre.to_string(),
        price,
        quantity,
        date_added: now,
    })
}

/// Validate the new value for a single editable field.
pub fn validate_field(
    field: EditableField,
    raw: Option<&str>,
) -> Result<FieldUpdate, ValidationError> {
    match field {
        EditableField::Price => {
            let price = raw
                .and_then(parse_float)
                .ok_or(ValidationError::FieldNotNumber(field))?;
            if price <= 0.0 {
                return Err(ValidationError::FieldNotPositive(field));
            }
            Ok(FieldUpdate::Price(price))
        }
        EditableField::Quantity => {
            let quantity = raw
                .and_then(parse_int)
                .ok_or(ValidationError::FieldNotNumber(field))?;
            if quantity <= 0 {
                return Err(ValidationError::FieldNotPositive(field));
            }
            Ok(FieldUpdate::Quantity(quantity))
        }
        EditableField::Title | EditableField::Author | EditableField::Genre => {
            let text = present(raw)
                .ok_or(ValidationError::FieldEmpty(field))?
                .to_string();
            Ok(match field {
                EditableField::Title => FieldUpdate::Title(text),
                EditableField::Author => FieldUpdate::Author(text),
                _ => FieldUpdate::Genre(text),
            })
        }
    }
}

/// Treat absent, empty and whitespace-only values alike.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.trim().is_empty())
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}
