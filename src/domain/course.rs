//! Course and module catalogue types.
//!
//! Courses are purchasable offerings; modules are reusable lesson units
//! attached to courses through a join table. Validation happens at the
//! boundary so repositories only ever see well-formed drafts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Domain error returned when course payload values are invalid.
#[derive(Debug, Clone, PartialEq)]
pub enum CourseValidationError {
    /// Course name was missing or blank once trimmed.
    EmptyName,
    /// Module title was missing or blank once trimmed.
    EmptyModuleTitle,
    /// Price was negative or not a finite number.
    InvalidPrice { price: f64 },
}

impl fmt::Display for CourseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "course name must not be empty"),
            Self::EmptyModuleTitle => write!(f, "module title must not be empty"),
            Self::InvalidPrice { price } => {
                write!(f, "course price must be a non-negative number, got {price}")
            }
        }
    }
}

impl std::error::Error for CourseValidationError {}

fn validate_price(price: f64) -> Result<f64, CourseValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(CourseValidationError::InvalidPrice { price });
    }
    Ok(price)
}

fn validate_title(
    value: &str,
    missing: CourseValidationError,
) -> Result<String, CourseValidationError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(missing);
    }
    Ok(normalized.to_owned())
}

/// A purchasable offering, as read back from the course repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

/// A reusable lesson unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
}

/// A course together with its attached modules, produced by one joined
/// query rather than per-course lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    pub course_id: i32,
    pub course_name: String,
    pub course_description: Option<String>,
    pub course_price: f64,
    pub modules: Vec<Module>,
}

/// Minimal listing row, ordered most-recently-created first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: i32,
    pub name: String,
}

/// Validated payload for creating a course.
///
/// ## Invariants
/// - `name` is trimmed and non-empty.
/// - `price` is finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDraft {
    name: String,
    description: Option<String>,
    price: f64,
}

impl CourseDraft {
    pub fn try_from_parts(
        name: &str,
        description: Option<&str>,
        price: f64,
    ) -> Result<Self, CourseValidationError> {
        Ok(Self {
            name: validate_title(name, CourseValidationError::EmptyName)?,
            description: description.map(str::to_owned),
            price: validate_price(price)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// Validated payload for creating a module within a batch attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDraft {
    title: String,
    description: Option<String>,
}

impl ModuleDraft {
    pub fn try_from_parts(
        title: &str,
        description: Option<&str>,
    ) -> Result<Self, CourseValidationError> {
        Ok(Self {
            title: validate_title(title, CourseValidationError::EmptyModuleTitle)?,
            description: description.map(str::to_owned),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Allow-listed partial update for a course.
///
/// Only the fields present change; each is validated on entry so an update
/// can never persist an empty name or a negative price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseUpdate {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
}

impl CourseUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Result<Self, CourseValidationError> {
        self.name = Some(validate_title(name, CourseValidationError::EmptyName)?);
        Ok(self)
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    pub fn with_price(mut self, price: f64) -> Result<Self, CourseValidationError> {
        self.price = Some(validate_price(price)?);
        Ok(self)
    }

    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }
}
