use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A tracked kid. `birthday` is a calendar date in `YYYY-MM-DD` form; the
/// year component is the birth year and is only used for age computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kid {
    pub id: String,
    pub name: String,
    /// Calendar date in `YYYY-MM-DD` form
    pub birthday: String,
    /// Encoded image data URI or upload reference
    pub photo: Option<String>,
    /// Free-text notes on what the kid is into
    pub interests: Option<String>,
    /// Creation timestamp (RFC 3339), immutable
    pub created_at: String,
}

/// A gift recorded against a kid for one occasion and year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gift {
    pub id: String,
    /// The kid this gift belongs to
    pub kid_id: String,
    pub gift_name: String,
    pub occasion: Occasion,
    /// Calendar year, constrained to [2000, 2200] on user input
    pub year: i32,
    /// Calendar date in `YYYY-MM-DD` form, if the gift has been given
    pub date_given: Option<String>,
    pub photo: Option<String>,
    /// Creation timestamp (RFC 3339), immutable
    pub created_at: String,
}

/// What a gift was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    Birthday,
    Christmas,
}

impl Occasion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Birthday => "birthday",
            Occasion::Christmas => "christmas",
        }
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Occasion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "birthday" => Ok(Occasion::Birthday),
            "christmas" => Ok(Occasion::Christmas),
            other => Err(format!("unknown occasion: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateKidRequest {
    pub name: String,
    /// Calendar date in `YYYY-MM-DD` form
    pub birthday: String,
    pub photo: Option<String>,
    pub interests: Option<String>,
}

/// Partial update: `None` fields keep their stored value. Sending an empty
/// string clears `photo`/`interests`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateKidRequest {
    pub name: Option<String>,
    pub birthday: Option<String>,
    pub photo: Option<String>,
    pub interests: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGiftRequest {
    pub kid_id: String,
    pub gift_name: String,
    pub occasion: Occasion,
    pub year: i32,
    pub date_given: Option<String>,
    pub photo: Option<String>,
}

/// Partial update: `None` fields keep their stored value. `kid_id` is
/// immutable after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateGiftRequest {
    pub gift_name: Option<String>,
    pub occasion: Option<Occasion>,
    pub year: Option<i32>,
    pub date_given: Option<String>,
    pub photo: Option<String>,
}

/// One upcoming-birthday entry. `age` is the kid's current age; the banner
/// showing "turns N" displays `age + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub kid_id: String,
    pub kid_name: String,
    pub birthday: String,
    pub days_until: i64,
    pub age: i32,
}

/// One row of the per-year Christmas checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    pub kid_id: String,
    pub kid_name: String,
    pub age: i32,
    pub has_gift: bool,
    pub gift: Option<Gift>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistResponse {
    pub year: i32,
    pub entries: Vec<ChecklistEntry>,
    pub completed_count: usize,
    pub total_count: usize,
}

/// Result of toggling the Christmas gift for a `(kid, year)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleChristmasResponse {
    /// True when the toggle created a placeholder gift, false when it
    /// deleted the existing one
    pub has_gift: bool,
    pub gift: Option<Gift>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// `data:<mime>;base64,<payload>` data URI
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}
