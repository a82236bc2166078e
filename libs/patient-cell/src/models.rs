use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use shared_models::Gender;

pub const PAGE_SIZE: usize = 10;

pub const REGISTRY_LOAD_ERROR: &str =
    "Failed to securely connect to the patient registry. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Age,
    Gender,
    CreatedAt,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "age" => Ok(SortField::Age),
            "gender" => Ok(SortField::Gender),
            "created_at" | "created" => Ok(SortField::CreatedAt),
            other => Err(format!(
                "unknown sort field '{}', expected name, age, gender or created_at",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}', expected asc or desc", other)),
        }
    }
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Categorical filter over gender, with `All` as the pass-through sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenderFilter {
    #[default]
    All,
    Only(Gender),
}

impl GenderFilter {
    pub fn admits(&self, gender: Gender) -> bool {
        match self {
            GenderFilter::All => true,
            GenderFilter::Only(wanted) => *wanted == gender,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GenderFilter::All => "All",
            GenderFilter::Only(gender) => gender.as_str(),
        }
    }
}

impl fmt::Display for GenderFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GenderFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(GenderFilter::All)
        } else {
            s.parse::<Gender>().map(GenderFilter::Only)
        }
    }
}

/// Attention level inferred from free-text medical history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionBadge {
    Critical,
    Monitoring,
    Stable,
}

impl ConditionBadge {
    pub fn classify(medical_history: Option<&str>) -> Self {
        let Some(history) = medical_history else {
            return ConditionBadge::Stable;
        };
        let history = history.to_lowercase();

        if mentions(&history, &["critical", "severe", "hypertension"]) {
            ConditionBadge::Critical
        } else if mentions(&history, &["monitoring", "type 2", "asthma"]) {
            ConditionBadge::Monitoring
        } else {
            ConditionBadge::Stable
        }
    }
}

fn mentions(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    Identity,
    Vitals,
    Submitted,
}
