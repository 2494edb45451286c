use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Skill bullets in document order. Order only matters for the two-per-row
/// table layout.
pub type SkillList = Vec<String>;

/// One job block of the experience log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub company: String,
    pub title: String,
    /// First day of the start month. `None` is rendered as "today".
    pub start_date: Option<NaiveDate>,
    /// First day of the end month. `None` means the job is ongoing.
    pub end_date: Option<NaiveDate>,
    pub accolades: Vec<String>,
}

/// Everything the parser extracts from one experience file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceLog {
    pub skills: SkillList,
    pub experiences: Vec<ExperienceRecord>,
}

/// A record paired with its display tenure, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeEntry {
    #[serde(flatten)]
    pub record: ExperienceRecord,
    pub tenure: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResult {
    pub skills: SkillList,
    pub entries: Vec<ResumeEntry>,
}
