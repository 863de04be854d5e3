use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Rejection reasons for entries that never reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{entity} requires a non-empty {field}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("skill level must be between 1 and 5, got {0}")]
    SkillLevel(u8),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

fn require(value: &str, entity: &'static str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField { entity, field })
    } else {
        Ok(())
    }
}

/// Minimal email shape check: something on both sides of a single `@`.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ValidationError::InvalidEmail(email.to_string())),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Theme
// ────────────────────────────────────────────────────────────────────────────

/// Colour palette of the résumé template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
    Red,
}

impl Theme {
    /// Primary accent colour as RGB.
    pub fn primary_rgb(self) -> [u8; 3] {
        match self {
            Theme::Blue => [0x25, 0x63, 0xeb],
            Theme::Green => [0x05, 0x96, 0x69],
            Theme::Purple => [0x93, 0x33, 0xea],
            Theme::Orange => [0xea, 0x58, 0x0c],
            Theme::Red => [0xdc, 0x26, 0x26],
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sub-entities
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub objective: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: String,
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub id: String,
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub level: u8,
}

impl Skill {
    /// Width of the proficiency bar, in percent.
    pub fn bar_percent(&self) -> u8 {
        self.level.min(5) * 20
    }
}

/// Experience as typed in the form, before it is admitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperienceDraft {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EducationDraft {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub year: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillDraft {
    pub name: String,
    #[serde(default = "default_skill_level")]
    pub level: u8,
}

fn default_skill_level() -> u8 {
    3
}

/// The three ordered sections of a résumé.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeSection {
    Experiences,
    Education,
    Skills,
}

fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Résumé content
// ────────────────────────────────────────────────────────────────────────────

/// Structured payload of a résumé document. Section order is display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeContent {
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub theme: Theme,
}

impl ResumeContent {
    pub fn new(personal_info: PersonalInfo, theme: Theme) -> Self {
        Self {
            personal_info,
            theme,
            ..Self::default()
        }
    }

    /// Appends an experience. Title and company are required.
    pub fn add_experience(&mut self, draft: ExperienceDraft) -> Result<&Experience, ValidationError> {
        require(&draft.title, "experience", "title")?;
        require(&draft.company, "experience", "company")?;
        self.experiences.push(Experience {
            id: new_entry_id(),
            title: draft.title,
            company: draft.company,
            start_date: draft.start_date,
            end_date: draft.end_date,
            description: draft.description,
        });
        Ok(&self.experiences[self.experiences.len() - 1])
    }

    /// Appends an education entry. Degree and institution are required.
    pub fn add_education(&mut self, draft: EducationDraft) -> Result<&Education, ValidationError> {
        require(&draft.degree, "education", "degree")?;
        require(&draft.institution, "education", "institution")?;
        self.education.push(Education {
            id: new_entry_id(),
            degree: draft.degree,
            institution: draft.institution,
            year: draft.year,
        });
        Ok(&self.education[self.education.len() - 1])
    }

    /// Appends a skill. Name is required, level must be 1–5.
    pub fn add_skill(&mut self, draft: SkillDraft) -> Result<&Skill, ValidationError> {
        require(&draft.name, "skill", "name")?;
        if !(1..=5).contains(&draft.level) {
            return Err(ValidationError::SkillLevel(draft.level));
        }
        self.skills.push(Skill {
            id: new_entry_id(),
            name: draft.name,
            level: draft.level,
        });
        Ok(&self.skills[self.skills.len() - 1])
    }

    /// Removes an entry by id. Returns whether anything was removed.
    pub fn remove_entry(&mut self, section: ResumeSection, id: &str) -> bool {
        let before = self.len(section);
        match section {
            ResumeSection::Experiences => self.experiences.retain(|e| e.id != id),
            ResumeSection::Education => self.education.retain(|e| e.id != id),
            ResumeSection::Skills => self.skills.retain(|s| s.id != id),
        }
        self.len(section) != before
    }

    pub fn len(&self, section: ResumeSection) -> usize {
        match section {
            ResumeSection::Experiences => self.experiences.len(),
            ResumeSection::Education => self.education.len(),
            ResumeSection::Skills => self.skills.len(),
        }
    }

    /// A résumé is previewable once name and email are filled in.
    pub fn ensure_complete_identity(&self) -> Result<(), ValidationError> {
        require(&self.personal_info.first_name, "personal info", "first name")?;
        require(&self.personal_info.last_name, "personal info", "last name")?;
        validate_email(&self.personal_info.email)
    }
}
