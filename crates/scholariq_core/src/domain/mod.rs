use serde::{Deserialize, Serialize};
use std::fmt;

mod findings;

pub use findings::{
    Citation, CitationKind, FlagKind, HallucinationFlag, ProseSignals, ScoreBand, ScoreResult,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WritingCategory {
    Academic,
    Professional,
    Business,
    ContentMarketing,
    PersonalAdmin,
    Technical,
    Specialized,
}

impl WritingCategory {
    pub const ALL: [WritingCategory; 7] = [
        WritingCategory::Academic,
        WritingCategory::Professional,
        WritingCategory::Business,
        WritingCategory::ContentMarketing,
        WritingCategory::PersonalAdmin,
        WritingCategory::Technical,
        WritingCategory::Specialized,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WritingCategory::Academic => "academic",
            WritingCategory::Professional => "professional",
            WritingCategory::Business => "business",
            WritingCategory::ContentMarketing => "content_marketing",
            WritingCategory::PersonalAdmin => "personal_admin",
            WritingCategory::Technical => "technical",
            WritingCategory::Specialized => "specialized",
        }
    }
}

impl fmt::Display for WritingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CitationStyle {
    #[serde(rename = "APA", alias = "apa")]
    Apa,
    #[serde(rename = "Harvard", alias = "harvard")]
    Harvard,
    #[serde(rename = "MLA", alias = "mla")]
    Mla,
    #[serde(rename = "Chicago", alias = "chicago")]
    Chicago,
    #[serde(rename = "Vancouver", alias = "vancouver")]
    Vancouver,
}

impl CitationStyle {
    pub const ALL: [CitationStyle; 5] = [
        CitationStyle::Apa,
        CitationStyle::Harvard,
        CitationStyle::Mla,
        CitationStyle::Chicago,
        CitationStyle::Vancouver,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CitationStyle::Apa => "APA",
            CitationStyle::Harvard => "Harvard",
            CitationStyle::Mla => "MLA",
            CitationStyle::Chicago => "Chicago",
            CitationStyle::Vancouver => "Vancouver",
        }
    }

    /// Styles whose in-text citations carry an author and a year.
    pub fn is_author_date(self) -> bool {
        matches!(
            self,
            CitationStyle::Apa | CitationStyle::Harvard | CitationStyle::Chicago
        )
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LongFormMode {
    #[default]
    Single,
    Chapters,
    Series,
}

impl LongFormMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LongFormMode::Single => "single",
            LongFormMode::Chapters => "chapters",
            LongFormMode::Series => "series",
        }
    }
}

impl fmt::Display for LongFormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation model tier. The concrete provider model name comes from configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    #[default]
    Pro,
    Flash,
}

impl ModelTier {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelTier::Pro => "pro",
            ModelTier::Flash => "flash",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known writing types. Requests carry free text which validation resolves through
/// [`WritingType::parse`], so an unknown type is reported as a field violation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WritingType {
    ResearchPaper,
    LiteratureReview,
    Thesis,
    Essay,
    BusinessPlan,
    MarketResearchReport,
    BlogPost,
    Email,
    TechnicalDocumentation,
    Report,
}

impl WritingType {
    pub const ALL: [WritingType; 10] = [
        WritingType::ResearchPaper,
        WritingType::LiteratureReview,
        WritingType::Thesis,
        WritingType::Essay,
        WritingType::BusinessPlan,
        WritingType::MarketResearchReport,
        WritingType::BlogPost,
        WritingType::Email,
        WritingType::TechnicalDocumentation,
        WritingType::Report,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WritingType::ResearchPaper => "research paper",
            WritingType::LiteratureReview => "literature review",
            WritingType::Thesis => "thesis",
            WritingType::Essay => "essay",
            WritingType::BusinessPlan => "business plan",
            WritingType::MarketResearchReport => "market research report",
            WritingType::BlogPost => "blog post",
            WritingType::Email => "email",
            WritingType::TechnicalDocumentation => "technical documentation",
            WritingType::Report => "report",
        }
    }

    /// Case-, underscore- and whitespace-insensitive lookup ("Research Paper", "research_paper").
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw
            .trim()
            .to_lowercase()
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        Self::ALL.into_iter().find(|t| t.label() == normalized)
    }
}

impl fmt::Display for WritingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inbound request for a long-form piece (a standalone work, a chapter, or a series part).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WritingRequest {
    pub topic: String,
    pub category: WritingCategory,
    pub writing_type: String,
    pub citation_style: CitationStyle,
    pub word_count: u32,
    #[serde(default)]
    pub long_form_mode: LongFormMode,
    #[serde(default)]
    pub allow_old_citations: bool,
    #[serde(default)]
    pub chapter_title: Option<String>,
    #[serde(default)]
    pub outline_points: Vec<String>,
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default)]
    pub model: Option<ModelTier>,
}

/// Inbound request for a structured outline ahead of chapter drafting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutlineRequest {
    pub topic: String,
    pub category: WritingCategory,
    pub writing_type: String,
    pub citation_style: CitationStyle,
    #[serde(default)]
    pub long_form_mode: LongFormMode,
    #[serde(default)]
    pub allow_old_citations: bool,
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default)]
    pub model: Option<ModelTier>,
}

/// Options for one scoring run. `current_year` is an input so a rerun is reproducible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoringOptions {
    pub style: CitationStyle,
    pub allow_old_citations: bool,
    pub recency_window_years: u32,
    pub current_year: i32,
}

impl ScoringOptions {
    pub const DEFAULT_RECENCY_WINDOW_YEARS: u32 = 5;

    pub fn new(style: CitationStyle, current_year: i32) -> Self {
        Self {
            style,
            allow_old_citations: false,
            recency_window_years: Self::DEFAULT_RECENCY_WINDOW_YEARS,
            current_year,
        }
    }

    pub fn with_allow_old_citations(mut self, allow: bool) -> Self {
        self.allow_old_citations = allow;
        self
    }

    pub fn with_recency_window(mut self, years: u32) -> Self {
        self.recency_window_years = years;
        self
    }
}
