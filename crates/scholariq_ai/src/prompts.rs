use scholariq_core::domain::{
    CitationStyle, LongFormMode, OutlineRequest, WritingCategory, WritingRequest, WritingType,
};

pub fn category_guidance(category: WritingCategory) -> &'static str {
    match category {
        WritingCategory::Academic => {
            "Use formal academic language.\nApply scholarly structure and analytical depth.\nGround arguments in credible academic sources.\n"
        }
        WritingCategory::Professional => "Write clearly and directly.\nPrioritize usefulness and clarity.\n",
        WritingCategory::Business => {
            "Write for decision-makers.\nFocus on strategy, performance, and outcomes.\n"
        }
        WritingCategory::ContentMarketing => "Write engaging, reader-focused content.\n",
        WritingCategory::PersonalAdmin => "Write politely and professionally.\n",
        WritingCategory::Technical => "Write with precision and accuracy.\n",
        WritingCategory::Specialized => "Follow domain-specific standards.\n",
    }
}

pub fn writing_type_guidance(writing_type: WritingType) -> &'static str {
    match writing_type {
        WritingType::ResearchPaper => "Include abstract, methodology, results, and discussion.\n",
        WritingType::LiteratureReview => "Synthesize existing studies and identify gaps.\n",
        WritingType::Thesis => "Follow academic thesis structure with chapters.\n",
        WritingType::Essay => "Develop one clear argument across well-linked paragraphs.\n",
        WritingType::BusinessPlan => "Focus on execution strategy and financial viability.\n",
        WritingType::MarketResearchReport => "Present structured, data-driven insights.\n",
        WritingType::BlogPost => "Maintain conversational flow and engagement.\n",
        WritingType::Email => "Be concise and action-oriented.\n",
        WritingType::TechnicalDocumentation => {
            "Use clear sections, examples, and precise language.\n"
        }
        WritingType::Report => "Lead with findings, then supporting detail.\n",
    }
}

pub fn long_form_guidance(mode: LongFormMode) -> &'static str {
    match mode {
        LongFormMode::Single => "Produce a complete standalone work.\n",
        LongFormMode::Chapters => {
            "This is part of a multi-chapter work.\nDo not conclude the entire work.\nPrepare for continuation in next chapters.\n"
        }
        LongFormMode::Series => {
            "This is part of a series.\nAvoid final conclusions.\nLeave room for follow-up content.\n"
        }
    }
}

pub fn style_rules(style: CitationStyle) -> &'static str {
    match style {
        CitationStyle::Apa => {
            "Use APA in-text citations: (Author, Year) or Author (Year).\nReference list: alphabetical, \"Author, A. A. (Year). Title. Venue.\"\n"
        }
        CitationStyle::Harvard => {
            "Use Harvard in-text citations: (Author Year).\nReference list: alphabetical, grouped by medium where useful.\n"
        }
        CitationStyle::Mla => {
            "Use MLA in-text citations: (Author page).\nWorks Cited list in alphabetical order.\n"
        }
        CitationStyle::Chicago => {
            "Use Chicago notes-bibliography: numbered notes with full citations first, shortened after.\nBibliography: \"Surname, First. Title. City: Publisher, Year.\"\n"
        }
        CitationStyle::Vancouver => {
            "Use Vancouver numbered citations [1], [2], etc.\nReference list in citation order: \"1. Surname AB. Title. Journal. Year;Vol:Pages.\"\n"
        }
    }
}

/// Style rules, the recency rule, and the anti-fabrication rules shared by every prompt.
pub fn citation_rules(style: CitationStyle, allow_old_citations: bool, window_years: u32) -> String {
    let age_rule = if allow_old_citations {
        "Older references may be used if highly relevant.\n".to_string()
    } else {
        format!("Use ONLY references from the last {window_years} years.\n")
    };
    format!(
        r#"{style}{age_rule}CRITICAL: Do NOT fabricate sources.
Only cite sources you are certain exist.
If unsure about a source, use conditional language ("research suggests") instead of citing.
If a source cannot be verified, DO NOT include it.
Never use placeholder authors, venues, or URLs (e.g. "Anonymous", "Journal of Research", example.com).
"#,
        style = style_rules(style)
    )
}

fn header(
    category: WritingCategory,
    writing_type: WritingType,
    mode: LongFormMode,
    style: CitationStyle,
) -> String {
    format!(
        "Writing category: {category}\nWriting type: {}\nLong-form mode: {mode}\nCitation style: {style}\n",
        writing_type.label()
    )
}

fn guidance(
    category: WritingCategory,
    writing_type: WritingType,
    mode: LongFormMode,
    rules: &str,
) -> String {
    format!(
        "{}{}{}{rules}",
        category_guidance(category),
        writing_type_guidance(writing_type),
        long_form_guidance(mode)
    )
}

pub fn outline_prompt(req: &OutlineRequest, writing_type: WritingType, window_years: u32) -> String {
    let head = header(req.category, writing_type, req.long_form_mode, req.citation_style);
    let rules = citation_rules(req.citation_style, req.allow_old_citations, window_years);
    let body = guidance(req.category, writing_type, req.long_form_mode, &rules);
    let education = req.education_level.as_deref().unwrap_or("Not specified");
    format!(
        r#"You are planning a {label} for a writer.

{head}
{body}
Education level: {education}

Topic: {topic}

Rules (non-negotiable):
1) Generate a detailed, structured outline.
2) Give every point a 2-3 sentence description.
3) Name sources only where you are certain they exist; otherwise leave the point uncited.

Output:
- Return ONLY the outline, no preamble.
"#,
        label = writing_type.label(),
        topic = req.topic.trim(),
    )
}

/// True when the request drafts one part of a larger work.
fn is_chapter(req: &WritingRequest) -> bool {
    req.long_form_mode != LongFormMode::Single
        || req.chapter_title.is_some()
        || !req.outline_points.is_empty()
}

pub fn draft_prompt(req: &WritingRequest, writing_type: WritingType, window_years: u32) -> String {
    let head = header(req.category, writing_type, req.long_form_mode, req.citation_style);
    let rules = citation_rules(req.citation_style, req.allow_old_citations, window_years);
    let body = guidance(req.category, writing_type, req.long_form_mode, &rules);

    let mut context = String::new();
    if let Some(title) = req.chapter_title.as_deref() {
        context.push_str(&format!("Chapter title: {}\n", title.trim()));
    }
    if let Some(level) = req.education_level.as_deref() {
        context.push_str(&format!("Education level: {}\n", level.trim()));
    }
    context.push_str(&format!("Target length: ~{} words.\n", req.word_count));
    if !req.outline_points.is_empty() {
        context.push_str("\nOutline points to cover:\n");
        for p in &req.outline_points {
            context.push_str(&format!("- {}\n", p.trim()));
        }
    }

    let instructions = if is_chapter(req) {
        "1) Write a deep, substantive chapter.\n2) Do NOT summarize the entire work.\n3) Do NOT write conclusions that end the overall piece.\n4) Include inline citations where appropriate, in the requested style only.\n"
    } else {
        "1) Write the complete piece.\n2) Include inline citations where appropriate, in the requested style only.\n3) End with a reference list in the requested style when sources are cited.\n"
    };
    let output = if is_chapter(req) {
        "Return ONLY the chapter content, no metadata."
    } else {
        "Return ONLY the finished text, no metadata."
    };

    format!(
        r#"You are writing a {label}.

{head}
{body}
Topic: {topic}
{context}
Rules (non-negotiable):
{instructions}
Output:
- {output}
"#,
        label = writing_type.label(),
        topic = req.topic.trim(),
    )
}
