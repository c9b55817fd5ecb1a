use crate::domain::{LongFormMode, OutlineRequest, WritingRequest, WritingType};
use crate::error::{AppError, FieldViolation};

pub const MAX_WORD_COUNT: u32 = 50_000;

fn require_text(field: &str, value: &str, violations: &mut Vec<FieldViolation>) {
    if value.trim().is_empty() {
        violations.push(FieldViolation::new(
            field,
            "VALIDATION_REQUIRED",
            format!("{field} must not be blank"),
        ));
    }
}

fn check_writing_type(raw: &str, violations: &mut Vec<FieldViolation>) -> Option<WritingType> {
    if raw.trim().is_empty() {
        violations.push(FieldViolation::new(
            "writing_type",
            "VALIDATION_REQUIRED",
            "writing_type must not be blank",
        ));
        return None;
    }
    let parsed = WritingType::parse(raw);
    if parsed.is_none() {
        let known = WritingType::ALL
            .iter()
            .map(|t| t.label())
            .collect::<Vec<_>>()
            .join(", ");
        violations.push(FieldViolation::new(
            "writing_type",
            "VALIDATION_UNKNOWN_VALUE",
            format!("unknown writing_type {raw:?}; expected one of: {known}"),
        ));
    }
    parsed
}

fn check_optional_text(field: &str, value: &Option<String>, violations: &mut Vec<FieldViolation>) {
    if let Some(v) = value.as_deref() {
        require_text(field, v, violations);
    }
}

/// Validate a writing request, collecting every violation (not just the first).
pub fn validate_writing_request(req: &WritingRequest) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    require_text("topic", &req.topic, &mut violations);
    check_writing_type(&req.writing_type, &mut violations);

    if req.word_count == 0 {
        violations.push(FieldViolation::new(
            "word_count",
            "VALIDATION_OUT_OF_RANGE",
            "word_count must be greater than 0",
        ));
    } else if req.word_count > MAX_WORD_COUNT {
        violations.push(FieldViolation::new(
            "word_count",
            "VALIDATION_OUT_OF_RANGE",
            format!("word_count must be at most {MAX_WORD_COUNT}"),
        ));
    }

    if req.long_form_mode == LongFormMode::Chapters && req.outline_points.is_empty() {
        violations.push(FieldViolation::new(
            "outline_points",
            "VALIDATION_REQUIRED",
            "outline_points must not be empty when long_form_mode is chapters",
        ));
    }
    for (i, point) in req.outline_points.iter().enumerate() {
        if point.trim().is_empty() {
            violations.push(FieldViolation::new(
                format!("outline_points[{i}]"),
                "VALIDATION_REQUIRED",
                "outline point must not be blank",
            ));
        }
    }

    check_optional_text("chapter_title", &req.chapter_title, &mut violations);
    check_optional_text("education_level", &req.education_level, &mut violations);

    violations
}

pub fn validate_outline_request(req: &OutlineRequest) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    require_text("topic", &req.topic, &mut violations);
    check_writing_type(&req.writing_type, &mut violations);
    check_optional_text("education_level", &req.education_level, &mut violations);
    violations
}

/// Validate and resolve the writing type, or fail with a structured `VALIDATION_FAILED`.
pub fn ensure_valid_writing_request(req: &WritingRequest) -> Result<WritingType, AppError> {
    let violations = validate_writing_request(req);
    resolve(violations, &req.writing_type)
}

pub fn ensure_valid_outline_request(req: &OutlineRequest) -> Result<WritingType, AppError> {
    let violations = validate_outline_request(req);
    resolve(violations, &req.writing_type)
}

fn resolve(violations: Vec<FieldViolation>, writing_type: &str) -> Result<WritingType, AppError> {
    if !violations.is_empty() {
        return Err(AppError::validation(violations));
    }
    WritingType::parse(writing_type)
        .ok_or_else(|| AppError::validation(vec![FieldViolation::new(
            "writing_type",
            "VALIDATION_UNKNOWN_VALUE",
            "unknown writing_type",
        )]))
}
