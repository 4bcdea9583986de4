pub mod builtin;
pub mod schema;

use crate::error::CostError;
use crate::tabular::LogicalField;
use schema::{PolicyDef, TextProfile, WorkbookProfile};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Upper bound on the contextual gap. Keeps the compiled pattern small.
pub const MAX_GAP_LIMIT: usize = 1000;

/// Load a text profile from a JSON file.
pub fn load_text_profile(path: &Path) -> Result<TextProfile, CostError> {
    let profile: TextProfile = load_json(path)?;
    validate_text_profile(&profile)?;
    Ok(profile)
}

/// Load a workbook profile from a JSON file.
pub fn load_workbook_profile(path: &Path) -> Result<WorkbookProfile, CostError> {
    let profile: WorkbookProfile = load_json(path)?;
    validate_workbook_profile(&profile)?;
    Ok(profile)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, CostError> {
    let content = std::fs::read_to_string(path).map_err(|e| CostError::ProfileLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| CostError::ProfileLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Parse a text profile from a JSON string (no file path context).
pub fn parse_text_profile_str(json: &str) -> Result<TextProfile, CostError> {
    let profile: TextProfile = serde_json::from_str(json)?;
    validate_text_profile(&profile)?;
    Ok(profile)
}

/// Parse a workbook profile from a JSON string (no file path context).
pub fn parse_workbook_profile_str(json: &str) -> Result<WorkbookProfile, CostError> {
    let profile: WorkbookProfile = serde_json::from_str(json)?;
    validate_workbook_profile(&profile)?;
    Ok(profile)
}

/// Validate that a text profile is well-formed.
pub fn validate_text_profile(profile: &TextProfile) -> Result<(), CostError> {
    check_markers("start_markers", &profile.start_markers)?;
    check_markers("end_markers", &profile.end_markers)?;

    if profile.generator.prefixes.is_empty() {
        return Err(CostError::ProfileInvalid(
            "generator.prefixes must not be empty".into(),
        ));
    }
    for prefix in &profile.generator.prefixes {
        let valid = (3..=4).contains(&prefix.len())
            && prefix.chars().all(|c| c.is_ascii_alphabetic());
        if !valid {
            return Err(CostError::ProfileInvalid(format!(
                "invalid generator prefix '{prefix}' (expected 3-4 ASCII letters)"
            )));
        }
    }

    match &profile.policy {
        PolicyDef::SummedDualValue { sentinel, .. } => {
            if sentinel.trim().is_empty() {
                return Err(CostError::ProfileInvalid(
                    "sentinel must not be empty".into(),
                ));
            }
        }
        PolicyDef::ContextualSingleValue {
            keyword, max_gap, ..
        } => {
            if keyword.trim().is_empty() {
                return Err(CostError::ProfileInvalid(
                    "keyword must not be empty".into(),
                ));
            }
            if !(1..=MAX_GAP_LIMIT).contains(max_gap) {
                return Err(CostError::ProfileInvalid(format!(
                    "max_gap {max_gap} out of range (1..={MAX_GAP_LIMIT})"
                )));
            }
        }
    }

    Ok(())
}

/// Validate that a workbook profile is well-formed.
pub fn validate_workbook_profile(profile: &WorkbookProfile) -> Result<(), CostError> {
    if profile.sheet.trim().is_empty() {
        return Err(CostError::ProfileInvalid("sheet must not be empty".into()));
    }

    for field in [
        LogicalField::GeneratorId,
        LogicalField::Description,
        LogicalField::AllocatedCost,
    ] {
        if profile.aliases.aliases(field).is_empty() {
            return Err(CostError::ProfileInvalid(format!(
                "no header aliases for the {field} column"
            )));
        }
    }

    if profile.keywords.iter().all(|k| k.trim().is_empty()) {
        return Err(CostError::ProfileInvalid(
            "keywords must contain at least one entry".into(),
        ));
    }

    Ok(())
}

fn check_markers(field: &str, markers: &[String]) -> Result<(), CostError> {
    if markers.is_empty() {
        return Err(CostError::ProfileInvalid(format!(
            "{field} must not be empty"
        )));
    }
    if markers.iter().any(|m| m.trim().is_empty()) {
        return Err(CostError::ProfileInvalid(format!(
            "{field} contains a blank heading"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "name": "Test",
        "version": "1.0",
        "cost_kind": "total_upgrade",
        "start_markers": ["Appendix E"],
        "end_markers": ["Appendix F"],
        "policy": { "type": "summed_dual_value" }
    }"#;

    #[test]
    fn test_parse_valid_profile_with_defaults() {
        let p = parse_text_profile_str(VALID).unwrap();
        assert_eq!(p.name, "Test");
        assert_eq!(p.generator.prefixes, vec!["GEN", "ASGI"]);
        match p.policy {
            PolicyDef::SummedDualValue { sentinel, .. } => assert_eq!(sentinel, "Total"),
            other => panic!("unexpected policy {other:?}"),
        }
    }

    #[test]
    fn test_empty_markers_rejected() {
        let json = VALID.replace(r#"["Appendix F"]"#, "[]");
        assert!(parse_text_profile_str(&json).is_err());
    }

    #[test]
    fn test_bad_prefix_rejected() {
        let json = VALID.replace(
            r#""policy""#,
            r#""generator": { "prefixes": ["G3N"] }, "policy""#,
        );
        assert!(parse_text_profile_str(&json).is_err());
    }

    #[test]
    fn test_max_gap_bounds() {
        let json = |gap: usize| {
            format!(
                r#"{{
                "name": "Ic", "version": "1", "cost_kind": "interconnection",
                "start_markers": ["E."], "end_markers": ["F."],
                "policy": {{ "type": "contextual_single_value", "max_gap": {gap} }}
            }}"#
            )
        };
        assert!(parse_text_profile_str(&json(200)).is_ok());
        assert!(parse_text_profile_str(&json(0)).is_err());
        assert!(parse_text_profile_str(&json(MAX_GAP_LIMIT + 1)).is_err());
    }

    #[test]
    fn test_unknown_policy_type_rejected() {
        let json = VALID.replace("summed_dual_value", "median");
        assert!(parse_text_profile_str(&json).is_err());
    }

    #[test]
    fn test_workbook_profile_needs_keywords() {
        let json = r#"{
            "name": "Wb", "version": "1", "cost_kind": "interconnection",
            "aliases": {
                "generator_id": ["Gen Number"],
                "description": ["Upgrade Details"],
                "allocated_cost": ["Allocated Cost"]
            },
            "keywords": []
        }"#;
        assert!(parse_workbook_profile_str(json).is_err());
        let ok = json.replace(r#""keywords": []"#, r#""keywords": ["interconnection"]"#);
        let p = parse_workbook_profile_str(&ok).unwrap();
        assert_eq!(p.sheet, "Assigned Upgrade Costs");
    }

    #[test]
    fn test_workbook_profile_empty_alias_list_rejected() {
        let json = r#"{
            "name": "Wb", "version": "1", "cost_kind": "interconnection",
            "aliases": { "generator_id": [], "description": ["D"], "allocated_cost": ["C"] },
            "keywords": ["x"]
        }"#;
        assert!(parse_workbook_profile_str(json).is_err());
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = load_text_profile(Path::new("/nonexistent/profile.json")).unwrap_err();
        assert!(matches!(err, CostError::ProfileLoad { .. }));
    }
}
