use crate::error::CostError;
use crate::profiles::schema::{TextProfile, WorkbookProfile};

const TOTAL_UPGRADE_JSON: &str = include_str!("../../../../profiles/total-upgrade.json");
const INTERCONNECTION_JSON: &str = include_str!("../../../../profiles/interconnection.json");
const WORKBOOK_INTERCONNECTION_JSON: &str =
    include_str!("../../../../profiles/workbook-interconnection.json");
const WORKBOOK_INTERCONNECTION_2016_JSON: &str =
    include_str!("../../../../profiles/workbook-interconnection-2016.json");

/// Predefined text profiles.
pub const PRESETS: &[&str] = &["total-upgrade", "interconnection"];

/// Predefined workbook profiles.
pub const WORKBOOK_PRESETS: &[&str] =
    &["workbook-interconnection", "workbook-interconnection-2016"];

/// Check if a preset describes workbook input rather than report text.
pub fn is_workbook_preset(name: &str) -> bool {
    WORKBOOK_PRESETS.contains(&name)
}

/// Load a predefined text profile by name.
pub fn load_text_preset(name: &str) -> Result<TextProfile, CostError> {
    match name {
        "total-upgrade" => Ok(serde_json::from_str(TOTAL_UPGRADE_JSON)?),
        "interconnection" => Ok(serde_json::from_str(INTERCONNECTION_JSON)?),
        _ if is_workbook_preset(name) => Err(CostError::ProfileInvalid(format!(
            "'{name}' is a workbook preset. Use the workbook command."
        ))),
        _ => Err(unknown(name, PRESETS)),
    }
}

/// Load a predefined workbook profile by name.
pub fn load_workbook_preset(name: &str) -> Result<WorkbookProfile, CostError> {
    match name {
        "workbook-interconnection" => Ok(serde_json::from_str(WORKBOOK_INTERCONNECTION_JSON)?),
        "workbook-interconnection-2016" => {
            Ok(serde_json::from_str(WORKBOOK_INTERCONNECTION_2016_JSON)?)
        }
        _ => Err(unknown(name, WORKBOOK_PRESETS)),
    }
}

fn unknown(name: &str, available: &[&str]) -> CostError {
    CostError::ProfileInvalid(format!(
        "unknown preset '{}'. Available: {}",
        name,
        available.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CostKind;
    use crate::profiles::schema::PolicyDef;
    use crate::profiles::{validate_text_profile, validate_workbook_profile};

    #[test]
    fn test_load_total_upgrade_preset() {
        let p = load_text_preset("total-upgrade").unwrap();
        assert_eq!(p.cost_kind, CostKind::TotalUpgrade);
        assert_eq!(p.start_markers[0], "Appendix E. - Cost Allocation Per Request");
        assert!(matches!(p.policy, PolicyDef::SummedDualValue { .. }));
        validate_text_profile(&p).unwrap();
    }

    #[test]
    fn test_load_interconnection_preset() {
        let p = load_text_preset("interconnection").unwrap();
        assert_eq!(p.cost_kind, CostKind::Interconnection);
        assert_eq!(p.start_markers.len(), 4);
        assert!(matches!(p.policy, PolicyDef::ContextualSingleValue { .. }));
        validate_text_profile(&p).unwrap();
    }

    #[test]
    fn test_load_workbook_preset() {
        let p = load_workbook_preset("workbook-interconnection").unwrap();
        assert_eq!(p.sheet, "Assigned Upgrade Costs");
        assert!(!p.aliases.description.contains(&"Upgrade Name".to_string()));
        assert!(!p.keywords.contains(&"Interconnection Costs".to_string()));
        validate_workbook_profile(&p).unwrap();
    }

    #[test]
    fn test_load_workbook_2016_preset() {
        let p = load_workbook_preset("workbook-interconnection-2016").unwrap();
        assert_eq!(p.sheet, "Assigned Upgrade Costs");
        assert_eq!(p.keywords, vec!["Interconnection Costs".to_string()]);
        assert!(p.aliases.description.contains(&"Upgrade Name".to_string()));
        validate_workbook_profile(&p).unwrap();
        assert!(is_workbook_preset("workbook-interconnection-2016"));
    }

    #[test]
    fn test_unknown_preset() {
        assert!(load_text_preset("xyz").is_err());
        assert!(load_workbook_preset("total-upgrade").is_err());
    }

    #[test]
    fn test_workbook_preset_not_a_text_profile() {
        assert!(is_workbook_preset("workbook-interconnection"));
        assert!(!is_workbook_preset("interconnection"));
        assert!(load_text_preset("workbook-interconnection").is_err());
    }
}
