use std::path::Path;

use moto_ppa_core::ppa::PpaPolicy;

use super::file;

/// Policy from a JSON or YAML file (by extension), or the standard policy
/// when no path is given. Always validated.
pub fn load_policy(path: Option<&str>) -> Result<PpaPolicy, Box<dyn std::error::Error>> {
    let policy: PpaPolicy = match path {
        None => PpaPolicy::default(),
        Some(p) if is_yaml(p) => file::read_yaml(p)?,
        Some(p) => file::read_json(p)?,
    };
    policy.validate()?;

    if let Some(p) = path {
        tracing::info!(path = p, credit_ceiling = %policy.credit_ceiling, "policy loaded");
    }
    Ok(policy)
}

fn is_yaml(path: &str) -> bool {
    matches!(
        Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("yaml" | "yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_detected_by_extension() {
        assert!(is_yaml("policy.yaml"));
        assert!(is_yaml("conf/POLICY.YML"));
        assert!(!is_yaml("policy.json"));
        assert!(!is_yaml("policy"));
    }

    #[test]
    fn test_default_policy_without_path() {
        let policy = load_policy(None).unwrap();
        assert_eq!(policy, PpaPolicy::default());
    }
}
