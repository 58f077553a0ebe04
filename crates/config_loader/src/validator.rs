//! Configuration validation
//!
//! Rules:
//! - rpc address and service are non-empty
//! - pipeline names are non-empty and unique
//! - dispatch patterns are non-empty and unique
//! - dispatch targets name a declared pipeline (when any are declared)

use std::collections::HashSet;

use contracts::{ContractError, JobsConfig};
use validator::Validate;

/// Validate a `JobsConfig`
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &JobsConfig) -> Result<(), ContractError> {
    validate_fields(config)?;
    validate_pipelines(config)?;
    validate_dispatch(config)?;
    Ok(())
}

/// Field-level checks declared on the config types
fn validate_fields(config: &JobsConfig) -> Result<(), ContractError> {
    config
        .validate()
        .map_err(|e| ContractError::config_validation("rpc", e.to_string()))
}

fn validate_pipelines(config: &JobsConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, pipeline) in config.pipelines.iter().enumerate() {
        if pipeline.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("pipelines[{idx}].name"),
                "pipeline name cannot be empty",
            ));
        }
        if !seen.insert(pipeline.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("pipelines[name={}]", pipeline.name),
                "duplicate pipeline name",
            ));
        }
    }
    Ok(())
}

fn validate_dispatch(config: &JobsConfig) -> Result<(), ContractError> {
    let declared: HashSet<_> = config.pipelines.iter().map(|p| p.name.as_str()).collect();
    let mut seen = HashSet::new();

    for (idx, rule) in config.dispatch.iter().enumerate() {
        if rule.pattern.is_empty() {
            return Err(ContractError::config_validation(
                format!("dispatch[{idx}].pattern"),
                "dispatch pattern cannot be empty",
            ));
        }
        if rule.pipeline.is_empty() {
            return Err(ContractError::config_validation(
                format!("dispatch[{idx}].pipeline"),
                "dispatch pipeline cannot be empty",
            ));
        }
        if !seen.insert(rule.pattern.to_ascii_lowercase()) {
            return Err(ContractError::config_validation(
                format!("dispatch[pattern={}]", rule.pattern),
                "duplicate dispatch pattern",
            ));
        }
        if !declared.is_empty() && !declared.contains(rule.pipeline.as_str()) {
            return Err(ContractError::config_validation(
                format!("dispatch[{idx}].pipeline"),
                format!("pipeline '{}' is not declared", rule.pipeline),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DispatchRule, PipelineConfig, RpcConfig};

    fn minimal_config() -> JobsConfig {
        JobsConfig {
            rpc: RpcConfig::default(),
            pipelines: vec![PipelineConfig {
                name: "default".into(),
                broker: None,
            }],
            dispatch: vec![DispatchRule::new("app-jobs-*", "default")],
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn test_empty_rpc_address() {
        let mut config = minimal_config();
        config.rpc.address = String::new();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("rpc address cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_duplicate_pipeline() {
        let mut config = minimal_config();
        config.pipelines.push(config.pipelines[0].clone());
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("duplicate pipeline name"), "got: {err}");
    }

    #[test]
    fn test_duplicate_pattern_ignores_case() {
        let mut config = minimal_config();
        config
            .dispatch
            .push(DispatchRule::new("APP-JOBS-*", "default"));
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("duplicate dispatch pattern"), "got: {err}");
    }

    #[test]
    fn test_empty_pattern() {
        let mut config = minimal_config();
        config.dispatch[0].pattern = String::new();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_undeclared_pipeline() {
        let mut config = minimal_config();
        config.dispatch[0].pipeline = "mail".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("'mail' is not declared"), "got: {err}");
    }

    #[test]
    fn test_undeclared_pipeline_allowed_without_declarations() {
        let mut config = minimal_config();
        config.pipelines.clear();
        config.dispatch[0].pipeline = "mail".into();
        assert!(validate(&config).is_ok());
    }
}
