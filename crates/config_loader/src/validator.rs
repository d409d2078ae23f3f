//! 配置校验模块
//!
//! 校验规则：
//! - tick_ms > 0, radius_steps >= 1 (derive 规则)
//! - sink 名称非空且唯一
//! - file sink 必须提供 `path` 参数

use std::collections::HashSet;

use contracts::{ContractError, SimulatorConfig, SinkType};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// 校验 SimulatorConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &SimulatorConfig) -> Result<(), ContractError> {
    validate_ranges(config)?;
    validate_sink_names(config)?;
    validate_sink_params(config)?;
    Ok(())
}

/// 校验数值范围
fn validate_ranges(config: &SimulatorConfig) -> Result<(), ContractError> {
    config.validate().map_err(|errors| {
        let (field, message) = first_violation(&errors, "")
            .unwrap_or_else(|| ("config".to_string(), errors.to_string()));
        ContractError::config_validation(field, message)
    })
}

/// 取第一个字段错误（按字段名排序，保证输出稳定）
fn first_violation(errors: &ValidationErrors, prefix: &str) -> Option<(String, String)> {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by_key(|(field, _)| field.to_string());

    entries.into_iter().find_map(|(field, kind)| {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => list.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed '{}' check", e.code));
                (path, message)
            }),
            ValidationErrorsKind::Struct(inner) => first_violation(inner, &path),
            ValidationErrorsKind::List(items) => items
                .iter()
                .find_map(|(idx, inner)| first_violation(inner, &format!("{path}[{idx}]"))),
        }
    })
}

/// 校验 sink 名称
fn validate_sink_names(config: &SimulatorConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, sink) in config.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{}].name", idx),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
    }
    Ok(())
}

/// 校验 sink 类型特定参数
fn validate_sink_params(config: &SimulatorConfig) -> Result<(), ContractError> {
    for sink in &config.sinks {
        if sink.sink_type == SinkType::File
            && sink.params.get("path").is_none_or(|p| p.trim().is_empty())
        {
            return Err(ContractError::config_validation(
                format!("sinks[{}].params.path", sink.name),
                "file sink requires a 'path' param",
            ));
        }
    }
    Ok(())
}
