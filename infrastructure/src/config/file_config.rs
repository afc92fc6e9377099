//! Raw TOML configuration data types
//!
//! These structs mirror the config file section by section. Enum-like
//! values stay strings here so that a typo is reported as a validation
//! issue naming the field, not as an opaque deserialization error.

use crate::backend::{BackendSettings, Provider};
use mad_application::{
    BaselineParams, BatchParams, DebateParams, GatewayConfig, SelfConsistencyParams, TokenBudgets,
};
use mad_domain::{AssignmentPolicy, BaselineMethod, DebateMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// One problem found while checking a loaded configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("{field}: unknown value '{value}' (expected one of: {expected})")]
    InvalidEnumValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{field}: {message}")]
    OutOfRange {
        field: &'static str,
        message: String,
    },

    #[error("{field}: must not be empty")]
    Empty { field: &'static str },
}

/// `[backend]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// "groq", "openrouter" or "custom"
    pub provider: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
}

/// `[gateway]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub timeout_seconds: u64,
    pub json_fallback: bool,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            max_retries: 10,
            base_delay_ms: 2000,
            max_delay_ms: 60_000,
            timeout_seconds: 120,
            json_fallback: true,
        }
    }
}

/// `[debate]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    pub mode: String,
    pub assignment: String,
    pub debater_temperature: f32,
    pub judge_temperature: f32,
    pub opening_tokens: u32,
    pub rebuttal_tokens: u32,
    pub judge_tokens: u32,
    pub open_ended_tokens: u32,
    pub synthesis_tokens: u32,
    pub validation_attempts: u32,
    pub seed: Option<u64>,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        let params = DebateParams::default();
        Self {
            mode: params.mode.as_str().to_string(),
            assignment: params.assignment.as_str().to_string(),
            debater_temperature: params.debater_temperature,
            judge_temperature: params.judge_temperature,
            opening_tokens: params.budgets.opening,
            rebuttal_tokens: params.budgets.rebuttal,
            judge_tokens: params.budgets.judge,
            open_ended_tokens: params.budgets.open_ended,
            synthesis_tokens: params.budgets.synthesis,
            validation_attempts: params.validation_attempts,
            seed: None,
        }
    }
}

/// `[batch]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBatchConfig {
    pub max_in_flight: usize,
    pub question_attempts: u32,
}

impl Default for FileBatchConfig {
    fn default() -> Self {
        let params = BatchParams::default();
        Self {
            max_in_flight: params.max_in_flight,
            question_attempts: params.question_attempts,
        }
    }
}

/// `[self_consistency]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSelfConsistencyConfig {
    pub num_samples: usize,
    pub temperature: f32,
    pub max_tokens: u32,
    pub essay_max_tokens: u32,
    pub sample_timeout_seconds: u64,
    pub retry_pause_ms: u64,
}

impl Default for FileSelfConsistencyConfig {
    fn default() -> Self {
        Self {
            num_samples: 10,
            temperature: 0.7,
            max_tokens: 400,
            essay_max_tokens: 2000,
            sample_timeout_seconds: 20,
            retry_pause_ms: 1000,
        }
    }
}

/// `[baseline]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBaselineConfig {
    pub method: String,
    pub temperature: f32,
    pub choice_tokens: u32,
    pub essay_tokens: u32,
    pub reasoned_essay_tokens: u32,
}

impl Default for FileBaselineConfig {
    fn default() -> Self {
        let params = BaselineParams::default();
        Self {
            method: params.method.to_string(),
            temperature: params.temperature,
            choice_tokens: params.choice_tokens,
            essay_tokens: params.essay_tokens,
            reasoned_essay_tokens: params.reasoned_essay_tokens,
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub backend: FileBackendConfig,
    pub gateway: FileGatewayConfig,
    pub debate: FileDebateConfig,
    pub batch: FileBatchConfig,
    pub baseline: FileBaselineConfig,
    pub self_consistency: FileSelfConsistencyConfig,
}

/// Validated configuration, converted into the types the layers consume
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub backend: BackendSettings,
    pub gateway: GatewayConfig,
    pub debate: DebateParams,
    pub batch: BatchParams,
    pub baseline: BaselineParams,
    pub self_consistency: SelfConsistencyParams,
}

fn check_temperature(
    field: &'static str,
    value: f32,
    issues: &mut Vec<ConfigValidationError>,
) {
    if !(0.0..=2.0).contains(&value) {
        issues.push(ConfigValidationError::OutOfRange {
            field,
            message: format!("{} is outside 0.0..=2.0", value),
        });
    }
}

fn check_positive(field: &'static str, value: u64, issues: &mut Vec<ConfigValidationError>) {
    if value == 0 {
        issues.push(ConfigValidationError::OutOfRange {
            field,
            message: "must be greater than zero".to_string(),
        });
    }
}

impl FileConfig {
    /// Render the merged configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    fn parse_provider(&self) -> Result<Provider, ConfigValidationError> {
        match &self.backend.provider {
            None => Ok(Provider::default()),
            Some(value) => value
                .parse()
                .map_err(|_| ConfigValidationError::InvalidEnumValue {
                    field: "backend.provider",
                    value: value.clone(),
                    expected: "groq, openrouter, custom",
                }),
        }
    }

    fn parse_mode(&self) -> Result<DebateMode, ConfigValidationError> {
        self.debate
            .mode
            .parse()
            .map_err(|_| ConfigValidationError::InvalidEnumValue {
                field: "debate.mode",
                value: self.debate.mode.clone(),
                expected: "vanilla, irac, irac-hybrid, open-ended, open-ended-vanilla",
            })
    }

    fn parse_assignment(&self) -> Result<AssignmentPolicy, ConfigValidationError> {
        self.debate
            .assignment
            .parse()
            .map_err(|_| ConfigValidationError::InvalidEnumValue {
                field: "debate.assignment",
                value: self.debate.assignment.clone(),
                expected: "independent-distinct, free-then-constrained",
            })
    }

    fn parse_method(&self) -> Result<BaselineMethod, ConfigValidationError> {
        self.baseline
            .method
            .parse()
            .map_err(|_| ConfigValidationError::InvalidEnumValue {
                field: "baseline.method",
                value: self.baseline.method.clone(),
                expected: "single, cot, cot-irac, self-consistency",
            })
    }

    /// Validate the entire configuration, returning every detected issue.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        match self.parse_provider() {
            Ok(Provider::Custom) if self.backend.base_url.is_none() => {
                issues.push(ConfigValidationError::Empty {
                    field: "backend.base_url",
                });
            }
            Ok(_) => {}
            Err(e) => issues.push(e),
        }
        if self.backend.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            issues.push(ConfigValidationError::Empty {
                field: "backend.model",
            });
        }
        if let Err(e) = self.parse_mode() {
            issues.push(e);
        }
        if let Err(e) = self.parse_assignment() {
            issues.push(e);
        }

        let gateway = &self.gateway;
        check_positive("gateway.max_retries", gateway.max_retries.into(), &mut issues);
        check_positive("gateway.timeout_seconds", gateway.timeout_seconds, &mut issues);
        if gateway.base_delay_ms > gateway.max_delay_ms {
            issues.push(ConfigValidationError::OutOfRange {
                field: "gateway.base_delay_ms",
                message: format!(
                    "{} exceeds gateway.max_delay_ms ({})",
                    gateway.base_delay_ms, gateway.max_delay_ms
                ),
            });
        }

        let debate = &self.debate;
        check_temperature("debate.debater_temperature", debate.debater_temperature, &mut issues);
        check_temperature("debate.judge_temperature", debate.judge_temperature, &mut issues);
        check_positive("debate.validation_attempts", debate.validation_attempts.into(), &mut issues);
        for (field, tokens) in [
            ("debate.opening_tokens", debate.opening_tokens),
            ("debate.rebuttal_tokens", debate.rebuttal_tokens),
            ("debate.judge_tokens", debate.judge_tokens),
            ("debate.open_ended_tokens", debate.open_ended_tokens),
            ("debate.synthesis_tokens", debate.synthesis_tokens),
        ] {
            check_positive(field, tokens.into(), &mut issues);
        }

        check_positive("batch.max_in_flight", self.batch.max_in_flight as u64, &mut issues);
        check_positive(
            "batch.question_attempts",
            self.batch.question_attempts.into(),
            &mut issues,
        );

        let baseline = &self.baseline;
        if let Err(e) = self.parse_method() {
            issues.push(e);
        }
        check_temperature("baseline.temperature", baseline.temperature, &mut issues);
        for (field, tokens) in [
            ("baseline.choice_tokens", baseline.choice_tokens),
            ("baseline.essay_tokens", baseline.essay_tokens),
            ("baseline.reasoned_essay_tokens", baseline.reasoned_essay_tokens),
        ] {
            check_positive(field, tokens.into(), &mut issues);
        }

        let sc = &self.self_consistency;
        check_positive("self_consistency.num_samples", sc.num_samples as u64, &mut issues);
        check_temperature("self_consistency.temperature", sc.temperature, &mut issues);
        check_positive("self_consistency.max_tokens", sc.max_tokens.into(), &mut issues);
        check_positive(
            "self_consistency.essay_max_tokens",
            sc.essay_max_tokens.into(),
            &mut issues,
        );

        issues
    }

    /// Validate and convert into per-layer configuration.
    pub fn resolve(&self) -> Result<ResolvedConfig, Vec<ConfigValidationError>> {
        let issues = self.validate();
        if !issues.is_empty() {
            return Err(issues);
        }
        let provider = self.parse_provider().map_err(|e| vec![e])?;
        let mode = self.parse_mode().map_err(|e| vec![e])?;
        let assignment = self.parse_assignment().map_err(|e| vec![e])?;
        let method = self.parse_method().map_err(|e| vec![e])?;

        let mut backend = BackendSettings::for_provider(provider);
        if let Some(base_url) = &self.backend.base_url {
            backend.base_url = base_url.clone();
        }
        if let Some(model) = &self.backend.model {
            backend.model = model.clone();
        }
        if let Some(env) = &self.backend.api_key_env {
            backend.api_key_env = env.clone();
        }

        let mut gateway = GatewayConfig::default()
            .with_max_retries(self.gateway.max_retries)
            .with_base_delay(Duration::from_millis(self.gateway.base_delay_ms))
            .with_max_delay(Duration::from_millis(self.gateway.max_delay_ms))
            .with_request_timeout(Duration::from_secs(self.gateway.timeout_seconds));
        if !self.gateway.json_fallback {
            gateway = gateway.without_json_fallback();
        }

        let d = &self.debate;
        let mut debate = DebateParams::default()
            .with_mode(mode)
            .with_assignment(assignment)
            .with_temperatures(d.debater_temperature, d.judge_temperature)
            .with_validation_attempts(d.validation_attempts)
            .with_budgets(TokenBudgets {
                opening: d.opening_tokens,
                rebuttal: d.rebuttal_tokens,
                judge: d.judge_tokens,
                open_ended: d.open_ended_tokens,
                synthesis: d.synthesis_tokens,
            });
        if let Some(seed) = d.seed {
            debate = debate.with_seed(seed);
        }

        let batch = BatchParams::default()
            .with_max_in_flight(self.batch.max_in_flight)
            .with_question_attempts(self.batch.question_attempts);

        let b = &self.baseline;
        let mut baseline = BaselineParams::default()
            .with_method(method)
            .with_temperature(b.temperature);
        baseline.choice_tokens = b.choice_tokens;
        baseline.essay_tokens = b.essay_tokens;
        baseline.reasoned_essay_tokens = b.reasoned_essay_tokens;

        let sc = &self.self_consistency;
        let mut self_consistency = SelfConsistencyParams::default()
            .with_num_samples(sc.num_samples)
            .with_sample_timeout(Duration::from_secs(sc.sample_timeout_seconds))
            .with_retry_pause(Duration::from_millis(sc.retry_pause_ms));
        self_consistency.temperature = sc.temperature;
        self_consistency.max_tokens = sc.max_tokens;
        self_consistency.essay_max_tokens = sc.essay_max_tokens;
        if let Some(seed) = d.seed {
            self_consistency = self_consistency.with_seed(seed);
        }

        Ok(ResolvedConfig {
            backend,
            gateway,
            debate,
            batch,
            baseline,
            self_consistency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());

        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.backend.provider, Provider::Groq);
        assert_eq!(resolved.backend.api_key_env, "GROQ_API_KEY");
        assert_eq!(resolved.gateway.max_retries, 10);
        assert_eq!(resolved.debate.mode, DebateMode::IracHybrid);
        assert_eq!(resolved.self_consistency.max_tokens, 400);
        assert_eq!(resolved.self_consistency.essay_max_tokens, 2000);
        assert_eq!(resolved.baseline.method, BaselineMethod::SelfConsistency);
        assert_eq!(resolved.baseline.temperature, 0.0);
    }

    #[test]
    fn test_baseline_section() {
        let config: FileConfig = toml::from_str(
            r#"
[baseline]
method = "cot-irac"
essay_tokens = 1200
"#,
        )
        .unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.baseline.method, BaselineMethod::CotIrac);
        assert_eq!(resolved.baseline.essay_tokens, 1200);
        assert_eq!(resolved.baseline.choice_tokens, 500);

        let mut bad = FileConfig::default();
        bad.baseline.method = "debate".to_string();
        bad.baseline.reasoned_essay_tokens = 0;
        let issues = bad.validate();
        assert!(issues.iter().any(|i| matches!(
            i,
            ConfigValidationError::InvalidEnumValue { field: "baseline.method", .. }
        )));
        assert!(issues.iter().any(|i| matches!(
            i,
            ConfigValidationError::OutOfRange { field: "baseline.reasoned_essay_tokens", .. }
        )));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[backend]
provider = "openrouter"
model = "meta-llama/llama-3.3-70b-instruct"

[debate]
mode = "irac"
assignment = "independent-distinct"
seed = 42

[gateway]
max_retries = 3
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let resolved = config.resolve().unwrap();

        assert_eq!(resolved.backend.provider, Provider::OpenRouter);
        assert_eq!(resolved.backend.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(resolved.backend.model, "meta-llama/llama-3.3-70b-instruct");
        assert_eq!(resolved.debate.mode, DebateMode::Irac);
        assert_eq!(resolved.debate.assignment, AssignmentPolicy::IndependentDistinct);
        assert_eq!(resolved.debate.seed, Some(42));
        assert_eq!(resolved.gateway.max_retries, 3);
        // untouched sections keep their defaults
        assert_eq!(resolved.gateway.request_timeout, Duration::from_secs(120));
        assert_eq!(resolved.batch.max_in_flight, 4);
    }

    #[test]
    fn test_validation_reports_every_issue() {
        let mut config = FileConfig::default();
        config.debate.mode = "socratic".into();
        config.debate.judge_temperature = 3.5;
        config.gateway.max_retries = 0;
        config.backend.provider = Some("custom".into());

        let issues = config.validate();
        assert_eq!(issues.len(), 4);
        assert!(issues.contains(&ConfigValidationError::Empty {
            field: "backend.base_url"
        }));
        assert!(issues.iter().any(|i| i.to_string().starts_with("debate.mode: unknown value 'socratic'")));
        assert!(config.resolve().is_err());
    }

    #[test]
    fn test_to_toml_reads_back() {
        let mut config = FileConfig::default();
        config.debate.seed = Some(9);
        let text = config.to_toml().unwrap();
        assert!(text.contains("[debate]"));
        let back: FileConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_base_delay_above_max_is_rejected() {
        let mut config = FileConfig::default();
        config.gateway.base_delay_ms = 90_000;
        let issues = config.validate();
        assert!(matches!(
            issues.as_slice(),
            [ConfigValidationError::OutOfRange {
                field: "gateway.base_delay_ms",
                ..
            }]
        ));
    }
}
