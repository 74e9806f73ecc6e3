use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const REQUEST_SCHEMA_VERSION: &str = "v1";
pub const MAX_DIMENSION_VALUES: usize = 10_000;
pub const MAX_TOTAL_RUNS: usize = 200_000;
pub const DEFAULT_SEED_ENV_VAR: &str = "SWEEP_SEED";

/// Name reserved for the implicit outermost axis.
pub const REPETITION_DIMENSION: &str = "repetition";

/// One named axis of the cross-product. Values are opaque tokens handed to
/// the executable as positional arguments, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub values: Vec<String>,
}

impl Dimension {
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// How artifact file names are built from a run descriptor.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NamingScheme {
    /// `{values}{timestamp}`, the historical layout.
    TimestampOnly,
    /// `{values}{timestamp}_r{repetition}`.
    #[default]
    WithRepetition,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SweepRequest {
    pub repetitions: usize,
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_seed_env_var")]
    pub seed_env_var: String,
    #[serde(default)]
    pub naming: NamingScheme,
}

impl SweepRequest {
    /// The classic three-axis layout: `<category> <mode> <flag>`.
    pub fn standard<C, M, F>(repetitions: usize, categories: C, modes: M, flags: F) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            repetitions,
            dimensions: vec![
                Dimension::new("category", categories),
                Dimension::new("mode", modes),
                Dimension::new("flag", flags),
            ],
            seed: None,
            seed_env_var: default_seed_env_var(),
            naming: NamingScheme::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedSweep {
    pub repetitions: usize,
    pub dimensions: Vec<Dimension>,
    pub total_runs: usize,
    pub seed: Option<u64>,
    pub seed_env_var: String,
    pub naming: NamingScheme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn default_seed_env_var() -> String {
    DEFAULT_SEED_ENV_VAR.to_string()
}

pub fn normalize_request(payload: SweepRequest) -> Result<NormalizedSweep, ValidationError> {
    if payload.repetitions == 0 {
        return Err(ValidationError::new(
            "repetitions must be a positive integer",
        ));
    }

    if payload.dimensions.is_empty() {
        return Err(ValidationError::new("dimensions cannot be empty"));
    }

    let mut total_runs = payload.repetitions;
    let mut dimensions = Vec::with_capacity(payload.dimensions.len());
    for dimension in payload.dimensions {
        let name = dimension.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::new(
                "dimension names must be non-empty strings",
            ));
        }
        if name == REPETITION_DIMENSION {
            return Err(ValidationError::new(format!(
                "Dimension name '{REPETITION_DIMENSION}' is reserved"
            )));
        }
        if dimensions.iter().any(|seen: &Dimension| seen.name == name) {
            return Err(ValidationError::new(format!(
                "Dimension '{name}' is declared more than once"
            )));
        }
        if dimension.values.is_empty() {
            return Err(ValidationError::new(format!(
                "Dimension '{name}' must be a non-empty list"
            )));
        }
        if dimension.values.len() > MAX_DIMENSION_VALUES {
            return Err(ValidationError::new(format!(
                "Dimension '{name}' exceeds MAX_DIMENSION_VALUES={MAX_DIMENSION_VALUES}"
            )));
        }
        for value in &dimension.values {
            validate_token(&name, value)?;
        }

        total_runs = total_runs.saturating_mul(dimension.values.len());
        if total_runs > MAX_TOTAL_RUNS {
            return Err(ValidationError::new(format!(
                "Sweep is too large (>{MAX_TOTAL_RUNS} runs)"
            )));
        }

        dimensions.push(Dimension {
            name,
            values: dimension.values,
        });
    }

    let seed_env_var = payload.seed_env_var.trim().to_string();
    if seed_env_var.is_empty() {
        return Err(ValidationError::new("seed_env_var cannot be empty"));
    }
    if seed_env_var.contains(['=', '\0']) {
        return Err(ValidationError::new(format!(
            "seed_env_var '{seed_env_var}' is not a valid environment variable name"
        )));
    }

    Ok(NormalizedSweep {
        repetitions: payload.repetitions,
        dimensions,
        total_runs,
        seed: payload.seed,
        seed_env_var,
        naming: payload.naming,
    })
}

// Tokens end up inside artifact file names.
fn validate_token(dimension: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(format!(
            "Dimension '{dimension}' contains an empty value"
        )));
    }
    if value.contains(['/', '\\', '\0']) {
        return Err(ValidationError::new(format!(
            "Dimension '{dimension}' value '{value}' contains a path separator"
        )));
    }
    Ok(())
}

#[derive(Serialize)]
struct FingerprintView<'a> {
    schema_version: &'a str,
    repetitions: usize,
    dimensions: &'a [Dimension],
}

/// Identifies the parameter space of a sweep, independent of its seed.
pub fn request_fingerprint(request: &NormalizedSweep) -> String {
    let view = FingerprintView {
        schema_version: REQUEST_SCHEMA_VERSION,
        repetitions: request.repetitions,
        dimensions: &request.dimensions,
    };
    let mut hasher = Sha256::new();
    hasher.update(stable_contract_json(&view));
    format!("{:x}", hasher.finalize())
}

pub fn stable_contract_json(value: impl Serialize) -> String {
    serde_json::to_string(&value).expect("serialization of contract value should not fail")
}
