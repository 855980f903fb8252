use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    CatalogParseError,
    ConfigParseError,
    InvalidConfig,
    UnknownVehicle,
    UnknownPart,
    DuplicateVehicle,
    DuplicatePart,
    PartNotFound,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::CatalogParseError => "E1001",
            Self::ConfigParseError => "E1002",
            Self::InvalidConfig => "E1003",
            Self::UnknownVehicle => "E2001",
            Self::UnknownPart => "E2002",
            Self::DuplicateVehicle => "E2003",
            Self::DuplicatePart => "E2004",
            Self::PartNotFound => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::CatalogParseError => "Catalog file parse error",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidConfig => "Invalid analysis configuration",
            Self::UnknownVehicle => "Usage references an unknown vehicle",
            Self::UnknownPart => "Usage references an unknown part",
            Self::DuplicateVehicle => "Vehicle listed more than once",
            Self::DuplicatePart => "Part listed more than once",
            Self::PartNotFound => "Part not in catalog",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::CatalogParseError => {
                Some("Check the catalog TOML: `vehicles`, `parts` and [[usage]] tables.")
            }
            Self::ConfigParseError => Some("Fix syntax in the config TOML and retry."),
            Self::InvalidConfig => Some(
                "demand_threshold must lie in (0, 1], stratification_cutoff in [-1, 1), \
                 cascade_depth at least 1, and premium keywords must not be empty.",
            ),
            Self::UnknownVehicle => Some("Add the vehicle to `vehicles` or fix the usage entry."),
            Self::UnknownPart => Some("Add the part to `parts` or fix the usage entry."),
            Self::DuplicateVehicle | Self::DuplicatePart => {
                Some("Names are identities; remove the repeated entry.")
            }
            Self::PartNotFound => Some("List part names with `cogs hubs --all`."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A catalog that cannot be turned into a bipartite graph.
///
/// Every variant is fatal for the analysis run: edges that point at
/// undefined names are rejected, never dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(String),

    #[error("usage #{index} references unknown vehicle '{vehicle}'")]
    UnknownVehicle { index: usize, vehicle: String },

    #[error("usage #{index} references unknown part '{part}'")]
    UnknownPart { index: usize, part: String },

    #[error("vehicle '{0}' is listed more than once")]
    DuplicateVehicle(String),

    #[error("part '{0}' is listed more than once")]
    DuplicatePart(String),
}

impl CatalogError {
    /// The stable machine code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Parse(_) => ErrorCode::CatalogParseError,
            Self::UnknownVehicle { .. } => ErrorCode::UnknownVehicle,
            Self::UnknownPart { .. } => ErrorCode::UnknownPart,
            Self::DuplicateVehicle(_) => ErrorCode::DuplicateVehicle,
            Self::DuplicatePart(_) => ErrorCode::DuplicatePart,
        }
    }
}

impl From<toml::de::Error> for CatalogError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// An [`crate::config::AnalysisConfig`] that cannot be read or holds
/// out-of-range values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("{var} is not a valid value: '{value}'")]
    BadOverride { var: &'static str, value: String },

    #[error("{field} must lie in (0, 1], got {value}")]
    ThresholdOutOfRange { field: &'static str, value: f64 },

    #[error("stratification_cutoff must lie in [-1, 1), got {0}")]
    CutoffOutOfRange(f64),

    #[error("cascade_depth must be at least 1")]
    ZeroCascadeDepth,

    #[error("segments.premium_keywords must contain at least one keyword")]
    NoPremiumKeywords,
}

impl ConfigError {
    /// The stable machine code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Parse(_) | Self::BadOverride { .. } => ErrorCode::ConfigParseError,
            Self::ThresholdOutOfRange { .. }
            | Self::CutoffOutOfRange(_)
            | Self::ZeroCascadeDepth
            | Self::NoPremiumKeywords => ErrorCode::InvalidConfig,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
