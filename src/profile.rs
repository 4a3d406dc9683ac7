use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read profile at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse profile at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// How much investment risk the client accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl RiskTolerance {
    /// Label used when describing the client to the model.
    pub fn label(self) -> &'static str {
        match self {
            RiskTolerance::Conservative => "保守",
            RiskTolerance::Moderate => "穩健",
            RiskTolerance::Aggressive => "積極",
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskTolerance::Conservative => "conservative",
            RiskTolerance::Moderate => "moderate",
            RiskTolerance::Aggressive => "aggressive",
        };
        f.write_str(name)
    }
}

/// The figures a client fills in before asking for a report.
///
/// Amounts are not validated; zero or negative income is accepted and
/// handled where it matters (see [`crate::ChartData`]).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FinancialProfile {
    #[serde(alias = "monthlyIncome")]
    pub monthly_income: f64,
    #[serde(alias = "monthlyExpenses")]
    pub monthly_expenses: f64,
    #[serde(alias = "totalAssets")]
    pub total_assets: f64,
    #[serde(alias = "totalLiabilities")]
    pub total_liabilities: f64,
    #[serde(alias = "financialGoal")]
    pub financial_goal: String,
    pub age: u32,
    #[serde(alias = "riskTolerance")]
    pub risk_tolerance: RiskTolerance,
}

impl Default for FinancialProfile {
    fn default() -> Self {
        Self {
            monthly_income: 50_000.0,
            monthly_expenses: 30_000.0,
            total_assets: 500_000.0,
            total_liabilities: 0.0,
            financial_goal: String::new(),
            age: 30,
            risk_tolerance: RiskTolerance::Moderate,
        }
    }
}

impl FinancialProfile {
    /// Load a profile from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let content = fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ProfileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
