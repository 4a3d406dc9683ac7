use serde::Deserialize;
use std::fs;
use std::path::Path;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub report: ReportConfig,
    pub page: PageConfig,
    pub font: FontConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL up to and including the API version segment.
    pub endpoint: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.7,
            timeout_secs: 60,
            api_key_env: "API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
    pub subtitle: String,
    pub heading: String,
    pub disclaimer: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "WealthArchitect AI".to_string(),
            subtitle: "AI 智能財務顧問".to_string(),
            heading: "財務診斷報告書".to_string(),
            disclaimer: "免責聲明：本報告由 AI 生成，僅供財務規劃參考，不代表對未來投資績效之保證。\
                         實際保險商品內容與條款請以保險公司公告為主。投資理財有賺有賠，購買前請審慎評估風險。"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub numbers: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self { numbers: true }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub sans: bool,
    /// Search installed fonts as well as the embedded ones. Needed for CJK text.
    pub system_fonts: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            sans: false,
            system_fonts: true,
        }
    }
}

impl Config {
    /// The configuration bundled into the binary.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                log::warn!("ignoring invalid config {}: {e}", path.display());
                Self::compiled_default()
            }),
            Err(_) => Self::compiled_default(),
        }
    }
}
