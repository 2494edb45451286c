use crate::core::ConfigProvider;
use crate::utils::error::{CvError, Result};
use crate::utils::validation::{validate_file_extension, validate_non_empty_string, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_CONFIG_FILE: &str = "cv-bldr.toml";
pub const DEFAULT_HEADER_FILE: &str = "header.yaml";
pub const DEFAULT_FORMATTING_FILE: &str = "formatting.yaml";
pub const DEFAULT_OUTPUT_PATH: &str = ".";
pub const DEFAULT_OUTPUT_FILENAME: &str = "New Rezz.docx";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub exp_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_header_file")]
    pub header: String,
    #[serde(default = "default_formatting_file")]
    pub formatting: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default = "default_output_filename")]
    pub filename: String,
    #[serde(default)]
    pub emit_json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

fn default_header_file() -> String {
    DEFAULT_HEADER_FILE.to_string()
}

fn default_formatting_file() -> String {
    DEFAULT_FORMATTING_FILE.to_string()
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

fn default_output_filename() -> String {
    DEFAULT_OUTPUT_FILENAME.to_string()
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            header: default_header_file(),
            formatting: default_formatting_file(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            filename: default_output_filename(),
            emit_json: false,
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"))
}

impl TomlConfig {
    /// 只用輸入檔建立配置，其餘使用預設值
    pub fn for_input(exp_file: impl Into<String>) -> Self {
        Self {
            input: InputConfig {
                exp_file: exp_file.into(),
            },
            style: StyleConfig::default(),
            output: OutputConfig::default(),
            logging: None,
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CvError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CvError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${VAULT_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_path("input.exp_file", &self.input.exp_file)?;
        validate_path("style.header", &self.style.header)?;
        validate_path("style.formatting", &self.style.formatting)?;
        validate_path("output.path", &self.output.path)?;

        validate_non_empty_string("output.filename", &self.output.filename)?;
        validate_file_extension("output.filename", &self.output.filename, &["docx"])?;

        if let Some(level) = self.log_level() {
            if !VALID_LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(CvError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", VALID_LOG_LEVELS.join(", ")),
                });
            }
        }

        Ok(())
    }

    /// 取得日誌等級
    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn exp_file(&self) -> &str {
        &self.input.exp_file
    }

    fn header_file(&self) -> &str {
        &self.style.header
    }

    fn formatting_file(&self) -> &str {
        &self.style.formatting
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_filename(&self) -> &str {
        &self.output.filename
    }

    fn emit_json(&self) -> bool {
        self.output.emit_json
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[input]
exp_file = "vault/Experience.md"

[style]
header = "styles/header.yaml"

[output]
path = "./out"
emit_json = true

[logging]
level = "debug"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.exp_file(), "vault/Experience.md");
        assert_eq!(config.header_file(), "styles/header.yaml");
        assert_eq!(config.formatting_file(), DEFAULT_FORMATTING_FILE);
        assert_eq!(config.output_path(), "./out");
        assert_eq!(config.output_filename(), DEFAULT_OUTPUT_FILENAME);
        assert!(config.emit_json());
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_input_section_is_required() {
        let err = TomlConfig::from_toml_str("[output]\npath = \"out\"\n").unwrap_err();
        assert!(matches!(err, CvError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CV_BLDR_TEST_VAULT", "/home/jane/vault");

        let toml_content = r#"
[input]
exp_file = "${CV_BLDR_TEST_VAULT}/Experience.md"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.exp_file(), "/home/jane/vault/Experience.md");

        std::env::remove_var("CV_BLDR_TEST_VAULT");
    }

    #[test]
    fn test_unset_env_var_is_kept() {
        let toml_content = r#"
[input]
exp_file = "${CV_BLDR_TEST_UNSET_VAR}/Experience.md"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.exp_file(), "${CV_BLDR_TEST_UNSET_VAR}/Experience.md");
    }

    #[test]
    fn test_config_validation() {
        let mut config = TomlConfig::for_input("Experience.md");
        assert!(config.validate().is_ok());

        config.output.filename = "resume.pdf".to_string();
        assert!(config.validate().is_err());

        let mut config = TomlConfig::for_input("Experience.md");
        config.logging = Some(LoggingConfig {
            level: Some("loud".to_string()),
        });
        assert!(matches!(
            config.validate(),
            Err(CvError::InvalidConfigValueError { .. })
        ));

        assert!(TomlConfig::for_input("").validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[input]
exp_file = "Experience.md"

[output]
filename = "Jane Doe.docx"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_filename(), "Jane Doe.docx");
        assert_eq!(config.output_path(), DEFAULT_OUTPUT_PATH);
    }
}
