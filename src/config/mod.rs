pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use crate::config::toml_config::{TomlConfig, DEFAULT_CONFIG_FILE};
    use crate::core::tenure::parse_month_year;
    use crate::utils::error::{CvError, Result};
    use crate::utils::logger::LogFormat;
    use chrono::NaiveDate;
    use clap::Parser;
    use std::path::Path;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "cv-bldr")]
    #[command(about = "Build a formatted resume from a plain-text experience log")]
    pub struct CliConfig {
        /// Experience log to read (overrides [input].exp_file)
        #[arg(short, long)]
        pub input: Option<String>,

        /// Path to TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Header YAML with name, roles, contact and education
        #[arg(long)]
        pub header: Option<String>,

        /// Formatting YAML with margins and style rules
        #[arg(long)]
        pub formatting: Option<String>,

        /// Directory the resume is written to
        #[arg(long)]
        pub output_path: Option<String>,

        /// File name of the generated .docx
        #[arg(long)]
        pub output_file: Option<String>,

        /// Also write the parsed records to resume.json
        #[arg(long)]
        pub emit_json: bool,

        /// Date used for missing start/end dates, e.g. "June 2021"
        #[arg(long)]
        pub today: Option<String>,

        /// Parse and print tenure lines without writing a document
        #[arg(long)]
        pub dry_run: bool,

        #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
        pub log_format: LogFormat,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        /// 要載入的 TOML 檔：--config 優先，其次是工作目錄下的預設檔
        pub fn config_path(&self) -> Option<String> {
            self.config
                .clone()
                .or_else(|| Path::new(DEFAULT_CONFIG_FILE).exists().then(|| DEFAULT_CONFIG_FILE.to_string()))
        }

        /// 合併 TOML 配置與命令列參數，命令列優先
        pub fn resolve(&self) -> Result<TomlConfig> {
            let mut config = match (self.config_path(), &self.input) {
                (Some(path), _) => TomlConfig::from_file(&path)?,
                (None, Some(input)) => TomlConfig::for_input(input.clone()),
                (None, None) => {
                    return Err(CvError::MissingConfigError {
                        field: "input.exp_file".to_string(),
                    })
                }
            };

            if let Some(input) = &self.input {
                config.input.exp_file = input.clone();
            }
            if let Some(header) = &self.header {
                config.style.header = header.clone();
            }
            if let Some(formatting) = &self.formatting {
                config.style.formatting = formatting.clone();
            }
            if let Some(path) = &self.output_path {
                config.output.path = path.clone();
            }
            if let Some(file) = &self.output_file {
                config.output.filename = file.clone();
            }
            if self.emit_json {
                config.output.emit_json = true;
            }

            Ok(config)
        }

        /// 解析 --today，未指定時回傳 None
        pub fn today(&self) -> Result<Option<NaiveDate>> {
            self.today
                .as_deref()
                .map(|value| {
                    parse_month_year(value).ok_or_else(|| CvError::InvalidConfigValueError {
                        field: "today".to_string(),
                        value: value.to_string(),
                        reason: "Expected '<Month> <Year>', e.g. 'June 2021'".to_string(),
                    })
                })
                .transpose()
        }
    }

}
