pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::clock::{FixedClock, SystemClock};
pub use core::parser::parse_experience_log;
pub use core::tenure::{compute_tenure, parse_month_year};
pub use core::{etl::ResumeEngine, pipeline::ResumePipeline};
pub use domain::model::{ExperienceLog, ExperienceRecord, ResumeEntry, SkillList, TransformResult};
pub use domain::ports::{Clock, ConfigProvider, Pipeline, Storage};
pub use utils::error::{CvError, ErrorKind, Result};
