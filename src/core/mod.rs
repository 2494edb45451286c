pub mod clock;
pub mod etl;
pub mod parser;
pub mod pipeline;
pub mod tenure;

pub use crate::domain::model::{ExperienceLog, ExperienceRecord, ResumeEntry, TransformResult};
pub use crate::domain::ports::{Clock, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
