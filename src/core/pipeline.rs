use crate::core::parser::parse_experience_log;
use crate::core::tenure::compute_tenure;
use crate::core::{Clock, ConfigProvider, Pipeline, ResumeEntry, Storage, TransformResult};
use crate::render::docx::write_docx;
use crate::render::resume::{ResumeLayout, REQUIRED_RULES};
use crate::render::{Formatting, Header};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::path::Path;

pub const JSON_FILENAME: &str = "resume.json";

pub struct ResumePipeline<S: Storage, C: ConfigProvider, K: Clock> {
    storage: S,
    config: C,
    clock: K,
}

impl<S: Storage, C: ConfigProvider, K: Clock> ResumePipeline<S, C, K> {
    pub fn new(storage: S, config: C, clock: K) -> Self {
        Self {
            storage,
            config,
            clock,
        }
    }

    fn load_header(&self) -> Result<Header> {
        let path = self.config.header_file();
        tracing::debug!("Loading header from: {}", path);
        Header::from_yaml_str(&self.storage.read_to_string(path)?, path)
    }

    fn load_formatting(&self) -> Result<Formatting> {
        let path = self.config.formatting_file();
        tracing::debug!("Loading formatting from: {}", path);
        let formatting = Formatting::from_yaml_str(&self.storage.read_to_string(path)?, path)?;
        formatting.validate()?;
        for rule in REQUIRED_RULES {
            formatting.rule(rule)?;
        }
        Ok(formatting)
    }

    fn output_file(&self, filename: &str) -> String {
        Path::new(self.config.output_path())
            .join(filename)
            .to_string_lossy()
            .into_owned()
    }
}

impl<S: Storage, C: ConfigProvider, K: Clock> Pipeline for ResumePipeline<S, C, K> {
    fn extract(&self) -> Result<String> {
        tracing::debug!("Reading experience log: {}", self.config.exp_file());
        self.storage.read_to_string(self.config.exp_file())
    }

    fn transform(&self, raw_text: String) -> Result<TransformResult> {
        let log = parse_experience_log(&raw_text)?;
        let today = self.clock.today();

        let entries = log
            .experiences
            .into_iter()
            .map(|record| {
                let tenure = compute_tenure(record.start_date, record.end_date, today);
                tracing::debug!("{}: {}", record.company, tenure);
                ResumeEntry { record, tenure }
            })
            .collect();

        Ok(TransformResult {
            skills: log.skills,
            entries,
        })
    }

    fn load(&self, result: TransformResult) -> Result<String> {
        let header = self.load_header()?;
        let formatting = self.load_formatting()?;

        let document = ResumeLayout::new(&header, &formatting).build(&result)?;
        let docx = write_docx(&document)?;

        let output_path = self.output_file(self.config.output_filename());
        tracing::debug!("Writing document ({} bytes) to storage", docx.len());
        self.storage.write_file(&output_path, &docx)?;

        if self.config.emit_json() {
            let json_path = self.output_file(JSON_FILENAME);
            let json_data = serde_json::to_string_pretty(&result)?;
            self.storage.write_file(&json_path, json_data.as_bytes())?;
            tracing::info!("Parsed records written to: {}", json_path);
        }

        Ok(output_path)
    }
}
