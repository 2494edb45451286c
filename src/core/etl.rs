use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct ResumeEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ResumeEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn run(&self) -> Result<String> {
        tracing::info!("Starting resume build...");

        // Extract
        tracing::info!("Reading experience log...");
        let raw_text = self.pipeline.extract()?;
        tracing::info!("Read {} lines", raw_text.lines().count());

        // Transform
        tracing::info!("Parsing experience log...");
        let result = self.pipeline.transform(raw_text)?;
        tracing::info!(
            "Parsed {} skills and {} jobs",
            result.skills.len(),
            result.entries.len()
        );

        // Load
        tracing::info!("Rendering resume...");
        let output_path = self.pipeline.load(result)?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
