use crate::domain::model::TransformResult;
use crate::utils::error::Result;
use chrono::NaiveDate;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Reads a UTF-8 text file. Invalid UTF-8 is an `InvalidData` IO error.
    fn read_to_string(&self, path: &str) -> Result<String> {
        let bytes = self.read_file(path)?;
        String::from_utf8(bytes).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{} is not valid UTF-8: {}", path, e),
            )
            .into()
        })
    }
}

pub trait ConfigProvider {
    fn exp_file(&self) -> &str;
    fn header_file(&self) -> &str;
    fn formatting_file(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_filename(&self) -> &str;
    fn emit_json(&self) -> bool;
}

/// Source of "today" for records without a start or end date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

pub trait Pipeline {
    fn extract(&self) -> Result<String>;
    fn transform(&self, raw_text: String) -> Result<TransformResult>;
    fn load(&self, result: TransformResult) -> Result<String>;
}
