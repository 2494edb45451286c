use crate::utils::error::{CvError, Result};
use serde::de::{DeserializeOwned, Deserializer, Error as _, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;

/// Identity block printed above the skills table, read from `header.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Contact lines in file order, e.g. email, phone, profile links.
    #[serde(default, deserialize_with = "ordered_entries")]
    pub contact: Vec<(String, ScalarText)>,
    #[serde(default, deserialize_with = "ordered_entries")]
    pub education: Vec<(String, Degree)>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Degree {
    pub diploma: String,
    pub school: String,
    #[serde(rename = "completionDate")]
    pub completion_date: ScalarText,
}

impl Degree {
    pub fn summary(&self) -> String {
        format!(
            "{} from the {}, completed {}",
            self.diploma, self.school, self.completion_date.0
        )
    }
}

/// A YAML scalar kept as text. Phone numbers and years are often written
/// unquoted and would otherwise arrive as numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarText(pub String);

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match serde_yaml::Value::deserialize(deserializer)? {
            serde_yaml::Value::String(text) => Ok(ScalarText(text)),
            serde_yaml::Value::Number(number) => Ok(ScalarText(number.to_string())),
            serde_yaml::Value::Bool(flag) => Ok(ScalarText(flag.to_string())),
            serde_yaml::Value::Null => Ok(ScalarText(String::new())),
            _ => Err(D::Error::custom("expected a plain value")),
        }
    }
}

/// Deserializes a mapping into `(key, value)` pairs in file order.
fn ordered_entries<'de, D, V>(deserializer: D) -> std::result::Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: DeserializeOwned,
{
    struct EntriesVisitor<V>(PhantomData<V>);

    impl<'de, V: DeserializeOwned> Visitor<'de> for EntriesVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a mapping")
        }

        fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, V>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_any(EntriesVisitor(PhantomData))
}

impl Header {
    pub fn from_yaml_str(content: &str, source_name: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| CvError::YamlError {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
    }

    pub fn roles_line(&self) -> Option<String> {
        (!self.roles.is_empty()).then(|| self.roles.join(" | "))
    }

    pub fn contact_line(&self) -> Option<String> {
        let values: Vec<&str> = self
            .contact
            .iter()
            .map(|(_, value)| value.0.as_str())
            .filter(|value| !value.is_empty())
            .collect();
        (!values.is_empty()).then(|| values.join("   |   "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = r#"
name: Jane Doe
roles:
  - Backend Engineer
  - SRE
contact:
  phone: 5551234567
  email: jane@example.com
  github: github.com/janedoe
education:
  masters:
    diploma: MSc Computer Science
    school: University of Somewhere
    completionDate: 2016
  bachelors:
    diploma: BSc Mathematics
    school: College of Elsewhere
    completionDate: May 2014
"#;

    #[test]
    fn test_header_keeps_file_order() {
        let header = Header::from_yaml_str(HEADER, "header.yaml").unwrap();

        assert_eq!(header.name.as_deref(), Some("Jane Doe"));
        assert_eq!(header.roles_line().as_deref(), Some("Backend Engineer | SRE"));
        assert_eq!(
            header.contact_line().as_deref(),
            Some("5551234567   |   jane@example.com   |   github.com/janedoe")
        );

        let keys: Vec<&str> = header.education.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["masters", "bachelors"]);
        assert_eq!(
            header.education[0].1.summary(),
            "MSc Computer Science from the University of Somewhere, completed 2016"
        );
    }

    #[test]
    fn test_sparse_header() {
        let header = Header::from_yaml_str("name: Jane Doe\ncontact:\n", "header.yaml").unwrap();
        assert!(header.roles_line().is_none());
        assert!(header.contact_line().is_none());
        assert!(header.education.is_empty());
    }

    #[test]
    fn test_invalid_yaml_names_source() {
        let err = Header::from_yaml_str("roles: [unclosed", "header.yaml").unwrap_err();
        assert!(err.to_string().contains("header.yaml"));
    }
}
