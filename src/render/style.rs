//! Typed style rules loaded from `formatting.yaml`.
//!
//! Values keep the spellings older formatting files use (`Pt(11)`,
//! `RGBColor(0x1F, 0x3A, 0x5F)`, `WD_ALIGN_PARAGRAPH.CENTER`), but they are
//! matched against a fixed grammar and turned into the enums below. Anything
//! else is rejected when the file is loaded.

use crate::utils::error::{CvError, Result};
use crate::utils::validation::{validate_range, Validate};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

pub const DEFAULT_FORMAT: &str = "defaultFormat";

const MM_PER_INCH: f32 = 25.4;
const PT_PER_INCH: f32 = 72.0;
const MAX_MARGIN_MM: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Value of the `w:jc` attribute.
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}

impl TryFrom<String> for Alignment {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let name = value.trim();
        let name = name.strip_prefix("WD_ALIGN_PARAGRAPH.").unwrap_or(name);
        match name.to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" | "centre" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            "justify" | "both" => Ok(Alignment::Justify),
            _ => Err(format!("unknown alignment '{}'", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ParagraphStyle {
    Normal,
    ListBullet,
}

impl ParagraphStyle {
    /// Style id declared in `word/styles.xml`.
    pub fn style_id(&self) -> &'static str {
        match self {
            ParagraphStyle::Normal => "Normal",
            ParagraphStyle::ListBullet => "ListBullet",
        }
    }
}

impl TryFrom<String> for ParagraphStyle {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.trim() {
            "Normal" => Ok(ParagraphStyle::Normal),
            "List Bullet" | "ListBullet" => Ok(ParagraphStyle::ListBullet),
            other => Err(format!("unsupported paragraph style '{}'", other)),
        }
    }
}

/// A length in points.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "LengthValue")]
pub struct Length(pub f32);

#[derive(Deserialize)]
#[serde(untagged)]
enum LengthValue {
    Points(f32),
    Text(String),
}

fn length_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?i)(?:(pt|mm|inches)\(\s*([0-9]*\.?[0-9]+)\s*\)|([0-9]*\.?[0-9]+)\s*(pt|mm|in)?)$")
            .expect("length pattern is valid")
    })
}

impl Length {
    /// Twentieths of a point, the unit of `w:spacing`.
    pub fn twips(&self) -> i64 {
        (self.0 * 20.0).round() as i64
    }

    /// Half-points, the unit of `w:sz`.
    pub fn half_points(&self) -> i64 {
        (self.0 * 2.0).round() as i64
    }

    pub fn from_mm(mm: f32) -> Self {
        Length(mm / MM_PER_INCH * PT_PER_INCH)
    }

    fn from_unit(amount: f32, unit: &str) -> Self {
        match unit.to_ascii_lowercase().as_str() {
            "mm" => Length::from_mm(amount),
            "in" | "inches" => Length(amount * PT_PER_INCH),
            _ => Length(amount),
        }
    }
}

impl TryFrom<LengthValue> for Length {
    type Error = String;

    fn try_from(value: LengthValue) -> std::result::Result<Self, Self::Error> {
        let text = match value {
            LengthValue::Points(points) => return Ok(Length(points)),
            LengthValue::Text(text) => text,
        };

        let caps = length_pattern()
            .captures(text.trim())
            .ok_or_else(|| format!("unrecognised length '{}'", text))?;

        let (amount, unit) = match (caps.get(1), caps.get(2), caps.get(3), caps.get(4)) {
            (Some(unit), Some(amount), _, _) => (amount.as_str(), unit.as_str()),
            (_, _, Some(amount), unit) => (amount.as_str(), unit.map_or("pt", |u| u.as_str())),
            _ => return Err(format!("unrecognised length '{}'", text)),
        };

        let amount: f32 = amount
            .parse()
            .map_err(|_| format!("unrecognised length '{}'", text))?;
        Ok(Length::from_unit(amount, unit))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

fn rgb_call_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^RGBColor\(\s*(\w+)\s*,\s*(\w+)\s*,\s*(\w+)\s*\)$").expect("rgb pattern is valid")
    })
}

fn parse_channel(value: &str) -> Option<u8> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

impl TryFrom<String> for RgbColor {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let text = value.trim();
        let invalid = || format!("unrecognised colour '{}'", value);

        if let Some(caps) = rgb_call_pattern().captures(text) {
            let r = parse_channel(&caps[1]).ok_or_else(invalid)?;
            let g = parse_channel(&caps[2]).ok_or_else(invalid)?;
            let b = parse_channel(&caps[3]).ok_or_else(invalid)?;
            return Ok(RgbColor(r, g, b));
        }

        let hex = text.strip_prefix('#').unwrap_or(text);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(RgbColor(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// One named rule from `formatting.yaml`. Every field is optional so rules
/// can be layered over `defaultFormat`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleRule {
    pub para_style: Option<ParagraphStyle>,
    pub para_space_after: Option<Length>,
    pub para_line_spacing: Option<f32>,
    pub para_align: Option<Alignment>,
    #[serde(rename = "font-name")]
    pub font_name: Option<String>,
    #[serde(rename = "font-size")]
    pub font_size: Option<Length>,
    #[serde(rename = "font-colour")]
    pub font_colour: Option<RgbColor>,
    #[serde(rename = "font-bold")]
    pub font_bold: Option<bool>,
}

impl StyleRule {
    /// `self` with every field `over` sets replaced.
    pub fn merged(&self, over: &StyleRule) -> StyleRule {
        StyleRule {
            para_style: over.para_style.or(self.para_style),
            para_space_after: over.para_space_after.or(self.para_space_after),
            para_line_spacing: over.para_line_spacing.or(self.para_line_spacing),
            para_align: over.para_align.or(self.para_align),
            font_name: over.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: over.font_size.or(self.font_size),
            font_colour: over.font_colour.or(self.font_colour),
            font_bold: over.font_bold.or(self.font_bold),
        }
    }
}

/// Page margins in millimetres, listed top, right, bottom, left.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f32; 4]")]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl From<[f32; 4]> for Margins {
    fn from([top, right, bottom, left]: [f32; 4]) -> Self {
        Margins { top, right, bottom, left }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Formatting {
    #[serde(rename = "docMargins")]
    pub doc_margins: Margins,
    #[serde(flatten)]
    pub rules: HashMap<String, StyleRule>,
}

impl Formatting {
    pub fn from_yaml_str(content: &str, source_name: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| CvError::YamlError {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
    }

    pub fn rule(&self, name: &str) -> Result<&StyleRule> {
        self.rules
            .get(name)
            .ok_or_else(|| CvError::ConfigValidationError {
                field: name.to_string(),
                message: "style rule is not defined in formatting file".to_string(),
            })
    }

    /// `defaultFormat` with each named rule layered on top, left to right.
    pub fn resolve(&self, names: &[&str]) -> Result<StyleRule> {
        let mut rule = self.rule(DEFAULT_FORMAT)?.clone();
        for name in names {
            rule = rule.merged(self.rule(name)?);
        }
        Ok(rule)
    }
}

impl Validate for Formatting {
    fn validate(&self) -> Result<()> {
        let Margins { top, right, bottom, left } = self.doc_margins;
        for margin in [top, right, bottom, left] {
            validate_range("docMargins", margin, 0.0, MAX_MARGIN_MM)?;
        }
        self.rule(DEFAULT_FORMAT)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FORMATTING: &str = r#"
docMargins: [12.7, 12.7, 12.7, 12.7]
defaultFormat:
  para_space_after: Pt(0)
  para_line_spacing: 1
  para_align: WD_ALIGN_PARAGRAPH.LEFT
  font-name: Calibri
  font-size: Pt(10)
headerFormat:
  para_space_after: Pt(6)
  font-size: Pt(14)
  font-colour: RGBColor(0x1F, 0x3A, 0x5F)
  font-bold: true
bulletFormat:
  para_style: List Bullet
"#;

    #[test]
    fn test_load_formatting() {
        let formatting = Formatting::from_yaml_str(FORMATTING, "formatting.yaml").unwrap();
        assert_eq!(formatting.doc_margins.top, 12.7);
        assert_eq!(formatting.rules.len(), 3);
        assert!(formatting.validate().is_ok());
    }

    #[test]
    fn test_resolve_layers_rules_over_default() {
        let formatting = Formatting::from_yaml_str(FORMATTING, "formatting.yaml").unwrap();
        let rule = formatting.resolve(&["headerFormat"]).unwrap();

        assert_eq!(rule.font_name.as_deref(), Some("Calibri"));
        assert_eq!(rule.font_size, Some(Length(14.0)));
        assert_eq!(rule.para_space_after, Some(Length(6.0)));
        assert_eq!(rule.para_align, Some(Alignment::Left));
        assert_eq!(rule.font_colour, Some(RgbColor(0x1F, 0x3A, 0x5F)));
        assert_eq!(rule.font_bold, Some(true));
        assert_eq!(rule.para_style, None);

        let bullet = formatting.resolve(&["bulletFormat"]).unwrap();
        assert_eq!(bullet.para_style, Some(ParagraphStyle::ListBullet));
        assert_eq!(bullet.font_size, Some(Length(10.0)));
    }

    #[test]
    fn test_unknown_rule_is_config_error() {
        let formatting = Formatting::from_yaml_str(FORMATTING, "formatting.yaml").unwrap();
        assert!(matches!(
            formatting.resolve(&["missingFormat"]),
            Err(CvError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_rejects_evaluated_expressions() {
        let yaml = "docMargins: [1, 1, 1, 1]\ndefaultFormat:\n  font-size: __import__('os')\n";
        assert!(matches!(
            Formatting::from_yaml_str(yaml, "formatting.yaml"),
            Err(CvError::YamlError { .. })
        ));
    }

    #[test]
    fn test_margins_out_of_range() {
        let yaml = "docMargins: [1, 1, 250, 1]\ndefaultFormat: {}\n";
        let formatting = Formatting::from_yaml_str(yaml, "formatting.yaml").unwrap();
        assert!(formatting.validate().is_err());
    }

    #[test]
    fn test_length_spellings() {
        let parse = |s: &str| Length::try_from(LengthValue::Text(s.to_string()));
        assert_eq!(parse("Pt(11)"), Ok(Length(11.0)));
        assert_eq!(parse("11pt"), Ok(Length(11.0)));
        assert_eq!(parse("Inches(0.5)"), Ok(Length(36.0)));
        assert_eq!(parse("Mm(25.4)"), Ok(Length(72.0)));
        assert!(parse("Pt(eleven)").is_err());
        assert_eq!(Length(5.5).twips(), 110);
        assert_eq!(Length(10.5).half_points(), 21);
    }

    #[test]
    fn test_colour_and_alignment_spellings() {
        assert_eq!(RgbColor::try_from("#00ff7F".to_string()), Ok(RgbColor(0, 255, 127)));
        assert_eq!(RgbColor::try_from("RGBColor(0, 128, 0xFF)".to_string()), Ok(RgbColor(0, 128, 255)));
        assert!(RgbColor::try_from("red".to_string()).is_err());
        assert_eq!(RgbColor(0x1F, 0x3A, 0x5F).hex(), "1F3A5F");

        assert_eq!(Alignment::try_from("WD_ALIGN_PARAGRAPH.RIGHT".to_string()), Ok(Alignment::Right));
        assert_eq!(Alignment::try_from("centre".to_string()), Ok(Alignment::Center));
        assert!(Alignment::try_from("WD_ALIGN_PARAGRAPH.DISTRIBUTE".to_string()).is_err());
    }
}
