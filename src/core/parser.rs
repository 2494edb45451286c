//! Parser for the experience log: a notes file with one `### ` heading per
//! job plus a `Skills` section, and `%%` comments anywhere.
//!
//! ```text
//! # Experience          <- front-matter, ignored
//! ### Skills
//! - Rust
//! - Distributed systems
//! ### Acme Corp
//! startDate: March 2020
//! endDate:               <- empty means "present"
//! title: Staff Engineer
//! - Led the storage rewrite %% numbers? %%
//! ```

use crate::domain::model::{ExperienceLog, ExperienceRecord, SkillList};
use crate::core::tenure::parse_month_year;
use crate::utils::error::{CvError, Result};
use chrono::NaiveDate;

const COMMENT_MARKER: &str = "%%";
const HEADING_MARKER: &str = "### ";
const SKILLS_HEADING: &str = "Skills";

const START_DATE_KEY: &str = "startDate";
const END_DATE_KEY: &str = "endDate";
const TITLE_KEY: &str = "title";

/// A heading-delimited section of the log. `index` is 1-based in document
/// order and only used for error context.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Block<'a> {
    index: usize,
    heading: &'a str,
    body: Vec<&'a str>,
}

/// Parses the whole experience log into skills and job records.
pub fn parse_experience_log(raw_text: &str) -> Result<ExperienceLog> {
    let text = strip_comments(raw_text)?;
    let mut log = ExperienceLog::default();

    for block in split_blocks(&text) {
        if block.heading.contains(SKILLS_HEADING) {
            let skills = parse_skills(&block);
            tracing::debug!("Block {} ('{}'): {} skills", block.index, block.heading, skills.len());
            log.skills.extend(skills);
        } else {
            let record = parse_job(&block)?;
            tracing::debug!(
                "Block {}: {} / {} with {} accolades",
                block.index,
                record.company,
                record.title,
                record.accolades.len()
            );
            log.experiences.push(record);
        }
    }

    if log.skills.is_empty() {
        tracing::warn!("No '{}' section found in experience log", SKILLS_HEADING);
    }

    Ok(log)
}

/// Removes every `%% ... %%` region, including ones spanning lines.
fn strip_comments(raw_text: &str) -> Result<String> {
    let parts: Vec<&str> = raw_text.split(COMMENT_MARKER).collect();

    // n markers give n + 1 parts; an odd marker count leaves a comment open.
    if parts.len() % 2 == 0 {
        let opened_at = raw_text.rfind(COMMENT_MARKER).unwrap_or(0);
        let line = raw_text[..opened_at].matches('\n').count() + 1;
        return Err(CvError::UnterminatedComment { line });
    }

    Ok(parts.iter().step_by(2).copied().collect())
}

fn split_blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks: Vec<Block<'_>> = Vec::new();

    for line in text.lines() {
        if let Some(heading) = line.strip_prefix(HEADING_MARKER) {
            blocks.push(Block {
                index: blocks.len() + 1,
                heading,
                body: Vec::new(),
            });
        } else if let Some(current) = blocks.last_mut() {
            current.body.push(line);
        }
    }

    blocks
}

/// A bullet has a hyphen somewhere in its first three characters, which
/// accepts `- item`, `-item` and ` - item` alike.
fn is_bullet(line: &str) -> bool {
    line.chars().take(3).any(|c| c == '-')
}

fn bullet_text(line: &str) -> &str {
    line.trim_matches(|c: char| c == '-' || c.is_whitespace())
}

fn parse_skills(block: &Block<'_>) -> SkillList {
    block
        .body
        .iter()
        .map(|line| line.trim_start())
        .filter(|line| is_bullet(line))
        .map(|line| bullet_text(line).to_string())
        .collect()
}

fn parse_job(block: &Block<'_>) -> Result<ExperienceRecord> {
    let mut lines = std::iter::once(block.heading)
        .chain(block.body.iter().copied())
        .map(str::trim)
        .filter(|line| !line.is_empty());

    let company = lines.next().ok_or_else(|| missing_field(block, "company"))?;
    let details: Vec<&str> = lines.collect();

    let mut used = Vec::with_capacity(3);
    let start_date = date_field(block, &details, START_DATE_KEY, &mut used)?;
    let end_date = date_field(block, &details, END_DATE_KEY, &mut used)?;
    let (title_line, title) = field_value(&details, TITLE_KEY).ok_or_else(|| missing_field(block, TITLE_KEY))?;
    used.push(title_line);

    let accolades = details
        .iter()
        .enumerate()
        .filter(|(index, line)| is_bullet(line) && !used.contains(index))
        .map(|(_, line)| bullet_text(line))
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .collect();

    Ok(ExperienceRecord {
        company: company.to_string(),
        title: title.to_string(),
        start_date,
        end_date,
        accolades,
    })
}

/// Index and value of the line holding `key`. Plain `key: value` lines win
/// over bullets, so an accolade mentioning "title" cannot shadow the real
/// field; a bulleted `- key: value` is only used when no plain line exists.
fn field_value<'a>(details: &[&'a str], key: &str) -> Option<(usize, &'a str)> {
    let holds_key = |line: &&str| line.contains(key) && line.contains(':');
    let plain = details
        .iter()
        .position(|line| !is_bullet(line) && holds_key(line));
    let index = plain.or_else(|| details.iter().position(holds_key))?;

    let (_, value) = details[index].split_once(':')?;
    // Obsidian inline fields are written `key:: value`; the second colon is
    // syntax, not part of the value.
    Some((index, value.trim_start_matches(':').trim()))
}

fn date_field(block: &Block<'_>, details: &[&str], key: &str, used: &mut Vec<usize>) -> Result<Option<NaiveDate>> {
    let (index, value) = field_value(details, key).ok_or_else(|| missing_field(block, key))?;
    used.push(index);
    if value.is_empty() {
        return Ok(None);
    }

    parse_month_year(value)
        .map(Some)
        .ok_or_else(|| CvError::InvalidDateFormat {
            block: block.index,
            heading: block.heading.trim().to_string(),
            field: key.to_string(),
            value: value.to_string(),
        })
}

fn missing_field(block: &Block<'_>, field: &str) -> CvError {
    CvError::MissingField {
        block: block.index,
        heading: block.heading.trim().to_string(),
        field: field.to_string(),
    }
}
