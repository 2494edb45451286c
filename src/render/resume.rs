use crate::domain::model::{ResumeEntry, TransformResult};
use crate::render::document::{Document, Paragraph, Table};
use crate::render::header::Header;
use crate::render::style::{Alignment, Formatting, Length};
use crate::utils::error::Result;

const DEFAULT_TITLE_FORMAT: &str = "defaultTitleFormat";
const TITLE_FORMAT: &str = "titleFormat";
const ROLES_FORMAT: &str = "rolesFormat";
const CONTACT_FORMAT: &str = "contactFormat";
const HEADER_FORMAT: &str = "headerFormat";
const BULLET_FORMAT: &str = "bulletFormat";
const SPACER_FORMAT: &str = "spacerFormat";

/// Every rule the layout looks up besides `defaultFormat`.
pub const REQUIRED_RULES: [&str; 7] = [
    DEFAULT_TITLE_FORMAT,
    TITLE_FORMAT,
    ROLES_FORMAT,
    CONTACT_FORMAT,
    HEADER_FORMAT,
    BULLET_FORMAT,
    SPACER_FORMAT,
];

const SKILL_COLUMNS: usize = 2;

/// Lays out the resume: header, skills, education, then experience, with a
/// spacer paragraph between sections.
pub struct ResumeLayout<'a> {
    header: &'a Header,
    formatting: &'a Formatting,
}

impl<'a> ResumeLayout<'a> {
    pub fn new(header: &'a Header, formatting: &'a Formatting) -> Self {
        Self { header, formatting }
    }

    pub fn build(&self, result: &TransformResult) -> Result<Document> {
        let mut document = Document::new(self.formatting.doc_margins);

        self.add_header(&mut document)?;
        self.add_spacer(&mut document)?;
        self.add_skills(&mut document, &result.skills)?;
        self.add_spacer(&mut document)?;
        self.add_education(&mut document)?;
        self.add_spacer(&mut document)?;
        self.add_experience(&mut document, &result.entries)?;

        tracing::debug!("Laid out {} document blocks", document.blocks.len());
        Ok(document)
    }

    fn paragraph(&self, runs: Vec<String>, formats: &[&str]) -> Result<Paragraph> {
        Ok(Paragraph::new(self.formatting.resolve(formats)?, runs))
    }

    fn add_header(&self, document: &mut Document) -> Result<()> {
        if let Some(name) = self.header.name.as_ref().filter(|name| !name.is_empty()) {
            document.add_paragraph(self.paragraph(vec![name.clone()], &[DEFAULT_TITLE_FORMAT, TITLE_FORMAT])?);
        }
        if let Some(roles) = self.header.roles_line() {
            document.add_paragraph(self.paragraph(vec![roles], &[DEFAULT_TITLE_FORMAT, ROLES_FORMAT])?);
        }
        if let Some(contact) = self.header.contact_line() {
            document.add_paragraph(self.paragraph(vec![contact], &[DEFAULT_TITLE_FORMAT, CONTACT_FORMAT])?);
        }
        Ok(())
    }

    fn add_spacer(&self, document: &mut Document) -> Result<()> {
        document.add_paragraph(self.paragraph(Vec::new(), &[SPACER_FORMAT])?);
        Ok(())
    }

    fn add_section_heading(&self, document: &mut Document, title: &str) -> Result<()> {
        document.add_paragraph(self.paragraph(vec![title.to_string()], &[DEFAULT_TITLE_FORMAT, HEADER_FORMAT])?);
        Ok(())
    }

    /// Skills fill a two-column table row by row; a trailing odd skill leaves
    /// an empty unstyled cell. The last row has no space after it.
    fn add_skills(&self, document: &mut Document, skills: &[String]) -> Result<()> {
        self.add_section_heading(document, "Skills")?;

        let row_count = skills.chunks(SKILL_COLUMNS).len();
        let mut rows = Vec::with_capacity(row_count);
        for (index, chunk) in skills.chunks(SKILL_COLUMNS).enumerate() {
            let mut cells = Vec::with_capacity(SKILL_COLUMNS);
            for column in 0..SKILL_COLUMNS {
                let cell = match chunk.get(column) {
                    Some(skill) => self.paragraph(vec![skill.clone()], &[BULLET_FORMAT])?,
                    None => self.paragraph(vec![String::new()], &[])?,
                };
                cells.push(if index + 1 == row_count { cell.space_after(Length(0.0)) } else { cell });
            }
            rows.push(cells);
        }

        // A table without rows is not valid WordprocessingML.
        if !rows.is_empty() {
            document.add_table(Table {
                columns: SKILL_COLUMNS,
                rows,
            });
        }
        Ok(())
    }

    fn add_education(&self, document: &mut Document) -> Result<()> {
        self.add_section_heading(document, "Education")?;
        for (_, degree) in &self.header.education {
            document.add_paragraph(self.paragraph(vec![degree.summary()], &[BULLET_FORMAT])?);
        }
        Ok(())
    }

    fn add_experience(&self, document: &mut Document, entries: &[ResumeEntry]) -> Result<()> {
        self.add_section_heading(document, "Professional Experience")?;

        for entry in entries {
            let title = self.paragraph(vec![entry.record.title.clone()], &[DEFAULT_TITLE_FORMAT])?;
            let tenure = self
                .paragraph(vec![entry.tenure.clone()], &[DEFAULT_TITLE_FORMAT])?
                .align(Alignment::Right);
            document.add_table(Table {
                columns: 2,
                rows: vec![vec![title, tenure]],
            });

            document.add_paragraph(self.paragraph(vec![entry.record.company.clone()], &[])?);
            for accolade in &entry.record.accolades {
                document.add_paragraph(self.paragraph(vec![accolade.clone()], &[BULLET_FORMAT])?);
            }
            self.add_spacer(document)?;
        }
        Ok(())
    }
}
