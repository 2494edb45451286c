use crate::render::style::{Alignment, Length, Margins, StyleRule};

/// A paragraph whose runs all share one resolved style rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub style: StyleRule,
    pub runs: Vec<String>,
}

impl Paragraph {
    pub fn new(style: StyleRule, runs: Vec<String>) -> Self {
        Self { style, runs }
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.style.para_align = Some(alignment);
        self
    }

    pub fn space_after(mut self, length: Length) -> Self {
        self.style.para_space_after = Some(length);
        self
    }

    pub fn text(&self) -> String {
        self.runs.concat()
    }
}

/// A borderless grid; every cell holds exactly one paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: usize,
    pub rows: Vec<Vec<Paragraph>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub margins: Margins,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(margins: Margins) -> Self {
        Self {
            margins,
            blocks: Vec::new(),
        }
    }

    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    pub fn add_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    /// Plain text of every paragraph in reading order, one per line. Table
    /// cells in a row are joined with a tab.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph(paragraph) => lines.push(paragraph.text()),
                Block::Table(table) => {
                    for row in &table.rows {
                        let cells: Vec<String> = row.iter().map(Paragraph::text).collect();
                        lines.push(cells.join("\t"));
                    }
                }
            }
        }
        lines.join("\n")
    }
}
