//! Backend-independent document rendering.
//!
//! The section walker drives a [`DocumentSink`]; pagination and drawing live
//! behind the sink so the walking logic stays independent of the concrete
//! document library and can be tested against a recording sink.

use crate::assemble::{ContentBlock, Section, Table};
use crate::errors::RenderError;

/// Facts shown on the cover page.
#[derive(Debug, Clone)]
pub struct CoverPage {
    /// Product-level heading.
    pub title: String,
    /// Configured report title.
    pub subtitle: String,
    pub facts: Vec<(String, String)>,
}

/// Minimal capability surface a document backend must provide.
pub trait DocumentSink {
    fn cover(&mut self, cover: &CoverPage) -> Result<(), RenderError>;
    fn start_section(&mut self, number: usize, title: &str) -> Result<(), RenderError>;
    fn write_subheading(&mut self, text: &str) -> Result<(), RenderError>;
    fn write_key_value(&mut self, key: &str, value: &str) -> Result<(), RenderError>;
    fn write_table(&mut self, table: &Table) -> Result<(), RenderError>;
    fn write_note(&mut self, text: &str) -> Result<(), RenderError>;
    fn page_break(&mut self) -> Result<(), RenderError>;
    fn save(self) -> Result<Vec<u8>, RenderError>
    where
        Self: Sized;
}

/// Walk the assembled sections into `sink` and return the document bytes.
pub fn render_document<S: DocumentSink>(
    mut sink: S,
    cover: &CoverPage,
    sections: &[Section],
) -> Result<Vec<u8>, RenderError> {
    sink.cover(cover)?;
    sink.page_break()?;
    for (i, section) in sections.iter().enumerate() {
        sink.start_section(i + 1, &section.title)?;
        for block in &section.blocks {
            match block {
                ContentBlock::KeyValues { title, pairs } => {
                    if let Some(title) = title {
                        sink.write_subheading(title)?;
                    }
                    for (key, value) in pairs {
                        sink.write_key_value(key, value)?;
                    }
                }
                ContentBlock::Table(table) => sink.write_table(table)?,
                ContentBlock::Note(text) => sink.write_note(text)?,
                ContentBlock::Bullets(items) => {
                    for item in items {
                        sink.write_note(&format!("- {item}"))?;
                    }
                }
            }
        }
    }
    sink.save()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::Cell;
    use crate::model::SectionId;

    /// Records sink calls so walking order can be asserted without a PDF
    /// backend.
    #[derive(Default)]
    struct RecordingSink {
        ops: Vec<String>,
    }

    impl DocumentSink for RecordingSink {
        fn cover(&mut self, cover: &CoverPage) -> Result<(), RenderError> {
            self.ops.push(format!("cover:{}", cover.subtitle));
            Ok(())
        }
        fn start_section(&mut self, number: usize, title: &str) -> Result<(), RenderError> {
            self.ops.push(format!("section:{number}:{title}"));
            Ok(())
        }
        fn write_subheading(&mut self, text: &str) -> Result<(), RenderError> {
            self.ops.push(format!("subheading:{text}"));
            Ok(())
        }
        fn write_key_value(&mut self, key: &str, value: &str) -> Result<(), RenderError> {
            self.ops.push(format!("kv:{key}={value}"));
            Ok(())
        }
        fn write_table(&mut self, table: &Table) -> Result<(), RenderError> {
            self.ops
                .push(format!("table:{}x{}", table.rows.len(), table.header.len()));
            Ok(())
        }
        fn write_note(&mut self, text: &str) -> Result<(), RenderError> {
            self.ops.push(format!("note:{text}"));
            Ok(())
        }
        fn page_break(&mut self) -> Result<(), RenderError> {
            self.ops.push("page_break".to_string());
            Ok(())
        }
        fn save(self) -> Result<Vec<u8>, RenderError> {
            Ok(self.ops.join("\n").into_bytes())
        }
    }

    #[test]
    fn walker_emits_cover_then_numbered_sections() {
        let cover = CoverPage {
            title: "Evaluation Report".to_string(),
            subtitle: "Q3 Review".to_string(),
            facts: vec![("Project".to_string(), "Atlas".to_string())],
        };
        let sections = vec![
            Section {
                id: SectionId::ExecutiveSummary,
                title: "Executive Summary".to_string(),
                blocks: vec![ContentBlock::KeyValues {
                    title: Some("exp-a".to_string()),
                    pairs: vec![("Verdict".to_string(), "PASS".to_string())],
                }],
            },
            Section {
                id: SectionId::Recommendations,
                title: "Recommendations".to_string(),
                blocks: vec![
                    ContentBlock::Table(Table {
                        title: None,
                        header: vec!["A".to_string()],
                        rows: vec![vec![Cell::plain("x")]],
                    }),
                    ContentBlock::Bullets(vec!["fix it".to_string()]),
                ],
            },
        ];

        let bytes = render_document(RecordingSink::default(), &cover, &sections).unwrap();
        let ops = String::from_utf8(bytes).unwrap();
        assert_eq!(
            ops.lines().collect::<Vec<_>>(),
            vec![
                "cover:Q3 Review",
                "page_break",
                "section:1:Executive Summary",
                "subheading:exp-a",
                "kv:Verdict=PASS",
                "section:2:Recommendations",
                "table:1x1",
                "note:- fix it",
            ]
        );
    }
}
