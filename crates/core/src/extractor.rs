use crate::error::PrepError;
use crate::models::{PipelineOptions, RawPair};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub trait RecordExtractor {
    fn extract_pairs(&self, path: &Path) -> Result<Vec<RawPair>, PrepError>;
}

/// Finds record elements at any depth and reads their question/answer children.
///
/// A field's text is the leading text of the first direct child with the
/// matching name: text and CDATA up to that child's first sub-element, with
/// XML entities decoded. Records missing either field, or with a blank one,
/// are dropped.
#[derive(Debug, Clone)]
pub struct XmlRecordExtractor {
    record_tag: String,
    question_tag: String,
    answer_tag: String,
}

impl Default for XmlRecordExtractor {
    fn default() -> Self {
        Self::from_options(&PipelineOptions::default())
    }
}

impl XmlRecordExtractor {
    pub fn new(
        record_tag: impl Into<String>,
        question_tag: impl Into<String>,
        answer_tag: impl Into<String>,
    ) -> Self {
        Self {
            record_tag: record_tag.into(),
            question_tag: question_tag.into(),
            answer_tag: answer_tag.into(),
        }
    }

    pub fn from_options(options: &PipelineOptions) -> Self {
        Self::new(
            options.record_tag.as_str(),
            options.question_tag.as_str(),
            options.answer_tag.as_str(),
        )
    }

    pub fn parse_pairs(&self, source: &[u8], path: &Path) -> Result<Vec<RawPair>, PrepError> {
        let source = source.strip_prefix(UTF8_BOM).unwrap_or(source);
        let mut reader = Reader::from_reader(source);
        reader.config_mut().check_end_names = true;

        let mut walk = DocumentWalk::new(self);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(element)) => {
                    walk.enter_element(path)?;
                    walk.open(element.name().as_ref());
                }
                Ok(Event::Empty(element)) => {
                    walk.enter_element(path)?;
                    walk.open(element.name().as_ref());
                    walk.close(path)?;
                }
                Ok(Event::End(_)) => walk.close(path)?,
                Ok(Event::Text(text)) => {
                    if walk.depth == 0 {
                        if !text.iter().all(u8::is_ascii_whitespace) {
                            return Err(PrepError::xml(path, "text outside of the root element"));
                        }
                    } else {
                        let decoded =
                            text.unescape().map_err(|error| PrepError::xml(path, error))?;
                        walk.push_text(&decoded);
                    }
                }
                Ok(Event::CData(data)) => {
                    let decoded = std::str::from_utf8(&data)
                        .map_err(|error| PrepError::xml(path, error))?;
                    walk.push_text(decoded);
                }
                Ok(Event::Eof) => break,
                Err(error) => {
                    return Err(PrepError::xml(
                        path,
                        format!("{error} (at byte {})", reader.error_position()),
                    ));
                }
                _ => {}
            }
            buf.clear();
        }

        walk.finish(path)
    }
}

impl RecordExtractor for XmlRecordExtractor {
    fn extract_pairs(&self, path: &Path) -> Result<Vec<RawPair>, PrepError> {
        let bytes = std::fs::read(path)?;
        self.parse_pairs(&bytes, path)
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Question,
    Answer,
}

struct OpenRecord {
    depth: usize,
    slot: usize,
    question: Option<String>,
    answer: Option<String>,
}

struct FieldCapture {
    field: Field,
    record: usize,
    depth: usize,
    text: String,
    // Set once the field element opens a child; later text is not part of the field.
    sealed: bool,
}

struct DocumentWalk<'a> {
    tags: &'a XmlRecordExtractor,
    depth: usize,
    roots: usize,
    open_records: Vec<OpenRecord>,
    capture: Option<FieldCapture>,
    // One slot per record start tag keeps output in document order even
    // when a record closes after a nested one.
    slots: Vec<Option<RawPair>>,
}

impl<'a> DocumentWalk<'a> {
    fn new(tags: &'a XmlRecordExtractor) -> Self {
        Self {
            tags,
            depth: 0,
            roots: 0,
            open_records: Vec::new(),
            capture: None,
            slots: Vec::new(),
        }
    }

    fn enter_element(&mut self, path: &Path) -> Result<(), PrepError> {
        if self.depth == 0 {
            self.roots += 1;
            if self.roots > 1 {
                return Err(PrepError::xml(path, "more than one root element"));
            }
        }
        self.depth += 1;
        Ok(())
    }

    fn open(&mut self, name: &[u8]) {
        if let Some(capture) = self.capture.as_mut() {
            capture.sealed = true;
        }

        if name == self.tags.record_tag.as_bytes() {
            self.open_records.push(OpenRecord {
                depth: self.depth,
                slot: self.slots.len(),
                question: None,
                answer: None,
            });
            self.slots.push(None);
            return;
        }

        if self.capture.is_some() {
            return;
        }

        let Some(index) = self.open_records.len().checked_sub(1) else {
            return;
        };
        let record = &self.open_records[index];
        if record.depth + 1 != self.depth {
            return;
        }

        let field = if name == self.tags.question_tag.as_bytes() && record.question.is_none() {
            Field::Question
        } else if name == self.tags.answer_tag.as_bytes() && record.answer.is_none() {
            Field::Answer
        } else {
            return;
        };

        self.capture = Some(FieldCapture {
            field,
            record: index,
            depth: self.depth,
            text: String::new(),
            sealed: false,
        });
    }

    fn push_text(&mut self, text: &str) {
        if let Some(capture) = self.capture.as_mut() {
            if !capture.sealed && capture.depth == self.depth {
                capture.text.push_str(text);
            }
        }
    }

    fn close(&mut self, path: &Path) -> Result<(), PrepError> {
        if self.depth == 0 {
            return Err(PrepError::xml(path, "closing tag without a matching opening tag"));
        }

        if self.capture.as_ref().is_some_and(|capture| capture.depth == self.depth) {
            if let Some(capture) = self.capture.take() {
                if let Some(record) = self.open_records.get_mut(capture.record) {
                    match capture.field {
                        Field::Question => record.question = Some(capture.text),
                        Field::Answer => record.answer = Some(capture.text),
                    }
                }
            }
        }

        if self
            .open_records
            .last()
            .is_some_and(|record| record.depth == self.depth)
        {
            if let Some(record) = self.open_records.pop() {
                let slot = record.slot;
                self.slots[slot] = complete_pair(record);
            }
        }

        self.depth -= 1;
        Ok(())
    }

    fn finish(self, path: &Path) -> Result<Vec<RawPair>, PrepError> {
        if self.roots == 0 {
            return Err(PrepError::xml(path, "document has no root element"));
        }
        if self.depth != 0 {
            return Err(PrepError::xml(path, "document ended with unclosed elements"));
        }

        Ok(self.slots.into_iter().flatten().collect())
    }
}

fn complete_pair(record: OpenRecord) -> Option<RawPair> {
    let question = record.question?.trim().to_string();
    let answer = record.answer?.trim().to_string();

    if question.is_empty() || answer.is_empty() {
        return None;
    }

    Some(RawPair { question, answer })
}
