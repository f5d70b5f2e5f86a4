//! Format-specific text extractors

use calamine::Reader;
use std::io::Read;

use crate::error::{Error, Result};
use crate::types::LoaderKind;

/// Extracts plain text from one document format.
///
/// Implementations must fail with an extraction error on malformed input
/// instead of returning partial or garbage text.
pub trait TextExtractor: Send + Sync {
    /// Extract the text content of `data`
    fn extract(&self, filename: &str, data: &[u8]) -> Result<String>;
}

/// Extractor instance for a loader capability (1:1)
pub fn extractor_for(kind: LoaderKind) -> &'static dyn TextExtractor {
    match kind {
        LoaderKind::PdfText => &PdfTextExtractor,
        LoaderKind::DocxText => &DocxTextExtractor,
        LoaderKind::Presentation => &PresentationExtractor,
        LoaderKind::Spreadsheet => &SpreadsheetExtractor,
        LoaderKind::PlainText => &PlainTextExtractor,
        LoaderKind::DelimitedTable => &DelimitedTableExtractor,
        LoaderKind::EmailMessage => &EmailMessageExtractor,
    }
}

/// PDF text extractor (pdf-extract with a lopdf fallback)
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Result<String> {
        let content = match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("pdf-extract failed for '{}': {}, trying fallback", filename, e);
                extract_pdf_fallback(filename, data)?
            }
        };

        let content = normalize_pdf_text(&content);
        if content.trim().is_empty() {
            return Err(Error::extraction(
                filename,
                "no extractable text; PDF may be image-based or encrypted",
            ));
        }

        Ok(content)
    }
}

/// Fallback PDF text extraction walking content streams with lopdf
fn extract_pdf_fallback(filename: &str, data: &[u8]) -> Result<String> {
    let doc = lopdf::Document::load_mem(data)
        .map_err(|e| Error::extraction(filename, format!("failed to load PDF: {}", e)))?;

    let mut all_text = String::new();
    for (page_num, page_id) in doc.get_pages() {
        match doc.get_page_content(page_id) {
            Ok(content) => {
                let text = text_from_content_stream(&content);
                if !text.is_empty() {
                    all_text.push_str(&format!("\n--- Page {} ---\n", page_num));
                    all_text.push_str(&text);
                }
            }
            Err(e) => {
                tracing::debug!("no content for page {}: {}", page_num, e);
            }
        }
    }

    if all_text.trim().is_empty() {
        return Err(Error::extraction(
            filename,
            "no extractable text; PDF may be image-based or encrypted",
        ));
    }

    Ok(all_text)
}

/// Pull text show operators (Tj/TJ) out of a PDF content stream
fn text_from_content_stream(content: &[u8]) -> String {
    let content_str = String::from_utf8_lossy(content);
    let mut text = String::new();
    let mut in_text_block = false;

    for line in content_str.lines() {
        let line = line.trim();
        match line {
            "BT" => in_text_block = true,
            "ET" => {
                in_text_block = false;
                text.push(' ');
            }
            _ if in_text_block && (line.ends_with("Tj") || line.ends_with("TJ")) => {
                if let (Some(start), Some(end)) = (line.find('('), line.rfind(')')) {
                    if start < end {
                        let decoded = line[start + 1..end]
                            .replace("\\n", "\n")
                            .replace("\\r", "\r")
                            .replace("\\t", "\t")
                            .replace("\\(", "(")
                            .replace("\\)", ")")
                            .replace("\\\\", "\\");
                        text.push_str(&decoded);
                    }
                }
            }
            _ => {}
        }
    }

    text
}

/// Normalize typographic artifacts common in extracted PDF text
fn normalize_pdf_text(text: &str) -> String {
    let text = text
        .replace('\0', "")
        .replace('\u{2010}', "-")
        .replace('\u{2011}', "-")
        .replace('\u{2013}', "-")
        .replace('\u{2018}', "'")
        .replace('\u{2019}', "'")
        .replace('\u{201C}', "\"")
        .replace('\u{201D}', "\"")
        .replace('\u{2022}', "* ")
        .replace('\u{2026}', "...")
        .replace('\u{00A0}', " ")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB00}', "ff");

    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// DOCX text extractor (docx-rs)
pub struct DocxTextExtractor;

impl TextExtractor for DocxTextExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Result<String> {
        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::extraction(filename, e.to_string()))?;

        let mut content = String::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                content.push_str(&t.text);
                            }
                        }
                    }
                }
                content.push('\n');
            }
            // tables and section breaks carry no body text we use
        }

        Ok(content)
    }
}

/// PowerPoint extractor (.pptx via zip + slide XML)
pub struct PresentationExtractor;

impl TextExtractor for PresentationExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Result<String> {
        let cursor = std::io::Cursor::new(data);
        let mut archive = zip::ZipArchive::new(cursor)
            .map_err(|e| Error::extraction(filename, e.to_string()))?;

        // ppt/slides/slide1.xml, slide2.xml, ... sorted by slide number
        let mut slide_names: Vec<String> = archive
            .file_names()
            .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
            .map(|s| s.to_string())
            .collect();
        slide_names.sort_by_key(|name| {
            name.trim_start_matches("ppt/slides/slide")
                .trim_end_matches(".xml")
                .parse::<u32>()
                .unwrap_or(0)
        });

        let mut content = String::new();
        for (slide_number, slide_name) in slide_names.iter().enumerate() {
            if let Ok(mut file) = archive.by_name(slide_name) {
                let mut xml_content = String::new();
                if file.read_to_string(&mut xml_content).is_ok() {
                    let slide_text = text_from_slide_xml(&xml_content);
                    if !slide_text.is_empty() {
                        content.push_str(&format!("Slide {}:\n{}\n\n", slide_number + 1, slide_text));
                    }
                }
            }
        }

        if content.trim().is_empty() {
            return Err(Error::extraction(
                filename,
                "no slide text found in presentation",
            ));
        }

        Ok(content)
    }
}

/// Collect `<a:t>` text runs from a slide's XML
fn text_from_slide_xml(xml: &str) -> String {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut text_parts = Vec::new();
    let mut in_text_element = false;
    let mut current_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_element = true;
                    current_text.clear();
                }
            }
            Ok(Event::Text(e)) => {
                if in_text_element {
                    if let Ok(text) = e.unescape() {
                        current_text.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                if name.as_ref() == b"t" && in_text_element {
                    if !current_text.trim().is_empty() {
                        text_parts.push(current_text.trim().to_string());
                    }
                    in_text_element = false;
                }
                if name.as_ref() == b"p" && !text_parts.is_empty() {
                    text_parts.push("\n".to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    text_parts
        .join(" ")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Excel extractor (calamine)
pub struct SpreadsheetExtractor;

impl TextExtractor for SpreadsheetExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Result<String> {
        let cursor = std::io::Cursor::new(data);
        let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
            .map_err(|e| Error::extraction(filename, e.to_string()))?;

        let mut content = String::new();
        for sheet_name in workbook.sheet_names().to_vec() {
            if let Ok(range) = workbook.worksheet_range(&sheet_name) {
                let mut sheet_content = format!("Sheet: {}\n", sheet_name);

                for row in range.rows() {
                    let row_text: Vec<String> = row
                        .iter()
                        .map(|cell| match cell {
                            calamine::Data::Empty => String::new(),
                            calamine::Data::String(s) => s.clone(),
                            calamine::Data::Float(f) => f.to_string(),
                            calamine::Data::Int(i) => i.to_string(),
                            calamine::Data::Bool(b) => b.to_string(),
                            calamine::Data::DateTime(dt) => dt.to_string(),
                            _ => String::new(),
                        })
                        .collect();

                    if !row_text.iter().all(String::is_empty) {
                        sheet_content.push_str(&row_text.join(" | "));
                        sheet_content.push('\n');
                    }
                }

                content.push_str(&sheet_content);
                content.push('\n');
            }
        }

        Ok(content)
    }
}

/// Plain-text reader
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, _filename: &str, data: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(data).to_string())
    }
}

/// Delimited-table reader (csv)
pub struct DelimitedTableExtractor;

impl TextExtractor for DelimitedTableExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Result<String> {
        let mut reader = csv::Reader::from_reader(data);
        let mut content = String::new();

        let headers = reader
            .headers()
            .map_err(|e| Error::extraction(filename, e.to_string()))?;
        content.push_str(&headers.iter().collect::<Vec<_>>().join(" | "));
        content.push('\n');

        for result in reader.records() {
            let record = result.map_err(|e| Error::extraction(filename, e.to_string()))?;
            content.push_str(&record.iter().collect::<Vec<_>>().join(" | "));
            content.push('\n');
        }

        Ok(content)
    }
}

/// Email-message extractor (mail-parser)
pub struct EmailMessageExtractor;

impl TextExtractor for EmailMessageExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Result<String> {
        let message = mail_parser::MessageParser::default()
            .parse(data)
            .ok_or_else(|| Error::extraction(filename, "failed to parse RFC 822 message"))?;

        let mut content = String::new();
        if let Some(subject) = message.subject() {
            content.push_str(&format!("Subject: {}\n", subject));
        }
        if let Some(addr) = message.from().and_then(|a| a.first()) {
            let name = addr.name.as_deref().unwrap_or_default();
            let address = addr.address.as_deref().unwrap_or_default();
            if name.is_empty() {
                content.push_str(&format!("From: {}\n", address));
            } else {
                content.push_str(&format!("From: {} <{}>\n", name, address));
            }
        }

        let body = message
            .body_text(0)
            .ok_or_else(|| Error::extraction(filename, "message has no text body"))?;
        content.push('\n');
        content.push_str(&body);

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_decodes_lossily() {
        let text = PlainTextExtractor.extract("note.txt", b"Hello world.").unwrap();
        assert_eq!(text, "Hello world.");

        let text = PlainTextExtractor
            .extract("note.txt", &[0x48, 0x69, 0xFF])
            .unwrap();
        assert!(text.starts_with("Hi"));
    }

    #[test]
    fn csv_renders_header_and_rows() {
        let text = DelimitedTableExtractor
            .extract("table.csv", b"a,b\n1,2\n")
            .unwrap();
        assert_eq!(text, "a | b\n1 | 2\n");
    }

    #[test]
    fn malformed_csv_is_an_extraction_error() {
        // unclosed quote makes the record unreadable
        let err = DelimitedTableExtractor
            .extract("table.csv", b"a,b\n\"1,2\n3,4\n")
            .unwrap_err();
        assert_eq!(err.stage(), "extraction");
    }

    #[test]
    fn eml_assembles_headers_and_body() {
        let raw = b"From: Jane Doe <jane@example.com>\r\n\
                    To: team@example.com\r\n\
                    Subject: Quarterly update\r\n\
                    \r\n\
                    Numbers are up.\r\n";

        let text = EmailMessageExtractor.extract("mail.eml", raw).unwrap();
        assert!(text.contains("Subject: Quarterly update"));
        assert!(text.contains("From: Jane Doe <jane@example.com>"));
        assert!(text.contains("Numbers are up."));
    }

    #[test]
    fn garbage_pdf_is_an_extraction_error() {
        let err = PdfTextExtractor
            .extract("broken.pdf", b"this is not a pdf")
            .unwrap_err();
        assert_eq!(err.stage(), "extraction");
    }

    #[test]
    fn garbage_pptx_is_an_extraction_error() {
        let err = PresentationExtractor
            .extract("deck.pptx", b"this is not a zip archive")
            .unwrap_err();
        assert_eq!(err.stage(), "extraction");
    }

    #[test]
    fn slide_xml_text_runs_are_collected() {
        let xml = r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
            <a:p><a:r><a:t>Title slide</a:t></a:r></a:p>
            <a:p><a:r><a:t>Bullet one</a:t></a:r></a:p>
        </p:sld>"#;

        let text = text_from_slide_xml(xml);
        assert!(text.contains("Title slide"));
        assert!(text.contains("Bullet one"));
    }

    #[test]
    fn pdf_normalization_strips_artifacts() {
        let raw = "Line one\u{2019}s text\u{2026}\n\n  \nLine \u{FB01}nal";
        assert_eq!(normalize_pdf_text(raw), "Line one's text...\nLine final");
    }
}
