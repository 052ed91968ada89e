use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

use crate::error::ExtractError;

const SLIDE_PREFIX: &str = "ppt/slides/slide";

/// Shape text of every slide, in slide order, each under a
/// `=== Slide n ===` header.
pub(crate) fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort_by_key(|(n, _)| *n);

    let mut parts = Vec::new();
    for (index, (_, name)) in slides.iter().enumerate() {
        let mut xml = String::new();
        archive
            .by_name(name)?
            .read_to_string(&mut xml)
            .map_err(|e| ExtractError::Presentation(e.to_string()))?;

        parts.push(format!("\n=== Slide {} ===\n", index + 1));
        parts.extend(shape_texts(&xml)?);
    }

    Ok(parts.join("\n"))
}

/// `ppt/slides/slide12.xml` -> 12. Layouts, masters and rels don't match.
fn slide_number(name: &str) -> Option<u32> {
    name.strip_prefix(SLIDE_PREFIX)?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Text of each `p:sp` shape, paragraphs joined by newlines.
fn shape_texts(xml: &str) -> Result<Vec<String>, ExtractError> {
    // No trimming: run boundaries can fall on either side of a space.
    let mut reader = Reader::from_str(xml);

    let mut shapes = Vec::new();
    let mut shape: Option<Vec<String>> = None;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"p:sp" => shape = Some(Vec::new()),
                b"a:p" => {
                    if let Some(paragraphs) = shape.as_mut() {
                        paragraphs.push(String::new());
                    }
                }
                b"a:t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"p:sp" => {
                    if let Some(paragraphs) = shape.take() {
                        let text = paragraphs.join("\n");
                        if !text.trim().is_empty() {
                            shapes.push(text);
                        }
                    }
                }
                b"a:t" => in_text = false,
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(paragraph) = shape.as_mut().and_then(|p| p.last_mut()) {
                    paragraph.push_str(&t.unescape()?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(shapes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slide_names_are_numbered() {
        assert_eq!(slide_number("ppt/slides/slide1.xml"), Some(1));
        assert_eq!(slide_number("ppt/slides/slide12.xml"), Some(12));
        assert_eq!(slide_number("ppt/slides/_rels/slide1.xml.rels"), None);
        assert_eq!(slide_number("ppt/slideLayouts/slideLayout1.xml"), None);
    }

    #[test]
    fn shapes_keep_paragraph_breaks() {
        let xml = r#"<p:sld xmlns:p="p" xmlns:a="a"><p:cSld><p:spTree>
            <p:sp><p:txBody><a:p><a:r><a:t>Title</a:t></a:r></a:p></p:txBody></p:sp>
            <p:sp><p:txBody>
                <a:p><a:r><a:t>one</a:t></a:r><a:r><a:t> &amp; more</a:t></a:r></a:p>
                <a:p><a:r><a:t>two</a:t></a:r></a:p>
            </p:txBody></p:sp>
            <p:sp><p:txBody><a:p/></p:txBody></p:sp>
        </p:spTree></p:cSld></p:sld>"#;

        assert_eq!(
            shape_texts(xml).unwrap(),
            vec!["Title".to_string(), "one & more\ntwo".to_string()]
        );
    }

    #[test]
    fn runs_keep_their_spacing() {
        let xml = r#"<p:sp><p:txBody><a:p>
            <a:r><a:t>Hello </a:t></a:r><a:r><a:t>world</a:t></a:r><a:r><a:t> again</a:t></a:r>
        </a:p></p:txBody></p:sp>"#;

        assert_eq!(shape_texts(xml).unwrap(), vec!["Hello world again".to_string()]);
    }
}
