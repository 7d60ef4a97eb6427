//! Reference extraction from manifest markup
//!
//! A manifest declares the projects it depends on with elements such as
//!
//! ```xml
//! <ItemGroup>
//!   <ProjectReference Include="..\Core\Core.csproj" />
//! </ItemGroup>
//! ```
//!
//! Only these reference edges are read; the rest of the schema is ignored.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{Error, Result};

/// Element that declares a reference to another manifest.
pub const REFERENCE_ELEMENT: &str = "ProjectReference";

/// Attribute on [`REFERENCE_ELEMENT`] holding the referenced path.
pub const REFERENCE_ATTRIBUTE: &str = "Include";

/// Extract the declared references from manifest text, in document order.
///
/// Returned strings are as authored (separators and `..` untouched). An
/// `Include` holding a `;`-separated item list yields one entry per item.
///
/// # Errors
///
/// Returns [`Error::Markup`] when the text is not a single well-formed
/// element tree.
pub fn extract_references(content: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(content.trim_start_matches('\u{feff}'));
    let mut references = Vec::new();
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut saw_root = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::markup(e.to_string()))?;

        match event {
            Event::Start(element) => {
                check_new_root(&open, &mut saw_root)?;
                collect_reference(&element, &mut references)?;
                open.push(element.name().as_ref().to_vec());
            }
            Event::Empty(element) => {
                check_new_root(&open, &mut saw_root)?;
                collect_reference(&element, &mut references)?;
            }
            Event::End(element) => {
                let name = element.name();
                match open.pop() {
                    Some(expected) if expected == name.as_ref() => {}
                    _ => {
                        return Err(Error::markup(format!(
                            "unexpected closing tag </{}>",
                            String::from_utf8_lossy(name.as_ref())
                        )));
                    }
                }
            }
            Event::Text(text) if open.is_empty() => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(Error::markup("text content outside of the root element"));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(Error::markup(format!(
            "element <{}> is never closed",
            String::from_utf8_lossy(unclosed)
        )));
    }
    if !saw_root {
        return Err(Error::markup("document has no root element"));
    }

    Ok(references)
}

fn check_new_root(open: &[Vec<u8>], saw_root: &mut bool) -> Result<()> {
    if open.is_empty() {
        if *saw_root {
            return Err(Error::markup("document has more than one root element"));
        }
        *saw_root = true;
    }
    Ok(())
}

fn collect_reference(element: &BytesStart<'_>, references: &mut Vec<String>) -> Result<()> {
    let local_name = element.local_name();
    let is_reference = std::str::from_utf8(local_name.as_ref())
        .is_ok_and(|name| name.eq_ignore_ascii_case(REFERENCE_ELEMENT));
    if !is_reference {
        return Ok(());
    }

    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| Error::markup(e.to_string()))?;
        if attribute.key.local_name().as_ref() != REFERENCE_ATTRIBUTE.as_bytes() {
            continue;
        }
        let value = attribute
            .unescape_value()
            .map_err(|e| Error::markup(e.to_string()))?;
        references.extend(
            value
                .split(';')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string),
        );
    }

    Ok(())
}
