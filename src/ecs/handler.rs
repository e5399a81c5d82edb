//! Event-driven XML handler that turns a response body into a [`ResultSet`].
//!
//! The handler walks the document once. Every occurrence of the marker
//! element starts a fresh record; all events until the matching end tag are
//! forwarded to that record, and the finished record is appended to the
//! result set. Events outside any record update the envelope markers.

use std::borrow::Cow;

use quick_xml::events::{BytesRef, BytesStart, BytesText, Event};
use quick_xml::Reader;

use crate::ecs::resultset::ResultSet;
use crate::error::XmlError;

/// A record built from the events between a marker's start and end tags.
///
/// Element names are local names (namespace prefixes removed). `text` is the
/// trimmed character data collected since the last tag.
pub trait XmlRecord: Default {
    fn start_element(&mut self, _name: &str) {}

    fn end_element(&mut self, name: &str, text: &str);
}

/// Routes parser events either to the open record or to the envelope.
struct XmlHandler<'a, T> {
    marker: &'a str,
    result_set: ResultSet<T>,
    current: Option<T>,
    depth: usize,
}

impl<'a, T: XmlRecord> XmlHandler<'a, T> {
    fn new(marker: &'a str) -> Self {
        Self { marker, result_set: ResultSet::new(), current: None, depth: 0 }
    }

    fn start_element(&mut self, name: &str) {
        match self.current.as_mut() {
            Some(record) => {
                self.depth += 1;
                record.start_element(name);
            }
            None if name == self.marker => {
                self.current = Some(T::default());
                self.depth = 0;
            }
            None => self.result_set.start_element(name),
        }
    }

    fn end_element(&mut self, name: &str, text: &str) {
        if self.current.is_none() {
            self.result_set.end_element(name, text);
            return;
        }

        if self.depth == 0 {
            if let Some(record) = self.current.take() {
                self.result_set.push(record);
            }
        } else {
            self.depth -= 1;
            if let Some(record) = self.current.as_mut() {
                record.end_element(name, text);
            }
        }
    }
}

/// Parses `body`, building one `T` per `marker` element in document order.
pub fn parse_result_set<T: XmlRecord>(body: &[u8], marker: &str) -> Result<ResultSet<T>, XmlError> {
    // Text is trimmed per element, not per event.
    let mut reader = Reader::from_reader(body);

    let mut handler = XmlHandler::new(marker);
    let mut open: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut seen_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(&e)?;
                seen_root = true;
                handler.start_element(&name);
                open.push(name);
                text.clear();
            }
            Event::Empty(e) => {
                let name = local_name(&e)?;
                seen_root = true;
                handler.start_element(&name);
                handler.end_element(&name, "");
                text.clear();
            }
            Event::End(_) => {
                let name = open
                    .pop()
                    .ok_or_else(|| XmlError::ParseError("unmatched closing tag".to_string()))?;
                handler.end_element(&name, text.trim());
                text.clear();
            }
            Event::Text(e) => text.push_str(&text_content(&e)?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::GeneralRef(e) => text.push_str(&resolve_reference(&e)?),
            Event::Eof => break,
            // Declaration, comments, processing instructions, doctype.
            _ => {}
        }
    }

    if let Some(name) = open.pop() {
        return Err(XmlError::UnexpectedEof(name));
    }
    if !seen_root {
        return Err(XmlError::MissingRoot);
    }

    Ok(handler.result_set)
}

fn local_name(e: &BytesStart<'_>) -> Result<String, XmlError> {
    let name = e.local_name();
    std::str::from_utf8(name.as_ref())
        .map(str::to_string)
        .map_err(|err| XmlError::ParseError(err.to_string()))
}

fn text_content(e: &BytesText<'_>) -> Result<String, XmlError> {
    let decoded = e.decode().map_err(|err| XmlError::ParseError(err.to_string()))?;
    let unescaped = quick_xml::escape::unescape(&decoded)
        .map_err(|err| XmlError::ParseError(err.to_string()))?;
    Ok(unescaped.into_owned())
}

/// Resolves `&amp;`-style and `&#38;`-style references.
fn resolve_reference(e: &BytesRef<'_>) -> Result<Cow<'static, str>, XmlError> {
    if let Some(ch) = e.resolve_char_ref().map_err(|err| XmlError::ParseError(err.to_string()))? {
        return Ok(Cow::Owned(ch.to_string()));
    }

    let name = e.decode().map_err(|err| XmlError::ParseError(err.to_string()))?;
    quick_xml::escape::resolve_predefined_entity(&name)
        .map(Cow::Borrowed)
        .ok_or_else(|| XmlError::ParseError(format!("unknown entity: &{};", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects every closed element as `name=text`.
    #[derive(Debug, Default)]
    struct Trace {
        events: Vec<String>,
    }

    impl XmlRecord for Trace {
        fn start_element(&mut self, name: &str) {
            self.events.push(format!("<{}", name));
        }

        fn end_element(&mut self, name: &str, text: &str) {
            self.events.push(format!("{}={}", name, text));
        }
    }

    #[test]
    fn test_records_in_document_order() {
        let xml = br#"<?xml version="1.0"?>
            <Root>
                <Rec><Id>1</Id></Rec>
                <Rec><Id>2</Id></Rec>
                <Rec><Id>3</Id></Rec>
            </Root>"#;

        let rs: ResultSet<Trace> = parse_result_set(xml, "Rec").unwrap();
        assert_eq!(rs.len(), 3);
        let ids: Vec<_> = rs.iter().map(|t| t.events[1].clone()).collect();
        assert_eq!(ids, vec!["Id=1", "Id=2", "Id=3"]);
    }

    #[test]
    fn test_record_sees_nested_events_but_not_its_own_tags() {
        let xml = b"<Root><Rec><A><B>x</B></A></Rec></Root>";
        let rs: ResultSet<Trace> = parse_result_set(xml, "Rec").unwrap();
        assert_eq!(rs.items()[0].events, vec!["<A", "<B", "B=x", "A="]);
    }

    #[test]
    fn test_nested_marker_stays_inside_outer_record() {
        let xml = b"<Root><Rec><Children><Rec><Id>inner</Id></Rec></Children></Rec></Root>";
        let rs: ResultSet<Trace> = parse_result_set(xml, "Rec").unwrap();
        assert_eq!(rs.len(), 1);
        assert!(rs.items()[0].events.contains(&"Id=inner".to_string()));
    }

    #[test]
    fn test_empty_marker_element_is_a_record() {
        let xml = b"<Root><Rec/><Rec><Id>2</Id></Rec></Root>";
        let rs: ResultSet<Trace> = parse_result_set(xml, "Rec").unwrap();
        assert_eq!(rs.len(), 2);
        assert!(rs.items()[0].events.is_empty());
    }

    #[test]
    fn test_namespaced_names_use_local_part() {
        let xml = br#"<ns:Root xmlns:ns="urn:x"><ns:Rec><ns:Id>1</ns:Id></ns:Rec></ns:Root>"#;
        let rs: ResultSet<Trace> = parse_result_set(xml, "Rec").unwrap();
        assert_eq!(rs.items()[0].events, vec!["<Id", "Id=1"]);
    }

    #[test]
    fn test_entities_and_cdata_are_resolved() {
        let xml = b"<Root><Rec><T>Fish &amp; Chips &#169; <![CDATA[<raw>]]></T></Rec></Root>";
        let rs: ResultSet<Trace> = parse_result_set(xml, "Rec").unwrap();
        let text = &rs.items()[0].events[1];
        assert!(text.starts_with("T=Fish & Chips"));
        assert!(text.contains('\u{a9}'));
        assert!(text.ends_with("<raw>"));
    }

    #[test]
    fn test_envelope_outside_records() {
        let xml = b"<Root><TotalResults>7</TotalResults><Rec/><TotalPages>1</TotalPages></Root>";
        let rs: ResultSet<Trace> = parse_result_set(xml, "Rec").unwrap();
        assert_eq!(rs.total_results, Some(7));
        assert_eq!(rs.total_pages, Some(1));
    }

    #[test]
    fn test_no_markers_gives_empty_set() {
        let rs: ResultSet<Trace> = parse_result_set(b"<Root><Other/></Root>", "Rec").unwrap();
        assert!(rs.is_empty());
    }

    #[test]
    fn test_mismatched_tags_fail() {
        let result: Result<ResultSet<Trace>, _> = parse_result_set(b"<Root><Rec></Root>", "Rec");
        assert!(result.is_err());
    }

    #[test]
    fn test_truncated_document_fails() {
        let result: Result<ResultSet<Trace>, _> = parse_result_set(b"<Root><Rec><Id>1</Id>", "Rec");
        assert!(matches!(result, Err(XmlError::UnexpectedEof(name)) if name == "Rec"));
    }

    #[test]
    fn test_empty_body_fails() {
        let result: Result<ResultSet<Trace>, _> = parse_result_set(b"", "Rec");
        assert!(matches!(result, Err(XmlError::MissingRoot)));
    }
}
