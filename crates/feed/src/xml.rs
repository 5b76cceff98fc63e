// ABOUTME: Minimal XML element tree built from namespace-resolved quick-xml events.
// ABOUTME: Gives the entity mappers canonical-name lookups over children, attributes, and text.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{LocalName, QName, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::FeedError;

/// Namespaces the feed uses, with the prefix their names are stored under.
/// Atom is the default namespace and carries no prefix.
const KNOWN_NAMESPACES: &[(&str, &str)] = &[
    ("http://www.w3.org/2005/Atom", ""),
    ("http://search.yahoo.com/mrss/", "media"),
    ("http://a9.com/-/spec/opensearchrss/1.0/", "openSearch"),
    ("http://a9.com/-/spec/opensearch/1.1/", "openSearch"),
    ("http://gdata.youtube.com/schemas/2007", "yt"),
    ("http://schemas.google.com/g/2005", "gd"),
];

/// One XML element with its attributes, child elements, and text content.
///
/// Element and attribute names are canonical: anything bound to one of the
/// feed's namespaces is stored as `prefix:local` with the conventional prefix
/// (`media:group`, `openSearch:totalResults`, `yt:format`) whatever prefix the
/// document declared. Names bound to other namespaces are stored in
/// `{uri}local` form. Names with no declared binding keep the prefix as
/// written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Attribute value by qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child element with the given qualified name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given qualified name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text content with surrounding whitespace removed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Trimmed text of the first matching child, or None if the child is absent or blank.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(XmlElement::text).filter(|t| !t.is_empty())
    }
}

/// Reads a complete document and returns its root element.
///
/// Fails with `MalformedFeed` on any well-formedness problem: mismatched or
/// unclosed tags, undefined entities, bad attributes, text outside the root,
/// a second root, or no root at all.
pub fn parse_document(data: &[u8]) -> Result<XmlElement, FeedError> {
    let mut reader = NsReader::from_reader(data);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Err(e) => {
                return Err(FeedError::malformed_feed(format!(
                    "XML error near byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            Ok(Event::Start(ref e)) => {
                ensure_single_root(&root)?;
                stack.push(open_element(e, &reader)?);
            }
            Ok(Event::Empty(ref e)) => {
                ensure_single_root(&root)?;
                let element = open_element(e, &reader)?;
                close_element(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| FeedError::malformed_feed("closing tag without opening tag"))?;
                close_element(&mut stack, &mut root, element);
            }
            Ok(Event::Text(ref e)) => {
                let text = e.decode().map_err(FeedError::malformed_feed)?;
                append_text(&mut stack, &text)?;
            }
            Ok(Event::CData(ref e)) => {
                let text = std::str::from_utf8(e).map_err(FeedError::malformed_feed)?;
                append_text(&mut stack, text)?;
            }
            Ok(Event::GeneralRef(ref e)) => {
                let name = e.decode().map_err(FeedError::malformed_feed)?;
                let resolved = resolve_reference(&name).ok_or_else(|| {
                    FeedError::malformed_feed(format!("undefined entity reference &{};", name))
                })?;
                append_text(&mut stack, &resolved)?;
            }
            Ok(Event::Eof) => break,
            // Declarations, comments, processing instructions, doctype
            Ok(_) => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(FeedError::malformed_feed(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| FeedError::malformed_feed("document has no root element"))
}

fn ensure_single_root(root: &Option<XmlElement>) -> Result<(), FeedError> {
    match root {
        Some(existing) => Err(FeedError::malformed_feed(format!(
            "content after root element <{}>",
            existing.name
        ))),
        None => Ok(()),
    }
}

fn open_element(e: &BytesStart, reader: &NsReader<&[u8]>) -> Result<XmlElement, FeedError> {
    let (resolved, local) = reader.resolve_element(e.name());
    let mut element = XmlElement::new(canonical_name(resolved, local, e.name()));
    for attr in e.attributes() {
        let attr = attr.map_err(FeedError::malformed_feed)?;
        let (resolved, local) = reader.resolve_attribute(attr.key);
        let key = canonical_name(resolved, local, attr.key);
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(FeedError::malformed_feed)?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn canonical_name(resolved: ResolveResult, local: LocalName, raw: QName) -> String {
    let local = String::from_utf8_lossy(local.as_ref());
    match resolved {
        ResolveResult::Bound(ns) => {
            let uri = String::from_utf8_lossy(ns.as_ref());
            match KNOWN_NAMESPACES.iter().find(|(known, _)| *known == uri) {
                Some((_, "")) => local.into_owned(),
                Some((_, prefix)) => format!("{}:{}", prefix, local),
                None => format!("{{{}}}{}", uri, local),
            }
        }
        ResolveResult::Unbound | ResolveResult::Unknown(_) => {
            String::from_utf8_lossy(raw.as_ref()).into_owned()
        }
    }
}

fn close_element(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn append_text(stack: &mut [XmlElement], text: &str) -> Result<(), FeedError> {
    match stack.last_mut() {
        Some(current) => {
            current.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(FeedError::malformed_feed("text outside the root element")),
    }
}

/// Resolves the five predefined XML entities and numeric character references.
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    let resolved = match name {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "apos" => "'",
        "quot" => "\"",
        _ => return None,
    };
    Some(resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_tree_with_qualified_names() {
        let xml = r#"<?xml version="1.0"?>
<feed xmlns:media="http://search.yahoo.com/mrss/">
    <id>feed-1</id>
    <media:group>
        <media:content url="http://a/1" isDefault="true"/>
        <media:content url="http://a/2"/>
    </media:group>
</feed>"#;

        let root = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(root.name, "feed");
        assert_eq!(root.child_text("id"), Some("feed-1"));
        let group = root.child("media:group").unwrap();
        let urls: Vec<&str> = group
            .children_named("media:content")
            .filter_map(|c| c.attr("url"))
            .collect();
        assert_eq!(urls, vec!["http://a/1", "http://a/2"]);
        assert_eq!(group.children[0].attr("isDefault"), Some("true"));
        assert_eq!(group.children[1].attr("isDefault"), None);
    }

    #[test]
    fn test_names_follow_namespace_not_prefix() {
        let xml = r#"<a:feed xmlns:a="http://www.w3.org/2005/Atom"
        xmlns:m="http://search.yahoo.com/mrss/"
        xmlns:os="http://a9.com/-/spec/opensearchrss/1.0/"
        xmlns:y="http://gdata.youtube.com/schemas/2007"
        xmlns:media="urn:something-else">
    <os:itemsPerPage>10</os:itemsPerPage>
    <m:group>
        <m:content url="http://a/1" y:format="5"/>
    </m:group>
    <media:group>shadow</media:group>
</a:feed>"#;

        let root = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(root.name, "feed");
        assert_eq!(root.child_text("openSearch:itemsPerPage"), Some("10"));
        assert_eq!(root.children_named("media:group").count(), 1);
        let content = root.child("media:group").unwrap().child("media:content").unwrap();
        assert_eq!(content.attr("yt:format"), Some("5"));
        assert_eq!(root.child_text("{urn:something-else}group"), Some("shadow"));
    }

    #[test]
    fn test_default_namespace_drops_prefix() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><id>x</id></feed>"#;
        let root = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(root.name, "feed");
        assert_eq!(root.child_text("id"), Some("x"));
    }

    #[test]
    fn test_decodes_entities_text_and_attributes() {
        let xml = r#"<root label="Pets &amp; Animals"><c>&lt;div style="x"&gt;a &amp; b&#33;&lt;/div&gt;</c></root>"#;
        let root = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(root.attr("label"), Some("Pets & Animals"));
        assert_eq!(root.child_text("c"), Some(r#"<div style="x">a & b!</div>"#));
    }

    #[test]
    fn test_cdata_is_text() {
        let xml = "<root><c><![CDATA[<b>bold</b>]]></c></root>";
        let root = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(root.child_text("c"), Some("<b>bold</b>"));
    }

    #[test]
    fn test_blank_child_text_is_none() {
        let root = parse_document(b"<root><a>   </a><b/></root>").unwrap();
        assert_eq!(root.child_text("a"), None);
        assert_eq!(root.child_text("b"), None);
        assert_eq!(root.child_text("missing"), None);
    }

    #[test]
    fn test_rejects_malformed_documents() {
        let cases: &[&[u8]] = &[
            b"",
            b"this is not xml",
            b"<feed><id>1</id>",
            b"<feed><id>1</title></feed>",
            b"<feed>&nbsp;</feed>",
            b"<a/><b/>",
        ];
        for case in cases {
            let err = parse_document(case).unwrap_err();
            assert!(
                err.is_malformed_feed(),
                "expected MalformedFeed for {:?}, got {:?}",
                String::from_utf8_lossy(case),
                err
            );
        }
    }
}
