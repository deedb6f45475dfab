//! Support for Android `strings.xml` resource files.
//!
//! Parses `<string>` and `<plurals>` elements into a [`ResourceTable`], skipping
//! anything marked `translatable="false"`, and writes tables back in one canonical
//! layout so that re-serializing an unchanged table is byte-identical.

use std::{
    io::{BufRead, Read, Write},
    path::Path,
};

use quick_xml::{
    Reader, Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    error::Error,
    traits::Parser,
    types::{Quantity, ResourceKey, ResourceTable},
};

const INDENT: &str = "    ";

impl Parser for ResourceTable {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);

        let mut buf = Vec::new();
        let mut table = ResourceTable::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(ref e) if e.name().as_ref() == b"string" => {
                    let attrs = ElementAttributes::parse(e, b"name")?;
                    let value = read_text(&mut xml_reader, b"string")?;
                    if let Some(name) = attrs.translatable_name() {
                        table.insert(ResourceKey::simple(name), value);
                    }
                }
                Event::Empty(ref e) if e.name().as_ref() == b"string" => {
                    let attrs = ElementAttributes::parse(e, b"name")?;
                    if let Some(name) = attrs.translatable_name() {
                        table.insert(ResourceKey::simple(name), String::new());
                    }
                }
                Event::Start(ref e) if e.name().as_ref() == b"plurals" => {
                    let attrs = ElementAttributes::parse(e, b"name")?;
                    let items = read_plural_items(&mut xml_reader)?;
                    if let Some(name) = attrs.translatable_name() {
                        for (quantity, value) in items {
                            table.insert(ResourceKey::plural(name, quantity), value);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(table)
    }

    /// Parse from file path, naming the file in the error.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut content = String::new();
        std::fs::File::open(path)
            .and_then(|mut file| file.read_to_string(&mut content))
            .map_err(|e| Error::resource_parse(path, Error::Io(e)))?;
        Self::from_str(&content).map_err(|e| Error::resource_parse(path, e))
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::Start(BytesStart::new("resources")))?;

        let mut open_plurals: Option<&str> = None;
        for (key, value) in self {
            match key {
                ResourceKey::Simple(name) => {
                    close_plurals(&mut xml_writer, &mut open_plurals)?;
                    newline(&mut xml_writer, 1)?;
                    let mut elem = BytesStart::new("string");
                    elem.push_attribute(("name", name.as_str()));
                    write_text_element(&mut xml_writer, elem, "string", value)?;
                }
                ResourceKey::Plural { name, quantity } => {
                    if open_plurals != Some(name.as_str()) {
                        close_plurals(&mut xml_writer, &mut open_plurals)?;
                        newline(&mut xml_writer, 1)?;
                        let mut elem = BytesStart::new("plurals");
                        elem.push_attribute(("name", name.as_str()));
                        xml_writer.write_event(Event::Start(elem))?;
                        open_plurals = Some(name.as_str());
                    }
                    newline(&mut xml_writer, 2)?;
                    let mut elem = BytesStart::new("item");
                    elem.push_attribute(("quantity", quantity.as_str()));
                    write_text_element(&mut xml_writer, elem, "item", value)?;
                }
            }
        }
        close_plurals(&mut xml_writer, &mut open_plurals)?;

        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("resources")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

struct ElementAttributes {
    name: Option<String>,
    translatable: bool,
}

impl ElementAttributes {
    fn parse(e: &BytesStart, name_attr: &[u8]) -> Result<Self, Error> {
        let mut name = None;
        let mut translatable = true;

        for attr in e.attributes().with_checks(false) {
            let attr = attr.map_err(|e| Error::InvalidResource(e.to_string()))?;
            let key = attr.key.as_ref();
            if key == name_attr {
                name = Some(attr.unescape_value()?.to_string());
            } else if key == b"translatable" {
                translatable = !attr.unescape_value()?.eq_ignore_ascii_case("false");
            }
        }
        Ok(Self { name, translatable })
    }

    /// The element name, unless it is blank or the element is not translatable.
    fn translatable_name(&self) -> Option<&str> {
        match &self.name {
            Some(name) if self.translatable && !name.trim().is_empty() => Some(name),
            _ => None,
        }
    }
}

/// Reads the text content of the element whose start tag was just consumed.
/// Nested tags are dropped, their text is kept.
fn read_text<R: BufRead>(xml_reader: &mut Reader<R>, end: &[u8]) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Start(_) => depth += 1,
            Event::End(e) if depth == 0 && e.name().as_ref() == end => break,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => {
                return Err(Error::InvalidResource(format!(
                    "unexpected EOF inside <{}>",
                    String::from_utf8_lossy(end)
                )));
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}

fn read_plural_items<R: BufRead>(
    xml_reader: &mut Reader<R>,
) -> Result<Vec<(Quantity, String)>, Error> {
    let mut buf = Vec::new();
    let mut items = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.name().as_ref() == b"item" => {
                let attrs = ElementAttributes::parse(e, b"quantity")?;
                let value = read_text(xml_reader, b"item")?;
                if let Some(quantity) = attrs.name.filter(|q| !q.trim().is_empty()) {
                    items.push((Quantity::from(quantity.as_str()), value));
                }
            }
            Event::Empty(ref e) if e.name().as_ref() == b"item" => {
                let attrs = ElementAttributes::parse(e, b"quantity")?;
                if let Some(quantity) = attrs.name.filter(|q| !q.trim().is_empty()) {
                    items.push((Quantity::from(quantity.as_str()), String::new()));
                }
            }
            Event::Start(ref e) => {
                let other = e.name().as_ref().to_vec();
                read_text(xml_reader, &other)?;
            }
            Event::End(ref e) if e.name().as_ref() == b"plurals" => break,
            Event::Eof => {
                return Err(Error::InvalidResource(
                    "unexpected EOF inside <plurals>".to_string(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(items)
}

fn newline<W: Write>(xml_writer: &mut Writer<W>, level: usize) -> Result<(), Error> {
    let indent = format!("\n{}", INDENT.repeat(level));
    xml_writer.write_event(Event::Text(BytesText::new(&indent)))?;
    Ok(())
}

fn write_text_element<W: Write>(
    xml_writer: &mut Writer<W>,
    start: BytesStart,
    tag: &str,
    value: &str,
) -> Result<(), Error> {
    xml_writer.write_event(Event::Start(start))?;
    xml_writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(value))))?;
    xml_writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn close_plurals<W: Write>(
    xml_writer: &mut Writer<W>,
    open_plurals: &mut Option<&str>,
) -> Result<(), Error> {
    if open_plurals.take().is_some() {
        newline(xml_writer, 1)?;
        xml_writer.write_event(Event::End(BytesEnd::new("plurals")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn serialize(table: &ResourceTable) -> String {
        String::from_utf8(table.to_bytes().unwrap()).unwrap()
    }

    #[test]
    fn test_parse_basic_strings_xml() {
        let xml = r#"
        <resources>
            <string name="hello">Hello</string>
            <string name="bye" translatable="false">Goodbye</string>
            <string name="empty"></string>
            <string name="self_closing"/>
        </resources>
        "#;
        let table = ResourceTable::from_str(xml).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(&ResourceKey::simple("hello")), Some("Hello"));
        assert_eq!(table.get(&ResourceKey::simple("empty")), Some(""));
        assert_eq!(table.get(&ResourceKey::simple("self_closing")), Some(""));
        assert!(!table.contains_key(&ResourceKey::simple("bye")));
    }

    #[test]
    fn test_translatable_flag_is_case_insensitive() {
        let xml = r#"<resources><string name="a" translatable="FALSE">A</string></resources>"#;
        assert!(ResourceTable::from_str(xml).unwrap().is_empty());
    }

    #[test]
    fn test_parse_plurals() {
        let xml = r#"
        <resources>
            <string name="hello">Hello</string>
            <plurals name="apples">
                <item quantity="one">One apple</item>
                <item quantity="other">%d apples</item>
            </plurals>
            <plurals name="fixed" translatable="false">
                <item quantity="other">Fixed</item>
            </plurals>
        </resources>
        "#;
        let table = ResourceTable::from_str(xml).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.get(&ResourceKey::plural("apples", Quantity::One)),
            Some("One apple")
        );
        assert_eq!(
            table.get(&ResourceKey::plural("apples", Quantity::Other)),
            Some("%d apples")
        );
        assert!(!table.keys().any(|k| k.name() == "fixed"));
    }

    #[test]
    fn test_skips_blank_names_and_quantities() {
        let xml = r#"
        <resources>
            <string name="">Nameless</string>
            <plurals name="p">
                <item quantity="">Nothing</item>
                <item quantity="one">One</item>
            </plurals>
        </resources>
        "#;
        let table = ResourceTable::from_str(xml).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.contains_key(&ResourceKey::plural("p", Quantity::One)));
    }

    #[test]
    fn test_text_content_of_nested_markup_and_entities() {
        let xml = r#"<resources>
            <string name="styled">Hello <b>World</b> &amp; friends</string>
            <string name="cdata"><![CDATA[<i>raw</i>]]></string>
        </resources>"#;
        let table = ResourceTable::from_str(xml).unwrap();
        assert_eq!(
            table.get(&ResourceKey::simple("styled")),
            Some("Hello World & friends")
        );
        assert_eq!(table.get(&ResourceKey::simple("cdata")), Some("<i>raw</i>"));
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let xml = r#"<resources><string name="a">A</plurals></resources>"#;
        assert!(ResourceTable::from_str(xml).is_err());

        let truncated = r#"<resources><string name="a">A"#;
        assert!(ResourceTable::from_str(truncated).is_err());
    }

    #[test]
    fn test_read_from_missing_file_names_path() {
        let err = ResourceTable::read_from("/definitely/not/here/strings.xml").unwrap_err();
        assert!(matches!(err, Error::ResourceParse { .. }));
        assert!(err.to_string().contains("/definitely/not/here/strings.xml"));
    }

    #[test]
    fn test_serialize_canonical_layout() {
        let mut table = ResourceTable::new();
        table.insert(ResourceKey::simple("bye"), "Bye %1$s");
        table.insert(ResourceKey::plural("apples", Quantity::Other), "%d apples");
        table.insert(ResourceKey::plural("apples", Quantity::One), "One apple");
        table.insert(ResourceKey::simple("hello"), "Tom & <Jerry>");

        let expected = indoc! {r#"
            <?xml version="1.0" encoding="utf-8"?>
            <resources>
                <plurals name="apples">
                    <item quantity="one">One apple</item>
                    <item quantity="other">%d apples</item>
                </plurals>
                <string name="bye">Bye %1$s</string>
                <string name="hello">Tom &amp; &lt;Jerry&gt;</string>
            </resources>
        "#};
        assert_eq!(serialize(&table), expected);
    }

    #[test]
    fn test_serialize_plural_quantity_order() {
        let mut table = ResourceTable::new();
        table.insert(ResourceKey::plural("n", Quantity::Other), "o");
        table.insert(ResourceKey::plural("n", Quantity::One), "1");
        table.insert(ResourceKey::plural("n", Quantity::Zero), "0");
        table.insert(
            ResourceKey::plural("n", Quantity::Unknown("custom".to_string())),
            "c",
        );

        let out = serialize(&table);
        let zero = out.find(r#"quantity="zero""#).unwrap();
        let one = out.find(r#"quantity="one""#).unwrap();
        let other = out.find(r#"quantity="other""#).unwrap();
        let custom = out.find(r#"quantity="custom""#).unwrap();
        assert!(zero < one && one < other && other < custom);
    }

    #[test]
    fn test_serialize_simple_before_plural_of_same_name() {
        let mut table = ResourceTable::new();
        table.insert(ResourceKey::plural("dup", Quantity::One), "plural");
        table.insert(ResourceKey::simple("dup"), "simple");

        let out = serialize(&table);
        assert!(out.find("<string").unwrap() < out.find("<plurals").unwrap());
    }

    #[test]
    fn test_serialize_empty_table() {
        let out = serialize(&ResourceTable::new());
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n</resources>\n"
        );
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let xml = indoc! {r#"
            <?xml version="1.0" encoding="utf-8"?>
            <resources>
                <string name="a_greeting">Hi, it's me</string>
                <plurals name="days">
                    <item quantity="one">%d day</item>
                    <item quantity="few">%d days (few)</item>
                    <item quantity="other">%d days</item>
                </plurals>
                <string name="empty"></string>
                <string name="quote">"quoted" &amp; escaped</string>
            </resources>
        "#};
        let table = ResourceTable::from_str(xml).unwrap();
        assert_eq!(serialize(&table), xml);

        let again = ResourceTable::from_str(&serialize(&table)).unwrap();
        assert_eq!(again, table);
    }
}
