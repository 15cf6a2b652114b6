//! Solr XML response decoding.
//!
//! Converts the output of Solr's XML response writer into the same generic
//! shape the JSON response writer produces, so callers see one structure
//! regardless of `wt`.
//!
//! ```text
//! <response>                                {
//!   <lst name="responseHeader">               "responseHeader": {
//!     <int name="status">0</int>                "status": 0
//!   </lst>                                    },
//!   <result name="response" numFound="1"      "response": {
//!           start="0">                          "numFound": 1, "start": 0,
//!     <doc><str name="id">a</str></doc>         "docs": [{"id": "a"}]
//!   </result>                                 }
//! </response>                               }
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Number, Value};

use crate::error::DecodeError;

const CHILD_DOCUMENTS: &str = "_childDocuments_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Object,
    Array,
    Result,
    Doc,
    Str,
    Int,
    Float,
    Bool,
    Null,
}

impl Kind {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "lst" | "response" => Kind::Object,
            "arr" => Kind::Array,
            "result" => Kind::Result,
            "doc" => Kind::Doc,
            "str" | "date" => Kind::Str,
            "int" | "long" | "short" | "byte" => Kind::Int,
            "float" | "double" => Kind::Float,
            "bool" => Kind::Bool,
            "null" => Kind::Null,
            _ => Kind::Object,
        }
    }

    fn is_scalar(self) -> bool {
        matches!(self, Kind::Str | Kind::Int | Kind::Float | Kind::Bool | Kind::Null)
    }
}

struct Frame {
    kind: Kind,
    tag: String,
    name: Option<String>,
    object: Map<String, Value>,
    array: Vec<Value>,
    text: String,
}

impl Frame {
    fn open(e: &BytesStart<'_>) -> Result<Self, DecodeError> {
        let tag = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        let kind = Kind::from_tag(&tag);
        let mut frame = Frame {
            kind,
            tag,
            name: None,
            object: Map::new(),
            array: Vec::new(),
            text: String::new(),
        };

        for attr in e.attributes() {
            let attr = attr.map_err(|e| DecodeError::Xml(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| DecodeError::Xml(e.to_string()))?
                .into_owned();

            if key == "name" {
                frame.name = Some(value);
            } else if kind == Kind::Result {
                let parsed = match key.as_str() {
                    "numFound" | "start" => int_value(&frame.tag, &value)?,
                    "maxScore" => float_value(&frame.tag, &value)?,
                    "numFoundExact" => bool_value(&frame.tag, &value)?,
                    _ => Value::String(value),
                };
                frame.object.insert(key, parsed);
            }
        }

        if kind == Kind::Result {
            frame.object.insert("docs".to_string(), Value::Array(Vec::new()));
        }
        Ok(frame)
    }

    fn close(self) -> Result<(Option<String>, String, Value), DecodeError> {
        let value = match self.kind {
            Kind::Array => Value::Array(self.array),
            Kind::Object | Kind::Result | Kind::Doc => {
                let text = self.text.trim();
                if self.object.is_empty() && !text.is_empty() {
                    Value::String(text.to_string())
                } else {
                    Value::Object(self.object)
                }
            }
            Kind::Str => Value::String(self.text),
            Kind::Int => int_value(&self.tag, &self.text)?,
            Kind::Float => float_value(&self.tag, &self.text)?,
            Kind::Bool => bool_value(&self.tag, &self.text)?,
            Kind::Null => Value::Null,
        };
        Ok((self.name, self.tag, value))
    }

    fn attach(&mut self, name: Option<String>, tag: String, value: Value) -> Result<(), DecodeError> {
        match self.kind {
            Kind::Array => self.array.push(value),
            Kind::Result => {
                if let Some(Value::Array(docs)) = self.object.get_mut("docs") {
                    docs.push(value);
                }
            }
            Kind::Doc if tag == "doc" && name.is_none() => {
                let children = self
                    .object
                    .entry(CHILD_DOCUMENTS)
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(children) = children {
                    children.push(value);
                }
            }
            Kind::Object | Kind::Doc => {
                self.object.insert(name.unwrap_or(tag), value);
            }
            _ => {
                return Err(DecodeError::Xml(format!(
                    "unexpected <{}> inside <{}>",
                    tag, self.tag
                )))
            }
        }
        Ok(())
    }
}

fn int_value(tag: &str, text: &str) -> Result<Value, DecodeError> {
    text.trim()
        .parse::<i64>()
        .map(Value::from)
        .map_err(|_| DecodeError::Xml(format!("invalid <{}> value '{}'", tag, text)))
}

/// Solr writes non-finite floats as `NaN`, `Infinity` and `-Infinity`; those
/// have no JSON number form and stay strings.
fn float_value(tag: &str, text: &str) -> Result<Value, DecodeError> {
    let text = text.trim();
    if matches!(text, "NaN" | "Infinity" | "-Infinity") {
        return Ok(Value::String(text.to_string()));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| DecodeError::Xml(format!("invalid <{}> value '{}'", tag, text)))
}

fn bool_value(tag: &str, text: &str) -> Result<Value, DecodeError> {
    match text.trim() {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        other => Err(DecodeError::Xml(format!("invalid <{}> value '{}'", tag, other))),
    }
}

/// Decode a Solr XML response body into a generic JSON value.
pub fn decode(body: &str) -> Result<Value, DecodeError> {
    let mut reader = Reader::from_str(body);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DecodeError::Xml(format!("at byte {}: {}", reader.buffer_position(), e)))?;

        match event {
            Event::Start(e) => stack.push(Frame::open(&e)?),
            Event::Empty(e) => {
                let frame = Frame::open(&e)?;
                finish(&mut stack, &mut root, frame)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| DecodeError::Xml("unbalanced closing tag".to_string()))?;
                finish(&mut stack, &mut root, frame)?;
            }
            Event::Text(t) => {
                if let Some(frame) = stack.last_mut() {
                    let text = t.unescape().map_err(|e| DecodeError::Xml(e.to_string()))?;
                    frame.text.push_str(&text);
                }
            }
            Event::CData(c) => {
                if let Some(frame) = stack.last_mut() {
                    let raw = c.into_inner();
                    let text = std::str::from_utf8(&raw).map_err(|e| DecodeError::Xml(e.to_string()))?;
                    frame.text.push_str(text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(DecodeError::Xml("unexpected end of document".to_string()));
    }
    root.ok_or_else(|| DecodeError::Xml("empty document".to_string()))
}

fn finish(stack: &mut Vec<Frame>, root: &mut Option<Value>, frame: Frame) -> Result<(), DecodeError> {
    let (name, tag, value) = frame.close()?;
    match stack.last_mut() {
        Some(parent) if parent.kind.is_scalar() => Err(DecodeError::Xml(format!(
            "unexpected <{}> inside <{}>",
            tag, parent.tag
        ))),
        Some(parent) => parent.attach(name, tag, value),
        None if root.is_some() => Err(DecodeError::Xml(format!(
            "second top-level element <{}>",
            tag
        ))),
        None => {
            *root = Some(value);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_select_response() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
<lst name="responseHeader">
  <int name="status">0</int>
  <int name="QTime">3</int>
  <lst name="params">
    <str name="q">title:rust</str>
    <arr name="fq"><str>type:book</str><str>lang:en</str></arr>
  </lst>
</lst>
<result name="response" numFound="2" start="0" maxScore="1.5">
  <doc>
    <str name="id">1</str>
    <str name="title">Programming  Rust </str>
    <float name="score">1.5</float>
    <bool name="inStock">true</bool>
    <date name="published">2021-07-06T00:00:00Z</date>
    <arr name="tags"><str>systems</str><str>lang</str></arr>
  </doc>
  <doc>
    <str name="id">2</str>
    <long name="pages">624</long>
    <null name="isbn"/>
  </doc>
</result>
</response>"#;

        let value = decode(body).unwrap();
        assert_eq!(
            value,
            json!({
                "responseHeader": {
                    "status": 0,
                    "QTime": 3,
                    "params": {"q": "title:rust", "fq": ["type:book", "lang:en"]}
                },
                "response": {
                    "numFound": 2,
                    "start": 0,
                    "maxScore": 1.5,
                    "docs": [
                        {
                            "id": "1",
                            "title": "Programming  Rust ",
                            "score": 1.5,
                            "inStock": true,
                            "published": "2021-07-06T00:00:00Z",
                            "tags": ["systems", "lang"]
                        },
                        {"id": "2", "pages": 624, "isbn": null}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_decode_child_documents_and_escapes() {
        let body = r#"<response><result name="response" numFound="1" start="0" numFoundExact="true">
<doc><str name="id">p1</str><str name="note">a &amp; b</str>
  <doc><str name="id">c1</str></doc>
</doc></result></response>"#;

        let value = decode(body).unwrap();
        assert_eq!(value["response"]["numFoundExact"], json!(true));
        let doc = &value["response"]["docs"][0];
        assert_eq!(doc["note"], json!("a & b"));
        assert_eq!(doc["_childDocuments_"], json!([{"id": "c1"}]));
    }

    #[test]
    fn test_non_finite_float_kept_as_string() {
        let value = decode(r#"<response><float name="maxScore">NaN</float></response>"#).unwrap();
        assert_eq!(value["maxScore"], json!("NaN"));

        let value = decode(r#"<response><double name="lo">-Infinity</double><float name="hi">Infinity</float></response>"#).unwrap();
        assert_eq!(value["lo"], json!("-Infinity"));
        assert_eq!(value["hi"], json!("Infinity"));
    }

    #[test]
    fn test_invalid_float_rejected() {
        let err = decode(r#"<response><float name="score">abc</float></response>"#).unwrap_err();
        assert!(err.to_string().contains("invalid <float> value 'abc'"));

        let bad_max_score = r#"<response><result name="response" numFound="0" start="0" maxScore="high"/></response>"#;
        assert!(matches!(decode(bad_max_score), Err(DecodeError::Xml(_))));

        // Rust's parser alone would turn these into non-finite floats
        assert!(decode(r#"<response><float name="x">inf</float></response>"#).is_err());
        assert!(decode(r#"<response><float name="x">1e999</float></response>"#).is_err());
    }

    #[test]
    fn test_second_root_element_rejected() {
        let err = decode("<response><int name=\"a\">1</int></response><response/>").unwrap_err();
        assert!(matches!(err, DecodeError::Xml(ref msg) if msg.contains("second top-level element")));
        assert!(decode("<response/>").is_ok());
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(decode("<response><int name=\"a\">x</int></response>"), Err(DecodeError::Xml(_))));
        assert!(matches!(decode("<response><lst name=\"a\">"), Err(DecodeError::Xml(_))));
        assert!(matches!(decode(""), Err(DecodeError::Xml(_))));
        assert!(matches!(decode("<response><int>1<str>x</str></int></response>"), Err(DecodeError::Xml(_))));
    }
}
