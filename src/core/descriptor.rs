//! Maven project descriptor (`pom.xml`) reading.
//!
//! The document is parsed into an immutable element tree whose tags keep
//! their namespace in `{uri}local` form. Lookups go through [`local_name`],
//! so namespaced and plain descriptors resolve the same way.
//!
//! Files are decoded with the encoding named in their XML declaration.
//! General entities declared in an internal DOCTYPE subset are expanded;
//! external entities are not fetched and fail as unrecognized.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::error::{Error, Result};

pub const ARTIFACT_ID: &str = "artifactId";
pub const VERSION: &str = "version";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    fn new(tag: String) -> Self {
        Self {
            tag,
            text: None,
            children: Vec::new(),
        }
    }

    pub fn local_name(&self) -> &str {
        local_name(&self.tag)
    }

    /// Text of the last direct child whose tag, namespace removed, equals `name`.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.children
            .iter()
            .filter(|child| child.local_name() == name)
            .last()
            .and_then(|child| child.text.as_deref())
    }
}

/// Drop everything up to and including the first `}` of a tag.
pub fn local_name(tag: &str) -> &str {
    match tag.split_once('}') {
        Some((_, local)) => local,
        None => tag,
    }
}

#[derive(Debug, Clone)]
pub struct ProjectDescriptor {
    pub path: PathBuf,
    pub root: Element,
}

impl ProjectDescriptor {
    pub fn load(path: &Path) -> Result<Self> {
        let source = path.display().to_string();
        let reader = NsReader::from_file(path)
            .map_err(|e| Error::descriptor_parse(source.clone(), e.to_string(), None))?;
        let root = parse_tree(reader, &source)?;

        Ok(Self {
            path: path.to_path_buf(),
            root,
        })
    }

    /// Parse an in-memory document. Its declaration, if any, must say UTF-8.
    pub fn parse_str(xml: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let root = parse_tree(
            NsReader::from_reader(xml.as_bytes()),
            &path.display().to_string(),
        )?;
        Ok(Self { path, root })
    }

    pub fn artifact_id(&self) -> Option<&str> {
        self.root.child_text(ARTIFACT_ID)
    }

    pub fn version(&self) -> Option<&str> {
        self.root.child_text(VERSION)
    }
}

fn parse_tree<R: BufRead>(mut reader: NsReader<R>, source: &str) -> Result<Element> {
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut entities: HashMap<String, String> = HashMap::new();

    loop {
        buf.clear();
        // Refreshed every event: the declaration can switch the encoding.
        let decoder = reader.decoder();
        let position = reader.buffer_position() as u64;
        let fail = |message: String| Error::descriptor_parse(source, message, Some(position));

        let (resolved, event) = reader
            .read_resolved_event_into(&mut buf)
            .map_err(|e| fail(e.to_string()))?;

        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(fail("junk after document element".to_string()));
                }

                let local = decoder
                    .decode(start.local_name().into_inner())
                    .map_err(|e| fail(e.to_string()))?;
                let tag = match resolved {
                    ResolveResult::Bound(ns) => {
                        let uri = decoder
                            .decode(ns.into_inner())
                            .map_err(|e| fail(e.to_string()))?;
                        format!("{{{}}}{}", uri, local)
                    }
                    ResolveResult::Unbound => local.to_string(),
                    ResolveResult::Unknown(prefix) => {
                        return Err(fail(format!(
                            "unbound prefix '{}'",
                            String::from_utf8_lossy(&prefix)
                        )));
                    }
                };

                let element = Element::new(tag);
                if matches!(event, Event::Empty(_)) {
                    attach(&mut stack, &mut root, element);
                } else {
                    stack.push(element);
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| fail("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(ref text) => {
                let text = text
                    .unescape_with(|entity| {
                        entities
                            .get(entity)
                            .map(String::as_str)
                            .or_else(|| resolve_predefined_entity(entity))
                    })
                    .map_err(|e| fail(e.to_string()))?;
                push_text(&mut stack, &text).map_err(fail)?;
            }
            Event::CData(ref cdata) => {
                let text = decoder.decode(cdata).map_err(|e| fail(e.to_string()))?;
                push_text(&mut stack, &text).map_err(fail)?;
            }
            Event::DocType(ref doctype) => {
                let subset = decoder.decode(doctype).map_err(|e| fail(e.to_string()))?;
                entities.extend(internal_entities(&subset));
            }
            Event::Eof => {
                if let Some(open) = stack.last() {
                    return Err(fail(format!("unclosed element '{}'", open.local_name())));
                }
                return root.ok_or_else(|| fail("no element found".to_string()));
            }
            _ => {}
        }
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

/// General entities of the form `<!ENTITY name "value">` from a DOCTYPE body.
///
/// Parameter entities (`<!ENTITY % ...>`) and external ones (`SYSTEM`/`PUBLIC`)
/// are skipped.
fn internal_entities(doctype: &str) -> Vec<(String, String)> {
    let mut found = Vec::new();
    let mut rest = doctype;

    while let Some(start) = rest.find("<!ENTITY") {
        rest = rest[start + "<!ENTITY".len()..].trim_start();

        let name_end = rest
            .find(|c: char| c.is_whitespace())
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        let after_name = rest[name_end..].trim_start();

        let quote = match after_name.chars().next() {
            Some(q @ ('"' | '\'')) if name != "%" => q,
            _ => continue,
        };
        let body = &after_name[1..];
        if let Some(value_end) = body.find(quote) {
            found.push((name.to_string(), body[..value_end].to_string()));
            rest = &body[value_end + 1..];
        }
    }

    found
}

/// Text only counts until the element's first child; later runs are tails.
fn push_text(stack: &mut [Element], text: &str) -> std::result::Result<(), String> {
    match stack.last_mut() {
        Some(current) if current.children.is_empty() => {
            current.text.get_or_insert_with(String::new).push_str(text);
            Ok(())
        }
        Some(_) => Ok(()),
        None if text.trim().is_empty() => Ok(()),
        None => Err("text outside the document element".to_string()),
    }
}
