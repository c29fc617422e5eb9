//! Owned XML element tree.
//!
//! Templates are parsed once into this tree and deep-copied with `Clone`
//! before being filled in. Whitespace-only text is dropped while parsing so
//! that the serializer can re-indent the whole document.

use std::io::Write;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Mode of a newly created output file on unix.
#[cfg(unix)]
pub const OUTPUT_FILE_MODE: u32 = 0o644;

/// Errors raised while parsing, navigating or writing XML.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("XML parse error at byte {position}: {message}")]
    Parse { position: u64, message: String },

    #[error("XML input has no root element")]
    NoRoot,

    #[error("XML input has more than one root element")]
    MultipleRoots,

    #[error("Element <{parent}> has no {path:?}")]
    MissingNode { parent: String, path: String },

    #[error("XML serialization error: {message}")]
    Serialize { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Leaf element holding only `text`.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.set_text(text);
        element
    }

    /// Parse a fragment with exactly one root element.
    pub fn parse(input: &str) -> Result<Self, XmlError> {
        parse_tree(input).map(|(_, root)| root)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set or replace an attribute, keeping its original position.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Concatenated direct text content, `None` when there is none.
    pub fn text(&self) -> Option<String> {
        let mut text = String::new();
        let mut found = false;
        for child in &self.children {
            if let XmlNode::Text(t) = child {
                text.push_str(t);
                found = true;
            }
        }
        found.then_some(text)
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.children.push(XmlNode::Text(text.into()));
    }

    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Direct child elements, in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Direct child elements called `name`.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.name == name)
    }

    /// First direct child element called `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find_map(|node| match node {
            XmlNode::Element(e) if e.name == name => Some(e),
            _ => None,
        })
    }

    /// Follow a slash-separated path of first-matching children.
    pub fn find_path(&self, path: &str) -> Option<&XmlElement> {
        let mut current = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current.child(segment)?;
        }
        Some(current)
    }

    pub fn find_path_mut(&mut self, path: &str) -> Option<&mut XmlElement> {
        let mut current = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current.child_mut(segment)?;
        }
        Some(current)
    }

    /// Like [`XmlElement::find_path_mut`], failing with the missing path.
    pub fn require_mut(&mut self, path: &str) -> Result<&mut XmlElement, XmlError> {
        let parent = self.name.clone();
        self.find_path_mut(path).ok_or_else(|| XmlError::MissingNode {
            parent,
            path: path.to_string(),
        })
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), XmlError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            return emit(writer, Event::Empty(start));
        }

        emit(writer, Event::Start(start))?;
        for child in &self.children {
            match child {
                XmlNode::Element(e) => e.write_to(writer)?,
                XmlNode::Text(t) => emit(writer, Event::Text(BytesText::new(t)))?,
            }
        }
        emit(writer, Event::End(BytesEnd::new(self.name.as_str())))
    }
}

/// A root element plus the document type declaration, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    doctype: Option<String>,
    root: XmlElement,
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        Self {
            doctype: None,
            root,
        }
    }

    pub fn parse(input: &str) -> Result<Self, XmlError> {
        let (doctype, root) = parse_tree(input)?;
        Ok(Self { doctype, root })
    }

    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    /// UTF-8 serialization with an XML declaration and two-space indent.
    pub fn to_pretty_string(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;
        if let Some(doctype) = &self.doctype {
            emit(
                &mut writer,
                Event::DocType(BytesText::from_escaped(doctype.as_str())),
            )?;
        }
        self.root.write_to(&mut writer)?;

        let mut xml = String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Serialize {
            message: e.to_string(),
        })?;
        xml.push('\n');
        Ok(xml)
    }

    /// Write the document to `path`.
    ///
    /// The bytes go to a temporary file next to `path` that is renamed into
    /// place once complete, so `path` is never left half-written.
    pub fn write_to_path(&self, path: &Path) -> Result<(), XmlError> {
        let xml = self.to_pretty_string()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(xml.as_bytes())?;
        tmp.flush()?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Temp files are created 0600; keep the target's mode when replacing it.
            let mode = match std::fs::metadata(path) {
                Ok(existing) => existing.permissions().mode() & 0o7777,
                Err(_) => OUTPUT_FILE_MODE,
            };
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(mode))?;
        }
        tmp.persist(path).map_err(|e| XmlError::Io(e.error))?;
        Ok(())
    }
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Serialize {
            message: e.to_string(),
        })
}

fn parse_tree(input: &str) -> Result<(Option<String>, XmlElement), XmlError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut doctype = None;
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let parse_err = |message: String| XmlError::Parse { position, message };

        match reader.read_event().map_err(|e| parse_err(e.to_string()))? {
            Event::Start(start) => stack.push(element_from_start(&start).map_err(parse_err)?),
            Event::Empty(start) => {
                let element = element_from_start(&start).map_err(parse_err)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| parse_err("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| parse_err(e.to_string()))?;
                push_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                push_text(&mut stack, &text);
            }
            Event::DocType(text) => {
                doctype = Some(String::from_utf8_lossy(&text).trim().to_string());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Parse {
            position: reader.buffer_position() as u64,
            message: format!("unclosed element <{}>", open.name),
        });
    }
    root.map(|root| (doctype, root)).ok_or(XmlError::NoRoot)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, String> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| e.to_string())?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.push_child(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(XmlError::MultipleRoots),
    }
    Ok(())
}

fn push_text(stack: &mut [XmlElement], text: &str) {
    if text.trim().is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Text(text.to_string()));
    }
}
