//! Structural description sources.
//!
//! The marker node only needs the names of the links in the furniture description.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::info;

use crate::error::{Error, Result};

/// Provides the link names of a structural description.
pub trait StructureSource {
    /// All link names, each once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationUnavailable`] if the description cannot be loaded.
    fn link_names(&self) -> Result<Vec<String>>;
}

impl StructureSource for Vec<String> {
    fn link_names(&self) -> Result<Vec<String>> {
        Ok(self.clone())
    }
}

/// A URDF document on disk.
#[derive(Debug, Clone)]
pub struct UrdfFile {
    path: PathBuf,
}

impl UrdfFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StructureSource for UrdfFile {
    fn link_names(&self) -> Result<Vec<String>> {
        let xml = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::ConfigurationUnavailable(format!("couldn't read {}: {e}", self.path.display()))
        })?;
        let names = parse_link_names(&xml)?;
        info!(path = %self.path.display(), links = names.len(), "loaded structural description");
        Ok(names)
    }
}

fn unavailable(message: impl Into<String>) -> Error {
    Error::ConfigurationUnavailable(message.into())
}

fn link_name(e: &BytesStart) -> Result<String> {
    let attr = e
        .try_get_attribute("name")
        .map_err(|err| unavailable(err.to_string()))?
        .ok_or_else(|| unavailable("link without a name attribute"))?;
    let value = attr
        .unescape_value()
        .map_err(|err| unavailable(err.to_string()))?;
    Ok(value.into_owned())
}

fn insert_link(names: &mut BTreeSet<String>, e: &BytesStart) -> Result<()> {
    let name = link_name(e)?;
    if names.contains(&name) {
        return Err(unavailable(format!("duplicate link name: {name}")));
    }
    names.insert(name);
    Ok(())
}

/// Collects the names of the `<link>` elements directly under `<robot>`.
///
/// # Errors
///
/// Malformed XML, a missing `<robot>` root, an unnamed link or a duplicate link
/// name all make the description unavailable.
pub fn parse_link_names(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut names = BTreeSet::new();
    let mut depth = 0usize;
    let mut seen_robot = false;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| unavailable(format!("XML parse error: {e}")))?;

        match event {
            Event::Start(ref e) => {
                if depth == 0 && e.name().as_ref() == b"robot" {
                    seen_robot = true;
                } else if seen_robot && depth == 1 && e.name().as_ref() == b"link" {
                    insert_link(&mut names, e)?;
                }
                depth += 1;
            }
            Event::Empty(ref e) => {
                if depth == 0 && e.name().as_ref() == b"robot" {
                    seen_robot = true;
                } else if seen_robot && depth == 1 && e.name().as_ref() == b"link" {
                    insert_link(&mut names, e)?;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_robot {
        return Err(unavailable("missing <robot> element"));
    }

    Ok(names.into_iter().collect())
}
