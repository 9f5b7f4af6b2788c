//! Format versions and versioned documents.
//!
//! Every document starts with `(version "...")`. The version is read and
//! checked before anything else so that files written by a newer program are
//! rejected up front with [`Error::UnsupportedVersion`] instead of being
//! half-understood.
//!
//! ```rust
//! use serde_sexpr::{DocumentFormat, Version};
//!
//! let format = DocumentFormat::new("symbol", Version::new(&[2, 0]));
//!
//! let err = format
//!     .read_version(serde_sexpr::parse("(symbol (version \"999.0\"))").unwrap().as_list().unwrap())
//!     .unwrap_err();
//! assert!(err.is_unsupported_version());
//! ```

use crate::adapter::{DeserializableObject, SerializableObject};
use crate::values::{expect_string, SerializableValue};
use crate::{de, parse, render, ser, Error, List, Node, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use tracing::{debug, warn};

/// Name of the version field of every document.
const VERSION_FIELD: &str = "version";

/// A dotted numeric version such as `0.1` or `2.0`.
///
/// Components are compared numerically and missing components count as zero,
/// so `1.10 > 1.9` and `2 == 2.0`. Display is rebuilt from the numeric
/// components, so `02.0` is shown as `2.0` while `2` stays `2`.
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<u32>,
}

impl Version {
    /// Creates a version from its components.
    ///
    /// # Panics
    ///
    /// Panics if `components` is empty.
    pub fn new(components: &[u32]) -> Self {
        assert!(!components.is_empty(), "a version needs at least one component");
        Version {
            components: components.to_vec(),
        }
    }

    pub fn components(&self) -> &[u32] {
        &self.components
    }

    /// Components without trailing zeros, the form used for comparison.
    fn significant(&self) -> &[u32] {
        let len = self
            .components
            .iter()
            .rposition(|&c| c != 0)
            .map_or(0, |i| i + 1);
        &self.components[..len]
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let components = s
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Error::custom(format!("invalid version `{}`", s)));
                }
                part.parse::<u32>()
                    .map_err(|_| Error::custom(format!("version component out of range in `{}`", s)))
            })
            .collect::<Result<Vec<u32>>>()?;
        Ok(Version { components })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", component)?;
        }
        Ok(())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.significant().cmp(other.significant())
    }
}

impl SerializableValue for Version {
    fn to_node(&self) -> Node {
        Node::String(self.to_string())
    }

    fn from_node(node: &Node) -> Result<Self> {
        expect_string(node, "a quoted version")?.parse()
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// The root element name and current version of one document type.
///
/// Writing always stamps the current version; reading accepts any version up
/// to and including it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFormat {
    root_name: String,
    version: Version,
}

impl DocumentFormat {
    pub fn new(root_name: &str, version: Version) -> Self {
        DocumentFormat {
            root_name: root_name.to_string(),
            version,
        }
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// The newest version this format reads, and the one it writes.
    pub fn version(&self) -> &Version {
        &self.version
    }

    fn new_root(&self) -> Result<List> {
        let mut root = List::try_new(&self.root_name)?;
        root.append_value(VERSION_FIELD, &self.version);
        Ok(root)
    }

    /// Builds the document tree for `obj`.
    pub fn serialize<T: SerializableObject + ?Sized>(&self, obj: &T) -> Result<Node> {
        let mut root = self.new_root()?;
        obj.serialize(&mut root)?;
        Ok(Node::List(root))
    }

    /// Serializes `obj` into document text.
    ///
    /// # Errors
    ///
    /// Fails if the adapter fails or if the tree holds a string or comment
    /// that could not be read back (see [`Node::validate`]).
    pub fn to_string<T: SerializableObject + ?Sized>(&self, obj: &T) -> Result<String> {
        let node = self.serialize(obj)?;
        node.validate()?;
        Ok(render(&node))
    }

    /// Checks the root name and reads the document's version.
    ///
    /// # Errors
    ///
    /// - [`Error::Structural`] if the root has another name, or if the first
    ///   element is not a well-formed `(version "...")`
    /// - [`Error::UnsupportedVersion`] if the version is newer than
    ///   [`DocumentFormat::version`]
    pub fn read_version(&self, root: &List) -> Result<Version> {
        if root.name() != self.root_name {
            return Err(Error::structural(
                root.name(),
                format!("expected a `{}` document", self.root_name),
            ));
        }
        match root.child(0) {
            Some(Node::List(field)) if field.name() == VERSION_FIELD => {}
            _ => {
                return Err(Error::structural(
                    root.name(),
                    "the first element must be `version`",
                ))
            }
        }
        let found: Version = root.require_value(VERSION_FIELD)?;
        if found > self.version {
            warn!(
                document = %self.root_name,
                found = %found,
                supported = %self.version,
                "rejecting document written by a newer format version"
            );
            return Err(Error::unsupported_version(&found, &self.version));
        }
        debug!(document = %self.root_name, version = %found, "accepted document version");
        Ok(found)
    }

    /// Gates the version, then rebuilds `T` from the root.
    pub fn deserialize<T: DeserializableObject>(&self, root: &List) -> Result<T> {
        self.read_version(root)?;
        T::deserialize(root)
    }

    /// Parses `text`, gates the version, then rebuilds `T`.
    pub fn from_str<T: DeserializableObject>(&self, text: &str) -> Result<T> {
        let node = parse(text)?;
        self.deserialize(expect_root(&node)?)
    }

    /// Like [`DocumentFormat::to_string`], with the body produced by serde.
    pub fn to_string_serde<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let mut root = self.new_root()?;
        ser::serialize_into(value, &mut root)?;
        Ok(render(&Node::List(root)))
    }

    /// Like [`DocumentFormat::from_str`], with the body read by serde.
    ///
    /// The `version` field is skipped unless `T` declares one.
    pub fn from_str_serde<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        let node = parse(text)?;
        let root = expect_root(&node)?;
        self.read_version(root)?;
        de::from_list(root)
    }
}

fn expect_root(node: &Node) -> Result<&List> {
    // The parser only ever returns a list, but a caller-built node may not be one.
    node.as_list()
        .ok_or_else(|| Error::custom(format!("expected a root list, found a {}", node.kind())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> Version {
        text.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(v("0.1").components(), &[0, 1]);
        assert_eq!(v("2.0").to_string(), "2.0");
        assert_eq!(Version::new(&[1, 2, 3]).to_string(), "1.2.3");
    }

    #[test]
    fn test_display_normalizes_leading_zeros() {
        assert_eq!(v("02.0").to_string(), "2.0");
        assert_eq!(v("2").to_string(), "2");
    }

    #[test]
    fn test_invalid_versions() {
        for text in ["", "1.", ".1", "1..2", "a.b", "1.-2", " 1", "99999999999"] {
            assert!(text.parse::<Version>().is_err(), "accepted {:?}", text);
        }
    }

    #[test]
    fn test_numeric_ordering() {
        assert!(v("1.10") > v("1.9"));
        assert!(v("999.0") > v("2.0"));
        assert!(v("0.1") < v("0.1.1"));
        assert_eq!(v("2"), v("2.0.0"));
        assert_eq!(v("2").cmp(&v("2.0")), Ordering::Equal);
    }

    #[test]
    fn test_value_is_quoted() {
        assert_eq!(v("0.1").to_node(), Node::from("0.1"));
        assert!(Version::from_node(&Node::token("0.1")).is_err());
    }

    struct Note {
        text: String,
    }

    impl SerializableObject for Note {
        fn serialize(&self, root: &mut List) -> Result<()> {
            root.append_value("text", &self.text);
            Ok(())
        }
    }

    impl DeserializableObject for Note {
        fn deserialize(root: &List) -> Result<Self> {
            Ok(Note {
                text: root.require_value("text")?,
            })
        }
    }

    fn format() -> DocumentFormat {
        DocumentFormat::new("note", Version::new(&[2, 0]))
    }

    #[test]
    fn test_document_roundtrip() {
        let text = format()
            .to_string(&Note {
                text: "hello".to_string(),
            })
            .unwrap();
        assert_eq!(text, "(note (version \"2.0\") (text \"hello\"))\n");
        let note: Note = format().from_str(&text).unwrap();
        assert_eq!(note.text, "hello");
    }

    #[test]
    fn test_control_character_rejected_on_write() {
        let err = format()
            .to_string(&Note {
                text: "a\u{1}b".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.element(), Some("note/text"));
    }

    #[test]
    fn test_older_version_accepted() {
        let note: Note = format()
            .from_str("(note (version \"0.1\") (text \"old\"))")
            .unwrap();
        assert_eq!(note.text, "old");
    }

    #[test]
    fn test_newer_version_rejected_before_body() {
        // The body is malformed too, but the version is checked first.
        let err = format()
            .from_str::<Note>("(note (version \"999.0\") (text 42))")
            .err()
            .unwrap();
        assert!(err.is_unsupported_version());
        assert_eq!(
            err,
            Error::UnsupportedVersion {
                found: "999.0".to_string(),
                supported: "2.0".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_version() {
        let err = format().from_str::<Note>("(note (text \"x\"))").err().unwrap();
        assert!(err.is_structural());
        assert_eq!(err.element(), Some("note"));
    }

    #[test]
    fn test_documented_layout_reads_version() {
        let text = concat!(
            "(symbol\n",
            " (version \"0.1\")\n",
            " (uuid 2b0b3f3e-3a4c-4b4f-9c5d-0a1b2c3d4e5f)\n",
            " (name \"Resistor\")\n",
            "\n",
            " (pin 9f1c0c52-41a2-4a51-a3c4-37b7bb0e8a1d (name \"1\") (length 2.54))\n",
            ")\n",
        );
        let node = parse(text).unwrap();
        let symbol = DocumentFormat::new("symbol", Version::new(&[0, 1]));
        assert_eq!(
            symbol.read_version(node.as_list().unwrap()).unwrap(),
            Version::new(&[0, 1])
        );
    }

    #[test]
    fn test_misplaced_version() {
        let err = format()
            .from_str::<Note>("(note (text \"x\") (version \"1.0\"))")
            .err()
            .unwrap();
        assert!(err.is_structural());
    }

    #[test]
    fn test_wrong_root_name() {
        let err = format()
            .from_str::<Note>("(symbol (version \"1.0\"))")
            .err()
            .unwrap();
        assert!(err.is_structural());
        assert!(err.to_string().contains("`note`"));
    }

    #[test]
    fn test_malformed_version_is_structural() {
        let err = format()
            .from_str::<Note>("(note (version \"two\") (text \"x\"))")
            .err()
            .unwrap();
        assert_eq!(err.element(), Some("note/version"));
    }

    #[test]
    fn test_serde_document() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Settings {
            name: String,
            grid: f64,
        }

        let settings = Settings {
            name: "default".to_string(),
            grid: 2.54,
        };
        let text = format().to_string_serde(&settings).unwrap();
        assert_eq!(
            text,
            "(note (version \"2.0\") (name \"default\") (grid 2.54))\n"
        );
        let back: Settings = format().from_str_serde(&text).unwrap();
        assert_eq!(back, settings);
    }
}
