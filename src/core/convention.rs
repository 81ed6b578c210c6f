//! Naming convention table.
//!
//! A [`Convention`] lists the namespaces a SOFA file is addressed by, the
//! separator used to build stored keys, the fields each namespace is known
//! to have, and the root attributes the convention requires. It is an
//! immutable value embedded in each opened file; nothing here is global.
//!
//! Key construction is plain concatenation:
//!
//! ```text
//! Listener + "" + Position     -> ListenerPosition
//! Data     + "." + SamplingRate -> Data.SamplingRate
//! ```

/// Role of a namespace, selects the typed view and datatype gating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NamespaceKind {
    /// Listener, Receiver, Source, Emitter
    AudioObject,
    /// Measurement data, gated on the `DataType` root attribute
    Data,
    /// Room description
    Room,
    /// Anything else; resolved generically
    Other,
}

/// One registered namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceSpec {
    /// Prefix of every stored key in this namespace
    pub name: &'static str,
    /// Inserted between prefix and field name
    pub separator: &'static str,
    pub kind: NamespaceKind,
    /// Fields the convention defines; lookups are not limited to these
    pub fields: &'static [&'static str],
}

impl NamespaceSpec {
    /// Stored key of `field` in this namespace.
    pub fn key(&self, field: &str) -> String {
        concat_key(self.name, self.separator, field)
    }
}

const AUDIO_OBJECT_FIELDS: &[&str] = &["Position", "View", "Up", "Description"];
const DATA_FIELDS: &[&str] = &["IR", "Delay", "SamplingRate"];
const ROOM_FIELDS: &[&str] = &["Type", "Description", "Location", "CornerA", "CornerB"];

/// Root attributes every SOFA file must carry.
pub const REQUIRED_GLOBALS: &[&str] = &[
    "Conventions",
    "Version",
    "SOFAConventions",
    "SOFAConventionsVersion",
    "DataType",
    "RoomType",
    "Title",
    "DateCreated",
    "DateModified",
    "APIName",
    "APIVersion",
    "AuthorContact",
    "Organization",
    "License",
];

/// Root attributes a SOFA file may carry.
pub const OPTIONAL_GLOBALS: &[&str] = &[
    "ApplicationName",
    "ApplicationVersion",
    "Comment",
    "History",
    "References",
    "Origin",
];

/// Root attribute selecting the representation of the `Data` namespace.
pub const DATATYPE_ATTRIBUTE: &str = "DataType";

/// Naming convention of a SOFA file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Convention {
    name: &'static str,
    namespaces: Vec<NamespaceSpec>,
    required_globals: &'static [&'static str],
    optional_globals: &'static [&'static str],
    supported_datatypes: Vec<&'static str>,
}

impl Convention {
    /// The SOFA naming convention with FIR data support.
    pub fn sofa() -> Self {
        let audio = |name: &'static str| NamespaceSpec {
            name,
            separator: "",
            kind: NamespaceKind::AudioObject,
            fields: AUDIO_OBJECT_FIELDS,
        };
        Self {
            name: "SOFA",
            namespaces: vec![
                audio("Listener"),
                audio("Receiver"),
                audio("Source"),
                audio("Emitter"),
                NamespaceSpec {
                    name: "Room",
                    separator: "",
                    kind: NamespaceKind::Room,
                    fields: ROOM_FIELDS,
                },
                NamespaceSpec {
                    name: "Data",
                    separator: ".",
                    kind: NamespaceKind::Data,
                    fields: DATA_FIELDS,
                },
            ],
            required_globals: REQUIRED_GLOBALS,
            optional_globals: OPTIONAL_GLOBALS,
            supported_datatypes: vec!["FIR"],
        }
    }

    /// Convention name.
    pub fn name(&self) -> &str {
        self.name
    }

    /// All registered namespaces, in registration order.
    pub fn namespaces(&self) -> &[NamespaceSpec] {
        &self.namespaces
    }

    /// Look up a registered namespace by exact name.
    pub fn namespace(&self, name: &str) -> Option<&NamespaceSpec> {
        self.namespaces.iter().find(|ns| ns.name == name)
    }

    /// Kind of a namespace; unregistered names are [`NamespaceKind::Other`].
    pub fn kind_of(&self, namespace: &str) -> NamespaceKind {
        self.namespace(namespace)
            .map(|ns| ns.kind)
            .unwrap_or(NamespaceKind::Other)
    }

    /// Separator of a namespace; unregistered names use plain concatenation.
    pub fn separator_of(&self, namespace: &str) -> &'static str {
        self.namespace(namespace).map(|ns| ns.separator).unwrap_or("")
    }

    /// Stored key for `namespace.field`.
    pub fn key(&self, namespace: &str, field: &str) -> String {
        concat_key(namespace, self.separator_of(namespace), field)
    }

    /// Root attributes the convention requires.
    pub fn required_globals(&self) -> &[&'static str] {
        self.required_globals
    }

    /// Root attributes the convention allows but does not require.
    pub fn optional_globals(&self) -> &[&'static str] {
        self.optional_globals
    }

    /// Check if a `DataType` value can be decoded.
    pub fn supports_datatype(&self, datatype: &str) -> bool {
        self.supported_datatypes.iter().any(|d| *d == datatype)
    }

    /// Register a namespace, replacing one with the same name.
    pub fn with_namespace(mut self, spec: NamespaceSpec) -> Self {
        match self.namespaces.iter_mut().find(|ns| ns.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.namespaces.push(spec),
        }
        self
    }

    /// Accept an additional `DataType` value.
    pub fn with_datatype(mut self, datatype: &'static str) -> Self {
        if !self.supports_datatype(datatype) {
            self.supported_datatypes.push(datatype);
        }
        self
    }
}

impl Default for Convention {
    fn default() -> Self {
        Self::sofa()
    }
}

fn concat_key(namespace: &str, separator: &str, field: &str) -> String {
    let mut key = String::with_capacity(namespace.len() + separator.len() + field.len());
    key.push_str(namespace);
    key.push_str(separator);
    key.push_str(field);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sofa_keys() {
        let c = Convention::sofa();
        assert_eq!(c.key("Listener", "Description"), "ListenerDescription");
        assert_eq!(c.key("Receiver", "Position"), "ReceiverPosition");
        assert_eq!(c.key("Room", "Type"), "RoomType");
        assert_eq!(c.key("Data", "SamplingRate"), "Data.SamplingRate");
    }

    #[test]
    fn test_unregistered_namespace_concatenates() {
        let c = Convention::sofa();
        assert!(c.namespace("Mic").is_none());
        assert_eq!(c.kind_of("Mic"), NamespaceKind::Other);
        assert_eq!(c.key("Mic", "Gain"), "MicGain");
    }

    #[test]
    fn test_no_case_normalization() {
        let c = Convention::sofa();
        assert!(c.namespace("listener").is_none());
        assert_eq!(c.key("data", "IR"), "dataIR");
    }

    #[test]
    fn test_datatypes() {
        let c = Convention::sofa();
        assert!(c.supports_datatype("FIR"));
        assert!(!c.supports_datatype("TF"));
        assert!(!c.supports_datatype("fir"));
        let c = c.with_datatype("FIR-E");
        assert!(c.supports_datatype("FIR-E"));
    }

    #[test]
    fn test_with_namespace_replaces() {
        let c = Convention::sofa().with_namespace(NamespaceSpec {
            name: "Data",
            separator: "_",
            kind: NamespaceKind::Data,
            fields: &["IR"],
        });
        assert_eq!(c.key("Data", "IR"), "Data_IR");
        assert_eq!(c.namespaces().len(), 6);
    }

    #[test]
    fn test_globals() {
        let c = Convention::default();
        assert_eq!(c.required_globals().len(), 14);
        assert!(c.required_globals().contains(&"DataType"));
        assert!(c.optional_globals().contains(&"Comment"));
    }
}
