//! The parsed contract interface document.
//!
//! These types are the structural contract consumers depend on: plain data,
//! serializable to the JSON shape tooling expects (camelCase keys, doc
//! strings omitted when absent, extra metadata flattened to the top level).
//! Collections are `BTreeMap`s so iteration and serialization order are
//! deterministic for identical input bytes.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::ParseWarning;

/// A value with its optional documentation string.
///
/// Absent documentation is `None`, never an empty string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Documented<T> {
    #[serde(flatten)]
    pub value: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl<T> Documented<T> {
    /// Wrap `value`, keeping `doc` only when non-empty.
    pub fn new(value: T, doc: String) -> Self {
        Self {
            value,
            doc: if doc.is_empty() { None } else { Some(doc) },
        }
    }
}

/// A declaration name, optionally qualified by the library that defines it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct QualifiedName {
    pub name: String,
    pub namespace: Option<String>,
}

impl QualifiedName {
    /// Treats an empty `namespace` as absent.
    pub fn new(name: String, namespace: String) -> Self {
        Self {
            name,
            namespace: if namespace.is_empty() {
                None
            } else {
                Some(namespace)
            },
        }
    }
}

impl fmt::Display for QualifiedName {
    /// Canonical form: `name`, or `name:namespace` when qualified.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{}:{}", self.name, namespace),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A function parameter with its rendered type signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunctionInput {
    pub name: String,
    #[serde(rename = "type")]
    pub type_sig: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunctionSpec {
    pub inputs: Vec<Documented<FunctionInput>>,
    pub outputs: Vec<String>,
}

/// A struct field's rendered type signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub type_sig: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StructSpec {
    pub fields: BTreeMap<String, Documented<FieldSpec>>,
}

/// Union cases map a case name to the case's tuple of type signatures; a
/// unit case maps to an empty list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnionSpec {
    pub cases: BTreeMap<String, Vec<String>>,
}

/// A numeric case value, used for enum and error-enum cases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    pub value: u32,
}

/// An enum case: a bare number, or a documented value when the declaration
/// carries a doc string. A wrapper with empty documentation never occurs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EnumCaseValue {
    Plain(u32),
    Documented(Documented<EnumValue>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnumSpec {
    pub cases: BTreeMap<String, EnumCaseValue>,
}

/// Where an event parameter is carried in the emitted event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventParamLocation {
    Data,
    Topics,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EventParam {
    pub name: String,
    #[serde(rename = "type")]
    pub type_sig: String,
    pub location: EventParamLocation,
}

/// Shape of an event's data payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EventDataFormat {
    SingleValue,
    Vec,
    Map,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSpec {
    pub prefix_topics: Vec<String>,
    pub params: Vec<Documented<EventParam>>,
    pub data_format: EventDataFormat,
}

/// The aggregate interface document extracted from one module.
///
/// Functions are keyed by plain name; structs, unions, enums and events by
/// the canonical text of their qualified name. Error cases are keyed by
/// case name, flattened across error-enum declarations. Inserting a second
/// record under an existing key overwrites the first; uniqueness is a
/// caller concern.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInterface {
    /// Host interface version from `contractenvmetav0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_version: Option<String>,
    /// Compiler version recorded under the `rsver` metadata key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rust_version: Option<String>,
    /// SDK version recorded under the `rssdkver` metadata key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk_version: Option<String>,
    /// Remaining free-form metadata keys, last write winning.
    #[serde(flatten)]
    pub meta: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub functions: BTreeMap<String, Documented<FunctionSpec>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub structs: BTreeMap<String, Documented<StructSpec>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub unions: BTreeMap<String, Documented<UnionSpec>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub enums: BTreeMap<String, Documented<EnumSpec>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Documented<EnumValue>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub events: BTreeMap<String, Documented<EventSpec>>,
}

/// A parse result: the document plus the non-fatal diagnostics collected
/// while producing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedContractMeta {
    pub interface: ContractInterface,
    pub warnings: Vec<ParseWarning>,
}
