//! Aggregation of decoded entries into a [`ContractInterface`].
//!
//! The builder dispatches each custom section by name, decodes its entry
//! stream with the matching schema type, and folds every entry into one
//! document. Records are grouped by kind; entry, field and case collections
//! all overwrite on duplicate keys (last write wins), and multiple sections
//! of the same name merge entry-wise.

use std::collections::BTreeMap;

use crate::cursor::XdrCursor;
use crate::entries::{read_entries, ReadXdr, SectionEntries};
use crate::error::{DecodeError, ParseError, ParseWarning};
use crate::interface::{
    ContractInterface, Documented, EnumCaseValue, EnumSpec, EnumValue, EventDataFormat,
    EventParam, EventParamLocation, EventSpec, FieldSpec, FunctionInput, FunctionSpec,
    ParsedContractMeta, QualifiedName, StructSpec, UnionSpec,
};
use crate::schema::{
    ScEnvMetaEntry, ScMetaEntry, ScSpecEntry, ScSpecEventDataFormat, ScSpecEventParamLocationV0,
    ScSpecEventV0, ScSpecFunctionV0, ScSpecUdtEnumV0, ScSpecUdtErrorEnumV0, ScSpecUdtStructV0,
    ScSpecUdtUnionCaseV0, ScSpecUdtUnionV0,
};
use crate::sections::CustomSection;
use crate::type_sig::format_type;

/// Section carrying the environment interface version.
pub const ENV_META_SECTION: &str = "contractenvmetav0";
/// Section carrying free-form key/value metadata.
pub const CONTRACT_META_SECTION: &str = "contractmetav0";
/// Section carrying the interface specification entries.
pub const CONTRACT_SPEC_SECTION: &str = "contractspecv0";

/// Metadata key holding the compiler version.
const META_KEY_RUST_VERSION: &str = "rsver";
/// Metadata key holding the SDK version.
const META_KEY_SDK_VERSION: &str = "rssdkver";

/// Builds one interface document from a module's custom sections.
#[derive(Debug, Default)]
pub struct InterfaceBuilder {
    interface: ContractInterface,
    warnings: Vec<ParseWarning>,
}

impl InterfaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one custom section. Sections whose name is not one of the
    /// three metadata sections are ignored; modules routinely carry other
    /// custom sections (debug names, producer info).
    pub fn apply_section(&mut self, section: &CustomSection<'_>) -> Result<(), ParseError> {
        match section.name.as_str() {
            ENV_META_SECTION => self.apply_env_meta(section),
            CONTRACT_META_SECTION => self.apply_contract_meta(section),
            CONTRACT_SPEC_SECTION => self.apply_contract_spec(section),
            _ => Ok(()),
        }
    }

    pub fn finish(self) -> ParsedContractMeta {
        ParsedContractMeta {
            interface: self.interface,
            warnings: self.warnings,
        }
    }

    /// The environment section holds a single entry, consumed in full.
    fn apply_env_meta(&mut self, section: &CustomSection<'_>) -> Result<(), ParseError> {
        let mut cur = XdrCursor::new(section.contents);
        match ScEnvMetaEntry::read_xdr(&mut cur) {
            Ok(ScEnvMetaEntry::InterfaceVersion(version)) => {
                cur.ensure_exhausted()
                    .map_err(|e| ParseError::at_entry(0, e).with_section(&section.name))?;
                self.interface.interface_version = Some(version.to_string());
                Ok(())
            }
            Err(DecodeError::UnknownEntryKind { kind, .. }) => {
                self.warnings.push(ParseWarning::UnknownEntryKind {
                    section: section.name.clone(),
                    entry_index: 0,
                    kind,
                    skipped_bytes: section.contents.len(),
                });
                Ok(())
            }
            Err(source) => Err(ParseError::at_entry(0, source).with_section(&section.name)),
        }
    }

    fn apply_contract_meta(&mut self, section: &CustomSection<'_>) -> Result<(), ParseError> {
        let stream = read_entries::<ScMetaEntry>(section.contents)
            .map_err(|e| e.with_section(&section.name))?;
        self.note_skipped(section, &stream);
        for ScMetaEntry::MetaV0 { key, val } in stream.entries {
            match key.as_str() {
                META_KEY_RUST_VERSION => self.interface.rust_version = Some(val),
                META_KEY_SDK_VERSION => self.interface.sdk_version = Some(val),
                _ => {
                    self.interface.meta.insert(key, val);
                }
            }
        }
        Ok(())
    }

    fn apply_contract_spec(&mut self, section: &CustomSection<'_>) -> Result<(), ParseError> {
        let stream = read_entries::<ScSpecEntry>(section.contents)
            .map_err(|e| e.with_section(&section.name))?;
        self.note_skipped(section, &stream);
        for entry in stream.entries {
            match entry {
                ScSpecEntry::FunctionV0(f) => self.add_function(f),
                ScSpecEntry::UdtStructV0(s) => self.add_struct(s),
                ScSpecEntry::UdtUnionV0(u) => self.add_union(u),
                ScSpecEntry::UdtEnumV0(e) => self.add_enum(e),
                ScSpecEntry::UdtErrorEnumV0(e) => self.add_error_enum(e),
                ScSpecEntry::EventV0(e) => self.add_event(e),
            }
        }
        Ok(())
    }

    fn note_skipped<T>(&mut self, section: &CustomSection<'_>, stream: &SectionEntries<T>) {
        if let Some(tail) = stream.skipped {
            self.warnings.push(ParseWarning::UnknownEntryKind {
                section: section.name.clone(),
                entry_index: tail.entry_index,
                kind: tail.kind,
                skipped_bytes: tail.remaining,
            });
        }
    }

    fn add_function(&mut self, f: ScSpecFunctionV0) {
        let inputs = f
            .inputs
            .into_iter()
            .map(|input| {
                Documented::new(
                    FunctionInput {
                        name: input.name,
                        type_sig: format_type(&input.type_),
                    },
                    input.doc,
                )
            })
            .collect();
        let outputs = f.outputs.iter().map(format_type).collect();
        self.interface
            .functions
            .insert(f.name, Documented::new(FunctionSpec { inputs, outputs }, f.doc));
    }

    fn add_struct(&mut self, s: ScSpecUdtStructV0) {
        let mut fields = BTreeMap::new();
        for field in s.fields {
            fields.insert(
                field.name,
                Documented::new(
                    FieldSpec {
                        type_sig: format_type(&field.type_),
                    },
                    field.doc,
                ),
            );
        }
        self.interface.structs.insert(
            QualifiedName::new(s.name, s.lib).to_string(),
            Documented::new(StructSpec { fields }, s.doc),
        );
    }

    fn add_union(&mut self, u: ScSpecUdtUnionV0) {
        let mut cases = BTreeMap::new();
        for case in u.cases {
            match case {
                ScSpecUdtUnionCaseV0::VoidV0 { name, .. } => {
                    cases.insert(name, Vec::new());
                }
                ScSpecUdtUnionCaseV0::TupleV0 { name, types, .. } => {
                    cases.insert(name, types.iter().map(format_type).collect());
                }
            }
        }
        self.interface.unions.insert(
            QualifiedName::new(u.name, u.lib).to_string(),
            Documented::new(UnionSpec { cases }, u.doc),
        );
    }

    fn add_enum(&mut self, e: ScSpecUdtEnumV0) {
        let mut cases = BTreeMap::new();
        for case in e.cases {
            // bare number unless the case is documented; a wrapper with
            // empty doc is never produced
            let value = if case.doc.is_empty() {
                EnumCaseValue::Plain(case.value)
            } else {
                EnumCaseValue::Documented(Documented::new(
                    EnumValue { value: case.value },
                    case.doc,
                ))
            };
            cases.insert(case.name, value);
        }
        self.interface.enums.insert(
            QualifiedName::new(e.name, e.lib).to_string(),
            Documented::new(EnumSpec { cases }, e.doc),
        );
    }

    /// Error cases land directly in the errors collection keyed by case
    /// name; the declaring enum itself is not recorded.
    fn add_error_enum(&mut self, e: ScSpecUdtErrorEnumV0) {
        for case in e.cases {
            self.interface.errors.insert(
                case.name,
                Documented::new(EnumValue { value: case.value }, case.doc),
            );
        }
    }

    fn add_event(&mut self, e: ScSpecEventV0) {
        let params = e
            .params
            .into_iter()
            .map(|p| {
                Documented::new(
                    EventParam {
                        name: p.name,
                        type_sig: format_type(&p.type_),
                        location: match p.location {
                            ScSpecEventParamLocationV0::Data => EventParamLocation::Data,
                            ScSpecEventParamLocationV0::TopicList => EventParamLocation::Topics,
                        },
                    },
                    p.doc,
                )
            })
            .collect();
        let data_format = match e.data_format {
            ScSpecEventDataFormat::SingleValue => EventDataFormat::SingleValue,
            ScSpecEventDataFormat::Vec => EventDataFormat::Vec,
            ScSpecEventDataFormat::Map => EventDataFormat::Map,
        };
        self.interface.events.insert(
            QualifiedName::new(e.name, e.lib).to_string(),
            Documented::new(
                EventSpec {
                    prefix_topics: e.prefix_topics,
                    params,
                    data_format,
                },
                e.doc,
            ),
        );
    }
}
