//! XDR schema for the contract metadata entry kinds.
//!
//! Three custom sections carry XDR-encoded entries: `contractenvmetav0`
//! ([`ScEnvMetaEntry`]), `contractmetav0` ([`ScMetaEntry`]) and
//! `contractspecv0` ([`ScSpecEntry`]). The types here mirror the Stellar
//! contract-spec XDR as closed sum types so every kind is matched
//! exhaustively at compile time; discriminants, field order and string
//! encoding follow the published schema.
//!
//! XDR wire conventions: discriminants and enum values are big-endian
//! 32-bit integers; strings are a length word, raw bytes, then zero padding
//! to the 4-byte grid; vectors are a count word followed by that many
//! elements.

use crate::cursor::XdrCursor;
use crate::entries::ReadXdr;
use crate::error::DecodeError;

fn read_string(cur: &mut XdrCursor<'_>) -> Result<String, DecodeError> {
    let offset = cur.offset();
    let len = cur.read_u32()? as usize;
    let bytes = cur.read_opaque(len)?;
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_string()),
        Err(_) => Err(DecodeError::InvalidUtf8 { offset }),
    }
}

fn read_vec<T: ReadXdr>(cur: &mut XdrCursor<'_>) -> Result<Vec<T>, DecodeError> {
    let count = cur.read_u32()?;
    let mut items = Vec::new();
    for _ in 0..count {
        items.push(T::read_xdr(cur)?);
    }
    Ok(items)
}

impl ReadXdr for String {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        read_string(cur)
    }
}

/// Environment metadata entry (`contractenvmetav0`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScEnvMetaEntry {
    /// Host interface version the contract was built against.
    InterfaceVersion(u64),
}

impl ReadXdr for ScEnvMetaEntry {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        let offset = cur.offset();
        match cur.read_i32()? {
            0 => Ok(Self::InterfaceVersion(cur.read_u64()?)),
            kind => Err(DecodeError::UnknownEntryKind { kind, offset }),
        }
    }
}

/// Free-form key/value metadata entry (`contractmetav0`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScMetaEntry {
    MetaV0 { key: String, val: String },
}

impl ReadXdr for ScMetaEntry {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        let offset = cur.offset();
        match cur.read_i32()? {
            0 => Ok(Self::MetaV0 {
                key: read_string(cur)?,
                val: read_string(cur)?,
            }),
            kind => Err(DecodeError::UnknownEntryKind { kind, offset }),
        }
    }
}

/// Recursive type descriptor for contract values.
///
/// Primitive kinds carry no payload; the parameterized kinds nest further
/// descriptors. The tree is finite by construction, bounded by the encoded
/// data, and is never mutated after decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScSpecTypeDef {
    Val,
    Bool,
    Void,
    Error,
    U32,
    I32,
    U64,
    I64,
    Timepoint,
    Duration,
    U128,
    I128,
    U256,
    I256,
    Bytes,
    String,
    Symbol,
    Address,
    MuxedAddress,
    Option(Box<ScSpecTypeDef>),
    Result {
        ok: Box<ScSpecTypeDef>,
        err: Box<ScSpecTypeDef>,
    },
    Vec(Box<ScSpecTypeDef>),
    Map {
        key: Box<ScSpecTypeDef>,
        value: Box<ScSpecTypeDef>,
    },
    Tuple(Vec<ScSpecTypeDef>),
    BytesN(u32),
    Udt(String),
}

impl ReadXdr for ScSpecTypeDef {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        let offset = cur.offset();
        let def = match cur.read_i32()? {
            0 => Self::Val,
            1 => Self::Bool,
            2 => Self::Void,
            3 => Self::Error,
            4 => Self::U32,
            5 => Self::I32,
            6 => Self::U64,
            7 => Self::I64,
            8 => Self::Timepoint,
            9 => Self::Duration,
            10 => Self::U128,
            11 => Self::I128,
            12 => Self::U256,
            13 => Self::I256,
            14 => Self::Bytes,
            16 => Self::String,
            17 => Self::Symbol,
            19 => Self::Address,
            20 => Self::MuxedAddress,
            1000 => Self::Option(Box::new(Self::read_xdr(cur)?)),
            1001 => Self::Result {
                ok: Box::new(Self::read_xdr(cur)?),
                err: Box::new(Self::read_xdr(cur)?),
            },
            1002 => Self::Vec(Box::new(Self::read_xdr(cur)?)),
            1004 => Self::Map {
                key: Box::new(Self::read_xdr(cur)?),
                value: Box::new(Self::read_xdr(cur)?),
            },
            1005 => Self::Tuple(read_vec(cur)?),
            1006 => Self::BytesN(cur.read_u32()?),
            2000 => Self::Udt(read_string(cur)?),
            value => {
                return Err(DecodeError::UnknownDiscriminant {
                    what: "type descriptor",
                    value,
                    offset,
                })
            }
        };
        Ok(def)
    }
}

/// Interface specification entry (`contractspecv0`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScSpecEntry {
    FunctionV0(ScSpecFunctionV0),
    UdtStructV0(ScSpecUdtStructV0),
    UdtUnionV0(ScSpecUdtUnionV0),
    UdtEnumV0(ScSpecUdtEnumV0),
    UdtErrorEnumV0(ScSpecUdtErrorEnumV0),
    EventV0(ScSpecEventV0),
}

impl ReadXdr for ScSpecEntry {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        let offset = cur.offset();
        match cur.read_i32()? {
            0 => Ok(Self::FunctionV0(ScSpecFunctionV0::read_xdr(cur)?)),
            1 => Ok(Self::UdtStructV0(ScSpecUdtStructV0::read_xdr(cur)?)),
            2 => Ok(Self::UdtUnionV0(ScSpecUdtUnionV0::read_xdr(cur)?)),
            3 => Ok(Self::UdtEnumV0(ScSpecUdtEnumV0::read_xdr(cur)?)),
            4 => Ok(Self::UdtErrorEnumV0(ScSpecUdtErrorEnumV0::read_xdr(cur)?)),
            5 => Ok(Self::EventV0(ScSpecEventV0::read_xdr(cur)?)),
            kind => Err(DecodeError::UnknownEntryKind { kind, offset }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScSpecFunctionInputV0 {
    pub doc: String,
    pub name: String,
    pub type_: ScSpecTypeDef,
}

impl ReadXdr for ScSpecFunctionInputV0 {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            doc: read_string(cur)?,
            name: read_string(cur)?,
            type_: ScSpecTypeDef::read_xdr(cur)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScSpecFunctionV0 {
    pub doc: String,
    pub name: String,
    pub inputs: Vec<ScSpecFunctionInputV0>,
    pub outputs: Vec<ScSpecTypeDef>,
}

impl ReadXdr for ScSpecFunctionV0 {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            doc: read_string(cur)?,
            name: read_string(cur)?,
            inputs: read_vec(cur)?,
            outputs: read_vec(cur)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScSpecUdtStructFieldV0 {
    pub doc: String,
    pub name: String,
    pub type_: ScSpecTypeDef,
}

impl ReadXdr for ScSpecUdtStructFieldV0 {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            doc: read_string(cur)?,
            name: read_string(cur)?,
            type_: ScSpecTypeDef::read_xdr(cur)?,
        })
    }
}

/// User-defined struct declaration. `lib` names the defining library and is
/// empty for types declared by the contract itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScSpecUdtStructV0 {
    pub doc: String,
    pub lib: String,
    pub name: String,
    pub fields: Vec<ScSpecUdtStructFieldV0>,
}

impl ReadXdr for ScSpecUdtStructV0 {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            doc: read_string(cur)?,
            lib: read_string(cur)?,
            name: read_string(cur)?,
            fields: read_vec(cur)?,
        })
    }
}

/// One arm of a user-defined union: either a unit case or a tuple of types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScSpecUdtUnionCaseV0 {
    VoidV0 {
        doc: String,
        name: String,
    },
    TupleV0 {
        doc: String,
        name: String,
        types: Vec<ScSpecTypeDef>,
    },
}

impl ReadXdr for ScSpecUdtUnionCaseV0 {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        let offset = cur.offset();
        match cur.read_i32()? {
            0 => Ok(Self::VoidV0 {
                doc: read_string(cur)?,
                name: read_string(cur)?,
            }),
            1 => Ok(Self::TupleV0 {
                doc: read_string(cur)?,
                name: read_string(cur)?,
                types: read_vec(cur)?,
            }),
            value => Err(DecodeError::UnknownDiscriminant {
                what: "union case",
                value,
                offset,
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScSpecUdtUnionV0 {
    pub doc: String,
    pub lib: String,
    pub name: String,
    pub cases: Vec<ScSpecUdtUnionCaseV0>,
}

impl ReadXdr for ScSpecUdtUnionV0 {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            doc: read_string(cur)?,
            lib: read_string(cur)?,
            name: read_string(cur)?,
            cases: read_vec(cur)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScSpecUdtEnumCaseV0 {
    pub doc: String,
    pub name: String,
    pub value: u32,
}

impl ReadXdr for ScSpecUdtEnumCaseV0 {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            doc: read_string(cur)?,
            name: read_string(cur)?,
            value: cur.read_u32()?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScSpecUdtEnumV0 {
    pub doc: String,
    pub lib: String,
    pub name: String,
    pub cases: Vec<ScSpecUdtEnumCaseV0>,
}

impl ReadXdr for ScSpecUdtEnumV0 {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            doc: read_string(cur)?,
            lib: read_string(cur)?,
            name: read_string(cur)?,
            cases: read_vec(cur)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScSpecUdtErrorEnumCaseV0 {
    pub doc: String,
    pub name: String,
    pub value: u32,
}

impl ReadXdr for ScSpecUdtErrorEnumCaseV0 {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            doc: read_string(cur)?,
            name: read_string(cur)?,
            value: cur.read_u32()?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScSpecUdtErrorEnumV0 {
    pub doc: String,
    pub lib: String,
    pub name: String,
    pub cases: Vec<ScSpecUdtErrorEnumCaseV0>,
}

impl ReadXdr for ScSpecUdtErrorEnumV0 {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            doc: read_string(cur)?,
            lib: read_string(cur)?,
            name: read_string(cur)?,
            cases: read_vec(cur)?,
        })
    }
}

/// Where an event parameter is carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScSpecEventParamLocationV0 {
    Data,
    TopicList,
}

impl ReadXdr for ScSpecEventParamLocationV0 {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        let offset = cur.offset();
        match cur.read_i32()? {
            0 => Ok(Self::Data),
            1 => Ok(Self::TopicList),
            value => Err(DecodeError::UnknownDiscriminant {
                what: "event param location",
                value,
                offset,
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScSpecEventParamV0 {
    pub doc: String,
    pub name: String,
    pub type_: ScSpecTypeDef,
    pub location: ScSpecEventParamLocationV0,
}

impl ReadXdr for ScSpecEventParamV0 {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            doc: read_string(cur)?,
            name: read_string(cur)?,
            type_: ScSpecTypeDef::read_xdr(cur)?,
            location: ScSpecEventParamLocationV0::read_xdr(cur)?,
        })
    }
}

/// How an event's data payload is shaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScSpecEventDataFormat {
    SingleValue,
    Vec,
    Map,
}

impl ReadXdr for ScSpecEventDataFormat {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        let offset = cur.offset();
        match cur.read_i32()? {
            0 => Ok(Self::SingleValue),
            1 => Ok(Self::Vec),
            2 => Ok(Self::Map),
            value => Err(DecodeError::UnknownDiscriminant {
                what: "event data format",
                value,
                offset,
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScSpecEventV0 {
    pub doc: String,
    pub lib: String,
    pub name: String,
    pub prefix_topics: Vec<String>,
    pub params: Vec<ScSpecEventParamV0>,
    pub data_format: ScSpecEventDataFormat,
}

impl ReadXdr for ScSpecEventV0 {
    fn read_xdr(cur: &mut XdrCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            doc: read_string(cur)?,
            lib: read_string(cur)?,
            name: read_string(cur)?,
            prefix_topics: read_vec(cur)?,
            params: read_vec(cur)?,
            data_format: ScSpecEventDataFormat::read_xdr(cur)?,
        })
    }
}
