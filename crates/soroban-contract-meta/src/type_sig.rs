//! Canonical textual signatures for contract types.
//!
//! One fixed rendering convention, chosen for interoperability with
//! consumers of the produced document: generic wrappers are capitalized
//! (`Option<...>`, `Vec<...>`, `Map<...>`, `Result<...>`, `BytesN<n>`),
//! the integer and boolean primitives render lower-case, and every other
//! primitive keeps its name as is. User-defined type names pass through
//! verbatim; namespaces belong to top-level declarations, not to type
//! references.

use crate::schema::ScSpecTypeDef;

/// Render a type descriptor as its canonical signature.
///
/// Pure and recursive; the descriptor is never mutated.
pub fn format_type(def: &ScSpecTypeDef) -> String {
    use crate::schema::ScSpecTypeDef as T;

    let name = match def {
        T::Val => "Val",
        T::Bool => "bool",
        T::Void => "Void",
        T::Error => "Error",
        T::U32 => "u32",
        T::I32 => "i32",
        T::U64 => "u64",
        T::I64 => "i64",
        T::Timepoint => "Timepoint",
        T::Duration => "Duration",
        T::U128 => "u128",
        T::I128 => "i128",
        // only the 8..128-bit integer family is lowered; the 256-bit
        // integers keep their spelling
        T::U256 => "U256",
        T::I256 => "I256",
        T::Bytes => "Bytes",
        T::String => "String",
        T::Symbol => "Symbol",
        T::Address => "Address",
        T::MuxedAddress => "MuxedAddress",
        T::Option(inner) => return format!("Option<{}>", format_type(inner)),
        T::Result { ok, err } => {
            return format!("Result<{}, {}>", format_type(ok), format_type(err))
        }
        T::Vec(element) => return format!("Vec<{}>", format_type(element)),
        T::Map { key, value } => {
            return format!("Map<{}, {}>", format_type(key), format_type(value))
        }
        T::Tuple(elements) => {
            let parts: Vec<String> = elements.iter().map(format_type).collect();
            return format!("({})", parts.join(", "));
        }
        T::BytesN(n) => return format!("BytesN<{n}>"),
        T::Udt(name) => return name.clone(),
    };
    name.to_string()
}
