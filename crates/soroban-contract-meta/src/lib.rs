//! Soroban contract metadata parser.
//!
//! Extracts the structured interface of a compiled Soroban contract
//! (functions, data types, events, documentation, toolchain versions) from
//! the custom metadata sections of its WASM binary.
//!
//! # Architecture
//!
//! The parsing pipeline has four stages:
//!
//! 1. **Section scanning** ([`sections`]) — walks the module's section
//!    table and isolates the named custom sections.
//! 2. **Entry streams** ([`entries`], [`cursor`]) — drains each metadata
//!    section's back-to-back XDR entries with an alignment-aware cursor;
//!    exact buffer exhaustion terminates a stream.
//! 3. **Schema decoding** ([`schema`]) — decodes the three known entry
//!    kinds (environment version, key/value metadata, interface spec) into
//!    typed records.
//! 4. **Aggregation** ([`aggregate`], [`type_sig`]) — renders type
//!    signatures and folds the records into one [`ContractInterface`]
//!    document, collecting non-fatal warnings alongside.
//!
//! Parsing is synchronous, deterministic and idempotent: identical input
//! bytes always yield a structurally identical document. The input buffer
//! is borrowed, never copied or mutated.
//!
//! ```no_run
//! let wasm = std::fs::read("contract.wasm").unwrap();
//! let parsed = soroban_contract_meta::parse_contract_metadata(&wasm).unwrap();
//! for (name, function) in &parsed.interface.functions {
//!     println!("{name}: {} inputs", function.value.inputs.len());
//! }
//! ```

pub mod aggregate;
pub mod cursor;
pub mod entries;
pub mod error;
pub mod interface;
pub mod schema;
pub mod sections;
pub mod type_sig;

pub use crate::aggregate::InterfaceBuilder;
pub use crate::error::{DecodeError, ParseError, ParseWarning};
pub use crate::interface::{ContractInterface, ParsedContractMeta};
pub use crate::sections::{read_custom_sections, CustomSection};

/// Parse the contract interface document from a compiled WASM binary.
///
/// The first fatal error aborts the whole parse; forward-compatibility
/// conditions (unknown entry kinds) are returned as warnings instead.
pub fn parse_contract_metadata(wasm: &[u8]) -> Result<ParsedContractMeta, ParseError> {
    let sections = read_custom_sections(wasm).map_err(ParseError::module)?;
    let mut builder = InterfaceBuilder::new();
    for section in &sections {
        builder.apply_section(section)?;
    }
    Ok(builder.finish())
}
