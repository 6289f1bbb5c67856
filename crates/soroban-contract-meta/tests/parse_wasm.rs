//! End-to-end parsing of synthetic WASM modules.
//!
//! Fixtures are assembled byte by byte: WASM framing (magic, version,
//! section table) around XDR-encoded metadata entries.

use pretty_assertions::assert_eq;

use soroban_contract_meta::error::ParseWarning;
use soroban_contract_meta::interface::{EnumCaseValue, EventDataFormat};
use soroban_contract_meta::{parse_contract_metadata, DecodeError};

// WASM framing

fn push_var_u32(out: &mut Vec<u8>, mut value: u32) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            out.push(byte | 0x80);
        } else {
            out.push(byte);
            break;
        }
    }
}

fn custom_section(name: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    push_var_u32(&mut body, name.len() as u32);
    body.extend_from_slice(name.as_bytes());
    body.extend_from_slice(contents);

    let mut out = vec![0u8];
    push_var_u32(&mut out, body.len() as u32);
    out.extend(body);
    out
}

fn standard_section(kind: u8, contents: &[u8]) -> Vec<u8> {
    let mut out = vec![kind];
    push_var_u32(&mut out, contents.len() as u32);
    out.extend_from_slice(contents);
    out
}

fn module(sections: &[Vec<u8>]) -> Vec<u8> {
    let mut out = b"\0asm".to_vec();
    out.extend_from_slice(&1u32.to_le_bytes());
    for section in sections {
        out.extend_from_slice(section);
    }
    out
}

// XDR encoding

fn push_i32(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn push_str(out: &mut Vec<u8>, s: &str) {
    push_u32(out, s.len() as u32);
    out.extend_from_slice(s.as_bytes());
    out.extend(std::iter::repeat(0).take((4 - s.len() % 4) % 4));
}

fn meta_entry(key: &str, val: &str) -> Vec<u8> {
    let mut out = Vec::new();
    push_i32(&mut out, 0);
    push_str(&mut out, key);
    push_str(&mut out, val);
    out
}

fn env_entry(interface_version: u64) -> Vec<u8> {
    let mut out = Vec::new();
    push_i32(&mut out, 0);
    out.extend_from_slice(&interface_version.to_be_bytes());
    out
}

/// A function with one undocumented `i128` input named `amount` and the
/// given outputs, each output encoded as a primitive type discriminant.
fn function_entry(name: &str, doc: &str, output_kinds: &[i32]) -> Vec<u8> {
    let mut out = Vec::new();
    push_i32(&mut out, 0);
    push_str(&mut out, doc);
    push_str(&mut out, name);
    push_u32(&mut out, 1);
    push_str(&mut out, "");
    push_str(&mut out, "amount");
    push_i32(&mut out, 11); // i128
    push_u32(&mut out, output_kinds.len() as u32);
    for kind in output_kinds {
        push_i32(&mut out, *kind);
    }
    out
}

fn struct_entry(name: &str, lib: &str) -> Vec<u8> {
    let mut out = Vec::new();
    push_i32(&mut out, 1);
    push_str(&mut out, "Persistent state.");
    push_str(&mut out, lib);
    push_str(&mut out, name);
    push_u32(&mut out, 2);
    push_str(&mut out, "");
    push_str(&mut out, "count");
    push_i32(&mut out, 4); // u32
    push_str(&mut out, "Last caller.");
    push_str(&mut out, "last");
    push_i32(&mut out, 19); // Address
    out
}

fn enum_entry(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    push_i32(&mut out, 3);
    push_str(&mut out, "");
    push_str(&mut out, "");
    push_str(&mut out, name);
    push_u32(&mut out, 2);
    push_str(&mut out, "");
    push_str(&mut out, "Admin");
    push_u32(&mut out, 0);
    push_str(&mut out, "Per-user balance.");
    push_str(&mut out, "Balance");
    push_u32(&mut out, 1);
    out
}

fn error_enum_entry() -> Vec<u8> {
    let mut out = Vec::new();
    push_i32(&mut out, 4);
    push_str(&mut out, "");
    push_str(&mut out, "");
    push_str(&mut out, "Error");
    push_u32(&mut out, 1);
    push_str(&mut out, "Amount is negative.");
    push_str(&mut out, "NegativeAmount");
    push_u32(&mut out, 3);
    out
}

fn union_entry() -> Vec<u8> {
    let mut out = Vec::new();
    push_i32(&mut out, 2);
    push_str(&mut out, "");
    push_str(&mut out, "");
    push_str(&mut out, "DataKey");
    push_u32(&mut out, 2);
    push_i32(&mut out, 0); // void case
    push_str(&mut out, "");
    push_str(&mut out, "Admin");
    push_i32(&mut out, 1); // tuple case
    push_str(&mut out, "");
    push_str(&mut out, "Balance");
    push_u32(&mut out, 1);
    push_i32(&mut out, 19); // Address
    out
}

fn event_entry() -> Vec<u8> {
    let mut out = Vec::new();
    push_i32(&mut out, 5);
    push_str(&mut out, "Emitted on transfer.");
    push_str(&mut out, "");
    push_str(&mut out, "transfer");
    push_u32(&mut out, 1);
    push_str(&mut out, "transfer");
    push_u32(&mut out, 2);
    push_str(&mut out, "");
    push_str(&mut out, "from");
    push_i32(&mut out, 19); // Address
    push_i32(&mut out, 1); // topics
    push_str(&mut out, "");
    push_str(&mut out, "amount");
    push_i32(&mut out, 11); // i128
    push_i32(&mut out, 0); // data
    push_i32(&mut out, 1); // vec format
    out
}

#[test]
fn contract_meta_keys_map_to_versions_and_extras() {
    let mut contents = meta_entry("rsver", "1.75.0");
    contents.extend(meta_entry("custom", "x"));
    let wasm = module(&[custom_section("contractmetav0", &contents)]);

    let parsed = parse_contract_metadata(&wasm).unwrap();
    assert_eq!(parsed.interface.rust_version.as_deref(), Some("1.75.0"));
    assert_eq!(parsed.interface.sdk_version, None);
    assert_eq!(parsed.interface.meta.get("custom").map(String::as_str), Some("x"));
    assert_eq!(parsed.warnings, Vec::new());
}

#[test]
fn full_module_yields_every_collection() {
    let mut spec = function_entry("transfer", "Moves tokens.", &[1]);
    spec.extend(struct_entry("State", ""));
    spec.extend(union_entry());
    spec.extend(enum_entry("StorageKind"));
    spec.extend(error_enum_entry());
    spec.extend(event_entry());

    let mut meta = meta_entry("rsver", "1.75.0");
    meta.extend(meta_entry("rssdkver", "20.3.1"));

    let wasm = module(&[
        standard_section(1, &[0x60, 0x00, 0x00]),
        custom_section("contractenvmetav0", &env_entry(21 << 32)),
        custom_section("contractmetav0", &meta),
        custom_section("contractspecv0", &spec),
        standard_section(10, &[0x00]),
    ]);

    let parsed = parse_contract_metadata(&wasm).unwrap();
    let interface = &parsed.interface;

    assert_eq!(
        interface.interface_version.as_deref(),
        Some("90194313216")
    );
    assert_eq!(interface.rust_version.as_deref(), Some("1.75.0"));
    assert_eq!(interface.sdk_version.as_deref(), Some("20.3.1"));

    let transfer = &interface.functions["transfer"];
    assert_eq!(transfer.doc.as_deref(), Some("Moves tokens."));
    assert_eq!(transfer.value.inputs[0].value.name, "amount");
    assert_eq!(transfer.value.inputs[0].value.type_sig, "i128");
    assert_eq!(transfer.value.outputs, vec!["bool".to_string()]);

    let state = &interface.structs["State"];
    assert_eq!(state.value.fields["count"].value.type_sig, "u32");
    assert_eq!(state.value.fields["last"].doc.as_deref(), Some("Last caller."));

    let key = &interface.unions["DataKey"];
    assert_eq!(key.value.cases["Admin"], Vec::<String>::new());
    assert_eq!(key.value.cases["Balance"], vec!["Address".to_string()]);

    let storage = &interface.enums["StorageKind"];
    assert_eq!(storage.value.cases["Admin"], EnumCaseValue::Plain(0));
    assert!(matches!(
        storage.value.cases["Balance"],
        EnumCaseValue::Documented(_)
    ));

    assert_eq!(interface.errors["NegativeAmount"].value.value, 3);

    let transfer_event = &interface.events["transfer"];
    assert_eq!(transfer_event.doc.as_deref(), Some("Emitted on transfer."));
    assert_eq!(transfer_event.value.prefix_topics, vec!["transfer".to_string()]);
    assert_eq!(transfer_event.value.data_format, EventDataFormat::Vec);
}

#[test]
fn parsing_is_deterministic() {
    let mut spec = function_entry("hello", "", &[17]);
    spec.extend(struct_entry("State", "shared_types"));
    let wasm = module(&[
        custom_section("contractspecv0", &spec),
        custom_section("contractmetav0", &meta_entry("rsver", "1.75.0")),
    ]);

    let first = parse_contract_metadata(&wasm).unwrap();
    let second = parse_contract_metadata(&wasm).unwrap();
    assert_eq!(first, second);
}

#[test]
fn qualified_struct_names_are_keyed_with_namespace() {
    let wasm = module(&[custom_section(
        "contractspecv0",
        &struct_entry("Allowance", "token_sdk"),
    )]);
    let parsed = parse_contract_metadata(&wasm).unwrap();
    assert!(parsed.interface.structs.contains_key("Allowance:token_sdk"));
}

#[test]
fn duplicate_function_names_keep_the_later_record() {
    let mut spec = function_entry("transfer", "", &[]);
    spec.extend(function_entry("transfer", "", &[4]));
    let wasm = module(&[custom_section("contractspecv0", &spec)]);

    let parsed = parse_contract_metadata(&wasm).unwrap();
    assert_eq!(parsed.interface.functions.len(), 1);
    assert_eq!(
        parsed.interface.functions["transfer"].value.outputs,
        vec!["u32".to_string()]
    );
}

#[test]
fn same_name_sections_merge_entry_wise() {
    let wasm = module(&[
        custom_section("contractmetav0", &meta_entry("custom", "first")),
        custom_section("contractmetav0", &meta_entry("custom", "second")),
        custom_section("contractmetav0", &meta_entry("other", "kept")),
    ]);
    let parsed = parse_contract_metadata(&wasm).unwrap();
    assert_eq!(
        parsed.interface.meta.get("custom").map(String::as_str),
        Some("second")
    );
    assert_eq!(
        parsed.interface.meta.get("other").map(String::as_str),
        Some("kept")
    );
}

#[test]
fn unknown_spec_entry_kind_becomes_a_warning() {
    let mut spec = function_entry("hello", "", &[17]);
    let tail_start = spec.len();
    push_i32(&mut spec, 9); // no such entry kind
    push_u32(&mut spec, 0xffff_ffff);
    let tail_len = spec.len() - tail_start;
    let wasm = module(&[custom_section("contractspecv0", &spec)]);

    let parsed = parse_contract_metadata(&wasm).unwrap();
    assert_eq!(parsed.interface.functions.len(), 1);
    assert_eq!(
        parsed.warnings,
        vec![ParseWarning::UnknownEntryKind {
            section: "contractspecv0".to_string(),
            entry_index: 1,
            kind: 9,
            skipped_bytes: tail_len,
        }]
    );
}

#[test]
fn truncated_spec_entry_aborts_the_parse() {
    let mut spec = function_entry("hello", "", &[17]);
    spec.truncate(spec.len() - 2);
    let wasm = module(&[custom_section("contractspecv0", &spec)]);

    let err = parse_contract_metadata(&wasm).unwrap_err();
    assert_eq!(err.section.as_deref(), Some("contractspecv0"));
    assert_eq!(err.entry_index, Some(0));
    assert!(matches!(err.source, DecodeError::BufferOverrun { .. }));
}

#[test]
fn trailing_garbage_after_the_last_entry_is_rejected() {
    let mut contents = meta_entry("rsver", "1.75.0");
    contents.push(0);
    let wasm = module(&[custom_section("contractmetav0", &contents)]);

    let err = parse_contract_metadata(&wasm).unwrap_err();
    assert!(matches!(err.source, DecodeError::TrailingData { .. }));
}

#[test]
fn env_section_with_trailing_bytes_is_rejected() {
    let mut contents = env_entry(1);
    contents.extend_from_slice(&[0, 0, 0, 0]);
    let wasm = module(&[custom_section("contractenvmetav0", &contents)]);

    let err = parse_contract_metadata(&wasm).unwrap_err();
    assert_eq!(err.section.as_deref(), Some("contractenvmetav0"));
    assert!(matches!(err.source, DecodeError::TrailingData { .. }));
}

#[test]
fn document_serializes_with_flattened_metadata() {
    let mut meta = meta_entry("rsver", "1.75.0");
    meta.extend(meta_entry("custom", "x"));
    let wasm = module(&[
        custom_section("contractenvmetav0", &env_entry(3)),
        custom_section("contractmetav0", &meta),
        custom_section("contractspecv0", &function_entry("hello", "Says hello.", &[17])),
    ]);

    let parsed = parse_contract_metadata(&wasm).unwrap();
    let json = serde_json::to_value(&parsed.interface).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "interfaceVersion": "3",
            "rustVersion": "1.75.0",
            "custom": "x",
            "functions": {
                "hello": {
                    "inputs": [{"name": "amount", "type": "i128"}],
                    "outputs": ["Symbol"],
                    "doc": "Says hello.",
                },
            },
        })
    );
}

#[test]
fn non_wasm_input_fails_with_bad_magic() {
    let err = parse_contract_metadata(b"\x7fELF\x02\x01\x01\x00").unwrap_err();
    assert_eq!(err.source, DecodeError::BadMagic);
    assert_eq!(err.section, None);
}
