use crate::error::BakeError;
use crate::log::targets;
use object::write::{Object, StandardSection, Symbol, SymbolSection};
use object::{Architecture, BinaryFormat, Endianness, SymbolFlags, SymbolKind, SymbolScope};
use std::fs;
use std::path::Path;

use super::encode_constant_return;

/// Appended to the data symbol's name to name the accessor function.
pub const GETTER_SUFFIX: &str = "_get";

fn validate_symbol(name: &str) -> Result<(), BakeError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => (first == '_' || first.is_ascii_alphabetic()) && chars.all(|c| c == '_' || c.is_ascii_alphanumeric()),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(BakeError::InvalidSymbol(name.to_string()))
    }
}

/// Builds an ELF relocatable holding `value`.
///
/// `symbol` labels 8 little-endian bytes in `.rodata`; `symbol_get` labels a
/// function in `.text` returning the same value in `rax`.
pub fn emit_object(symbol: &str, value: i64) -> Result<Vec<u8>, BakeError> {
    validate_symbol(symbol)?;

    let mut obj = Object::new(BinaryFormat::Elf, Architecture::X86_64, Endianness::Little);
    let text_section = obj.section_id(StandardSection::Text);
    let rodata_section = obj.section_id(StandardSection::ReadOnlyData);

    let data_offset = obj.append_section_data(rodata_section, &value.to_le_bytes(), 8);
    let code = encode_constant_return(value);
    let code_offset = obj.append_section_data(text_section, &code, 16);

    obj.add_symbol(Symbol {
        name: symbol.as_bytes().to_vec(),
        value: data_offset,
        size: 8,
        kind: SymbolKind::Data,
        scope: SymbolScope::Linkage,
        weak: false,
        section: SymbolSection::Section(rodata_section),
        flags: SymbolFlags::None,
    });

    obj.add_symbol(Symbol {
        name: format!("{}{}", symbol, GETTER_SUFFIX).into_bytes(),
        value: code_offset,
        size: code.len() as u64,
        kind: SymbolKind::Text,
        scope: SymbolScope::Linkage,
        weak: false,
        section: SymbolSection::Section(text_section),
        flags: SymbolFlags::None,
    });

    let bytes = obj.write()?;
    log::debug!(target: targets::BAKE, "Baked {} = {} into {} bytes of ELF", symbol, value, bytes.len());
    Ok(bytes)
}

pub fn write_object(path: &Path, symbol: &str, value: i64) -> Result<(), BakeError> {
    let bytes = emit_object(symbol, value)?;
    fs::write(path, bytes).map_err(BakeError::Io)
}
