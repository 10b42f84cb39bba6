/// Constant baking
///
/// Once an expression has been resolved its value is fixed, so it can be
/// written straight into machine code:
/// - `elf`: an x86-64 ELF relocatable exporting the value as data and as an
///   accessor function, ready to be linked into another program
/// - `jit`: the same accessor mapped into executable memory and called
mod elf;
mod jit;

pub use elf::{emit_object, write_object, GETTER_SUFFIX};
pub use jit::ConstantThunk;

/// `movabs rax, imm64; ret`
pub fn encode_constant_return(value: i64) -> Vec<u8> {
    let mut code = Vec::with_capacity(11);
    code.extend_from_slice(&[0x48, 0xb8]); // movabs rax, imm64
    code.extend_from_slice(&value.to_le_bytes());
    code.push(0xc3); // ret
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_constant_return() {
        assert_eq!(encode_constant_return(42), vec![0x48, 0xb8, 42, 0, 0, 0, 0, 0, 0, 0, 0xc3]);
        let negative = encode_constant_return(-3);
        assert_eq!(&negative[2..10], &(-3i64).to_le_bytes());
        assert_eq!(negative.len(), 11);
    }
}
