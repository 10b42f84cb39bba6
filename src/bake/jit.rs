use crate::error::BakeError;
use crate::log::targets;
use memmap2::{Mmap, MmapMut};

use super::encode_constant_return;

/// An accessor function for one constant, mapped into executable memory.
pub struct ConstantThunk {
    map: Mmap,
    value: i64,
}

impl ConstantThunk {
    pub fn compile(value: i64) -> Result<Self, BakeError> {
        if !cfg!(target_arch = "x86_64") {
            return Err(BakeError::UnsupportedTarget(std::env::consts::ARCH));
        }

        let instructions = encode_constant_return(value);
        let mut map = MmapMut::map_anon(instructions.len()).map_err(BakeError::Map)?;
        map.copy_from_slice(&instructions);
        let map = map.make_exec().map_err(BakeError::Map)?;
        log::debug!(target: targets::BAKE, "Mapped a {} byte thunk returning {}", instructions.len(), value);
        Ok(ConstantThunk { map, value })
    }

    /// The value the thunk was compiled for.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Runs the mapped code.
    pub fn call(&self) -> i64 {
        // Only x86-64 thunks are ever mapped, and their code is exactly
        // `movabs rax, imm64; ret`.
        unsafe {
            let func: extern "C" fn() -> i64 = std::mem::transmute(self.map.as_ptr());
            func()
        }
    }
}
