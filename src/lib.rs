//! Symbolic computation by pattern dispatch.
//!
//! Families of shape-pattern rules are resolved by specificity, literal
//! positions beating free ones, and a small functional toolkit is built on
//! top: `Cons`/`Nil` lists, `map` and `foldl`, a character lexer and a
//! four-operator calculator. Resolved values can be baked into machine code.
pub mod bake;
pub mod calculator;
pub mod combinators;
pub mod config;
pub mod error;
pub mod lexer;
mod log;
pub mod numeric;
pub mod pattern;
pub mod resolver;
pub mod symbol;

pub use calculator::evaluate;
pub use combinators::{foldl, map};
pub use config::ResolverConfig;
pub use error::{BakeError, FamilyError, ResolveError};
pub use lexer::{lex_to_list, show_list};
pub use numeric::{ext, fib, len_sq};
pub use pattern::{Bindings, Pattern};
pub use resolver::{Family, Registry};
pub use symbol::{List, Value};

/// A registry holding every family the crate defines: `add`, `add_two`, the
/// calculator's families, `fib`, `len_sq` and `ext`.
pub fn standard_registry(config: ResolverConfig) -> Result<Registry, FamilyError> {
    let mut registry = Registry::with_config(config);
    combinators::register(&mut registry)?;
    calculator::register(&mut registry)?;
    numeric::register(&mut registry)?;
    Ok(registry)
}
