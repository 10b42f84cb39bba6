/// Higher-order combinators over `Cons`/`Nil` lists
///
/// The element function is a dispatch family resolved through the
/// [`Registry`], so `map(add_two, xs)` applies whichever `add_two` rule
/// matches each element. Both combinators walk the list with a loop rather
/// than recursion.
use crate::error::{FamilyError, ResolveError};
use crate::log::targets;
use crate::pattern::Pattern;
use crate::resolver::{Family, Registry};
use crate::symbol::{List, Value};

pub const ADD: &str = "add";
pub const ADD_TWO: &str = "add_two";

/// `map(f, Nil) = Nil`, `map(f, Cons(x, xs)) = Cons(f(x), map(f, xs))`.
pub fn map(registry: &Registry, f: &str, list: &List) -> Result<List, ResolveError> {
    let mapped = list.iter().map(|item| registry.resolve(f, std::slice::from_ref(item))).collect::<Result<Vec<_>, _>>()?;
    log::trace!(target: targets::FOLD, "map {} over {} elements", f, mapped.len());
    Ok(mapped.into_iter().collect())
}

/// `foldl(acc, f, Nil) = acc`, `foldl(acc, f, Cons(x, xs)) = foldl(f(acc, x), f, xs)`.
pub fn foldl(registry: &Registry, acc: Value, f: &str, list: &List) -> Result<Value, ResolveError> {
    list.iter().try_fold(acc, |acc, item| {
        let next = registry.resolve(f, &[acc, item.clone()])?;
        log::trace!(target: targets::FOLD, "{} {} -> {}", f, item, next);
        Ok(next)
    })
}

/// `add(x, y) = x + y` over integer atoms.
pub fn add_family() -> Result<Family, FamilyError> {
    Family::builder(ADD, 2)
        .rule("ints", [Pattern::int("x"), Pattern::int("y")], |bindings, _| {
            let (x, y) = (bindings.int("x")?, bindings.int("y")?);
            x.checked_add(y).map(Value::Int).ok_or_else(|| ResolveError::Overflow(format!("{} + {}", x, y)))
        })
        .build()
}

/// `add_two(x) = add(x, 2)`.
pub fn add_two_family() -> Result<Family, FamilyError> {
    Family::builder(ADD_TWO, 1)
        .rule("int", [Pattern::int("x")], |bindings, registry| {
            registry.resolve(ADD, &[bindings.value("x")?.clone(), Value::Int(2)])
        })
        .build()
}

pub fn register(registry: &mut Registry) -> Result<(), FamilyError> {
    registry.register(add_family()?)?;
    registry.register(add_two_family()?)
}
