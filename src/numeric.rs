/// Numeric pattern examples
///
/// `fib` dispatches on an integer value with two literal base cases; `len_sq`
/// and `ext` dispatch on the compound shape `Vec2<x, y>`.
use crate::config::ResolverConfig;
use crate::error::{FamilyError, ResolveError};
use crate::pattern::Pattern;
use crate::resolver::{Family, Registry};
use crate::symbol::Value;

pub const FIB: &str = "fib";
pub const LEN_SQ: &str = "len_sq";
pub const EXT: &str = "ext";

pub const VEC2: &str = "Vec2";
pub const VEC3: &str = "Vec3";

pub fn vec2(x: i64, y: i64) -> Value {
    Value::structure(VEC2, [Value::Int(x), Value::Int(y)])
}

pub fn vec3(x: i64, y: i64, z: i64) -> Value {
    Value::structure(VEC3, [Value::Int(x), Value::Int(y), Value::Int(z)])
}

fn int_result(family: &str, value: Value) -> Result<i64, ResolveError> {
    value.as_int().ok_or_else(|| ResolveError::TypeError(format!("{} produced {}", family, value)))
}

/// `fib(0) = 0`, `fib(1) = 1`, `fib(n) = fib(n - 1) + fib(n - 2)`.
///
/// Nothing is memoised; every call recomputes both branches.
pub fn fib_family() -> Result<Family, FamilyError> {
    Family::builder(FIB, 1)
        .rule("zero", [Pattern::Int(0)], |_, _| Ok(Value::Int(0)))
        .rule("one", [Pattern::Int(1)], |_, _| Ok(Value::Int(1)))
        .rule("n", [Pattern::int("n")], |bindings, registry| {
            let n = bindings.int("n")?;
            let overflow = || ResolveError::Overflow(format!("fib({})", n));
            let (n1, n2) = n.checked_sub(1).zip(n.checked_sub(2)).ok_or_else(overflow)?;
            let a = int_result(FIB, registry.resolve(FIB, &[Value::Int(n1)])?)?;
            let b = int_result(FIB, registry.resolve(FIB, &[Value::Int(n2)])?)?;
            a.checked_add(b).map(Value::Int).ok_or_else(overflow)
        })
        .build()
}

/// `len_sq(Vec2<x, y>) = x * x + y * y`.
pub fn len_sq_family() -> Result<Family, FamilyError> {
    Family::builder(LEN_SQ, 1)
        .rule("vec2", [Pattern::structure(VEC2, [Pattern::int("x"), Pattern::int("y")])], |bindings, _| {
            let (x, y) = (bindings.int("x")?, bindings.int("y")?);
            x.checked_mul(x)
                .zip(y.checked_mul(y))
                .and_then(|(xx, yy)| xx.checked_add(yy))
                .map(Value::Int)
                .ok_or_else(|| ResolveError::Overflow(format!("len_sq({}, {})", x, y)))
        })
        .build()
}

/// `ext(Vec2<x, y>, z) = Vec3<x, y, z>`.
pub fn ext_family() -> Result<Family, FamilyError> {
    Family::builder(EXT, 2)
        .rule("vec2", [Pattern::structure(VEC2, [Pattern::int("x"), Pattern::int("y")]), Pattern::int("z")], |bindings, _| {
            Ok(vec3(bindings.int("x")?, bindings.int("y")?, bindings.int("z")?))
        })
        .build()
}

pub fn register(registry: &mut Registry) -> Result<(), FamilyError> {
    registry.register(fib_family()?)?;
    registry.register(len_sq_family()?)?;
    registry.register(ext_family()?)
}

pub fn fib_with(registry: &Registry, n: i64) -> Result<i64, ResolveError> {
    int_result(FIB, registry.resolve(FIB, &[Value::Int(n)])?)
}

pub fn len_sq_with(registry: &Registry, x: i64, y: i64) -> Result<i64, ResolveError> {
    int_result(LEN_SQ, registry.resolve(LEN_SQ, &[vec2(x, y)])?)
}

pub fn ext_with(registry: &Registry, x: i64, y: i64, z: i64) -> Result<Value, ResolveError> {
    registry.resolve(EXT, &[vec2(x, y), Value::Int(z)])
}

/// Naive Fibonacci by value dispatch; exponential in `n`.
pub fn fib(n: i64) -> Result<i64, ResolveError> {
    fib_with(&crate::standard_registry(ResolverConfig::default())?, n)
}

pub fn len_sq(x: i64, y: i64) -> Result<i64, ResolveError> {
    len_sq_with(&crate::standard_registry(ResolverConfig::default())?, x, y)
}

pub fn ext(x: i64, y: i64, z: i64) -> Result<Value, ResolveError> {
    ext_with(&crate::standard_registry(ResolverConfig::default())?, x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        crate::standard_registry(ResolverConfig::default()).expect("standard families register")
    }

    #[test]
    fn test_fib_base_cases() {
        assert_eq!(fib(0), Ok(0));
        assert_eq!(fib(1), Ok(1));
        assert_eq!(fib(7), Ok(13));
    }

    #[test]
    fn test_fib_recurrence_up_to_30() {
        let registry = registry();
        let values: Vec<i64> = (0..=30).map(|n| fib_with(&registry, n).expect("fib resolves")).collect();
        for n in 2..=30 {
            assert_eq!(values[n], values[n - 1] + values[n - 2], "fib({})", n);
        }
        assert_eq!(values[30], 832_040);
    }

    #[test]
    fn test_fib_of_negative_hits_depth_limit() {
        let mut registry = Registry::with_config(ResolverConfig::default().with_max_depth(32));
        register(&mut registry).expect("numeric families register");
        assert_eq!(
            fib_with(&registry, -1),
            Err(ResolveError::DepthExceeded { family: FIB.to_string(), limit: 32 })
        );
    }

    #[test]
    fn test_len_sq() {
        assert_eq!(len_sq(3, 4), Ok(25));
        let registry = registry();
        for (x, y) in [(0, 0), (-3, 4), (12, -5), (1000, 1000), (-7, -7)] {
            assert_eq!(len_sq_with(&registry, x, y), Ok(x * x + y * y));
        }
        assert!(matches!(len_sq_with(&registry, i64::MAX, 1), Err(ResolveError::Overflow(_))));
    }

    #[test]
    fn test_len_sq_rejects_other_shapes() {
        let registry = registry();
        assert!(matches!(registry.resolve(LEN_SQ, &[vec3(1, 2, 3)]), Err(ResolveError::NoMatch(_, _))));
        assert!(matches!(registry.resolve(LEN_SQ, &[Value::Int(5)]), Err(ResolveError::NoMatch(_, _))));
    }

    #[test]
    fn test_ext_returns_vec3() {
        let extended = ext(1, 2, 3).expect("ext resolves");
        assert_eq!(extended, vec3(1, 2, 3));
        assert_eq!(extended.to_string(), "Vec3<1, 2, 3>");
    }
}
