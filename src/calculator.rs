/// Four-operator calculator
///
/// The input is lexed into a list of character atoms and folded from the
/// accumulator `(0, '+')`. Each character goes through the `calc.step`
/// family:
/// - a digit applies the pending operator to the running value, then resets
///   the pending operator to `'+'`
/// - one of `+ - * /` becomes the pending operator
/// - anything else is ignored
///
/// There is no precedence and no multi-digit number: `"1 + 2 * 3"` is `9`
/// and `"12"` is `1 + 2`.
use crate::combinators::foldl;
use crate::config::ResolverConfig;
use crate::error::{FamilyError, ResolveError};
use crate::lexer::lex_to_list;
use crate::log::targets;
use crate::pattern::{Bindings, Pattern};
use crate::resolver::{Family, Registry};
use crate::symbol::Value;

pub const APPLY: &str = "calc.apply";
pub const TO_DIGIT: &str = "calc.to_digit";
pub const STEP: &str = "calc.step";
pub const RESULT: &str = "calc.result";

pub const OPERATORS: &str = "+-*/";

pub fn accumulator(value: i64, pending: char) -> Value {
    Value::tuple([Value::Int(value), Value::Char(pending)])
}

fn accumulator_pattern() -> Pattern {
    Pattern::tuple([Pattern::int("value"), Pattern::char("op")])
}

fn operands(bindings: &Bindings) -> Result<(i64, i64), ResolveError> {
    Ok((bindings.int("l")?, bindings.int("r")?))
}

fn overflow(l: i64, op: char, r: i64) -> ResolveError {
    ResolveError::Overflow(format!("{} {} {}", l, op, r))
}

/// One rule per operator symbol: `apply(l, op, r)`.
pub fn apply_family() -> Result<Family, FamilyError> {
    let shape = |op| [Pattern::int("l"), Pattern::Char(op), Pattern::int("r")];
    Family::builder(APPLY, 3)
        .rule("add", shape('+'), |bindings, _| {
            let (l, r) = operands(bindings)?;
            l.checked_add(r).map(Value::Int).ok_or_else(|| overflow(l, '+', r))
        })
        .rule("sub", shape('-'), |bindings, _| {
            let (l, r) = operands(bindings)?;
            l.checked_sub(r).map(Value::Int).ok_or_else(|| overflow(l, '-', r))
        })
        .rule("mul", shape('*'), |bindings, _| {
            let (l, r) = operands(bindings)?;
            l.checked_mul(r).map(Value::Int).ok_or_else(|| overflow(l, '*', r))
        })
        .rule("div", shape('/'), |bindings, _| {
            let (l, r) = operands(bindings)?;
            if r == 0 {
                return Err(ResolveError::DivisionByZero);
            }
            // Truncates toward zero.
            l.checked_div(r).map(Value::Int).ok_or_else(|| overflow(l, '/', r))
        })
        .build()
}

/// `to_digit('0'..='9') = c - '0'`.
pub fn to_digit_family() -> Result<Family, FamilyError> {
    Family::builder(TO_DIGIT, 1)
        .rule("digit", [Pattern::digit().named("c")], |bindings, _| {
            let c = bindings.char("c")?;
            Ok(Value::Int(c as i64 - '0' as i64))
        })
        .build()
}

/// The per-character transition: `step((value, op), c)`.
pub fn step_family() -> Result<Family, FamilyError> {
    Family::builder(STEP, 2)
        .rule("digit", [accumulator_pattern(), Pattern::digit().named("c")], |bindings, registry| {
            let digit = registry.resolve(TO_DIGIT, &[bindings.value("c")?.clone()])?;
            let applied = registry.resolve(APPLY, &[bindings.value("value")?.clone(), bindings.value("op")?.clone(), digit])?;
            Ok(Value::tuple([applied, Value::Char('+')]))
        })
        .rule("operator", [accumulator_pattern(), Pattern::one_of(OPERATORS).named("c")], |bindings, _| {
            Ok(accumulator(bindings.int("value")?, bindings.char("c")?))
        })
        .rule("ignore", [accumulator_pattern(), Pattern::char("c")], |bindings, _| {
            Ok(accumulator(bindings.int("value")?, bindings.char("op")?))
        })
        .build()
}

/// Projects the running value out of the final accumulator.
pub fn result_family() -> Result<Family, FamilyError> {
    Family::builder(RESULT, 1)
        .rule("value", [Pattern::tuple([Pattern::int("value"), Pattern::Any])], |bindings, _| {
            Ok(Value::Int(bindings.int("value")?))
        })
        .build()
}

pub fn register(registry: &mut Registry) -> Result<(), FamilyError> {
    registry.register(apply_family()?)?;
    registry.register(to_digit_family()?)?;
    registry.register(step_family()?)?;
    registry.register(result_family()?)
}

/// Evaluates `expression` with the families already in `registry`.
pub fn evaluate_with(registry: &Registry, expression: &str) -> Result<i64, ResolveError> {
    let symbols = lex_to_list(expression);
    let folded = foldl(registry, accumulator(0, '+'), STEP, &symbols)?;
    let result = registry.resolve(RESULT, &[folded])?;
    log::debug!(target: targets::CALCULATOR, "{:?} = {}", expression, result);
    result.as_int().ok_or_else(|| ResolveError::TypeError(format!("calculator produced {}", result)))
}

/// Evaluates `expression` strictly left to right.
pub fn evaluate(expression: &str) -> Result<i64, ResolveError> {
    let registry = crate::standard_registry(ResolverConfig::default())?;
    evaluate_with(&registry, expression)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        crate::standard_registry(ResolverConfig::default()).expect("standard families register")
    }

    #[test]
    fn test_worked_example() {
        assert_eq!(evaluate("1 + 2 * 3 / 4 - 5"), Ok(-3));
    }

    #[test]
    fn test_literal_scenarios() {
        assert_eq!(evaluate(""), Ok(0));
        assert_eq!(evaluate("7"), Ok(7));
        assert_eq!(evaluate("9 / 2"), Ok(4));
        assert_eq!(evaluate("1+2+3"), Ok(6));
    }

    #[test]
    fn test_strictly_left_to_right() {
        assert_eq!(evaluate("1 + 2 * 3"), Ok(9));
        assert_eq!(evaluate("2 - 5"), Ok(-3));
        assert_eq!(evaluate("0 - 7 / 2"), Ok(-3));
    }

    #[test]
    fn test_single_digit_numbers() {
        // Each digit is folded on its own with the placeholder '+'.
        assert_eq!(evaluate("12"), Ok(3));
        assert_eq!(evaluate("2*34"), Ok(10));
    }

    #[test]
    fn test_unrecognised_characters_are_ignored() {
        assert_eq!(evaluate("x = 4 ? 2 !"), Ok(6));
        assert_eq!(evaluate("(3) * [3]"), Ok(9));
        assert_eq!(evaluate("hello"), Ok(0));
    }

    #[test]
    fn test_last_operator_wins() {
        assert_eq!(evaluate("8 +-* 2"), Ok(16));
        assert_eq!(evaluate("5 -"), Ok(5));
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        assert_eq!(evaluate("4 / 0"), Err(ResolveError::DivisionByZero));
        assert_eq!(evaluate("0 / 0 + 1"), Err(ResolveError::DivisionByZero));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let expression = format!("9{}", "*9".repeat(30));
        assert!(matches!(evaluate(&expression), Err(ResolveError::Overflow(_))));
    }

    #[test]
    fn test_idempotent() {
        let registry = registry();
        let first = evaluate_with(&registry, "1 + 2 * 3 / 4 - 5");
        for _ in 0..10 {
            assert_eq!(evaluate_with(&registry, "1 + 2 * 3 / 4 - 5"), first);
        }
        assert_eq!(evaluate("6 / 3"), evaluate("6 / 3"));
    }

    #[test]
    fn test_step_rules() {
        let registry = registry();
        assert_eq!(registry.resolve(STEP, &[accumulator(3, '*'), Value::Char('3')]), Ok(accumulator(9, '+')));
        assert_eq!(registry.resolve(STEP, &[accumulator(9, '+'), Value::Char('/')]), Ok(accumulator(9, '/')));
        assert_eq!(registry.resolve(STEP, &[accumulator(9, '/'), Value::Char(' ')]), Ok(accumulator(9, '/')));
    }

    #[test]
    fn test_apply_family() {
        let registry = registry();
        let apply = |l: i64, op: char, r: i64| registry.resolve(APPLY, &[Value::Int(l), Value::Char(op), Value::Int(r)]);
        assert_eq!(apply(2, '+', 3), Ok(Value::Int(5)));
        assert_eq!(apply(2, '-', 3), Ok(Value::Int(-1)));
        assert_eq!(apply(2, '*', 3), Ok(Value::Int(6)));
        assert_eq!(apply(-7, '/', 2), Ok(Value::Int(-3)));
        assert!(matches!(apply(2, '%', 3), Err(ResolveError::NoMatch(_, _))));
    }

    #[test]
    fn test_long_input() {
        let expression = "1+".repeat(50_000);
        assert_eq!(evaluate(&expression), Ok(50_000));
    }
}
