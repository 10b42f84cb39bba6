/// Lexer - turns a literal string into a list of character atoms
use crate::symbol::{List, Value};

/// Produces `Cons<'s0', Cons<'s1', ... Nil>>`, one atom per character.
///
/// Nothing is skipped or escaped: spaces and digits become atoms like any
/// other character. The empty string lexes to `Nil`.
pub fn lex_to_list(input: &str) -> List {
    input.chars().map(Value::Char).collect()
}

/// Builds a list of integer atoms.
pub fn ints_to_list(ints: &[i64]) -> List {
    ints.iter().copied().map(Value::Int).collect()
}

/// Renders a list in `Cons<a, Cons<b, Nil>>` form.
pub fn show_list(list: &List) -> String {
    list.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_nil() {
        assert!(lex_to_list("").is_nil());
        assert_eq!(show_list(&lex_to_list("")), "Nil");
    }

    #[test]
    fn test_one_atom_per_character() {
        for input in ["bar", "1 + 2", "  ", "9/0?"] {
            let list = lex_to_list(input);
            assert_eq!(list.len(), input.chars().count());
            let chars: String = list.iter().filter_map(Value::as_char).collect();
            assert_eq!(chars, input);
        }
    }

    #[test]
    fn test_show_list() {
        assert_eq!(show_list(&lex_to_list("bar")), "Cons<'b', Cons<'a', Cons<'r', Nil>>>");
        assert_eq!(show_list(&ints_to_list(&[2, 3, 5])), "Cons<2, Cons<3, Cons<5, Nil>>>");
    }

    #[test]
    fn test_long_input_is_built_iteratively() {
        let input = "7".repeat(200_000);
        assert_eq!(lex_to_list(&input).len(), 200_000);
    }
}
