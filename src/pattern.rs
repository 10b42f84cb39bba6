/// Shape patterns
///
/// A pattern describes the structural positions of a [`Value`]: literal
/// positions must equal the input, free positions accept anything of the
/// expected kind and may bind it to a name for the rule body.
use std::fmt;
use std::rc::Rc;

use crate::error::ResolveError;
use crate::symbol::{Kind, List, Tag, Value};

/// The name a pattern binds a matched value to.
pub type Name = Rc<str>;

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Accepts any value without binding it.
    Any,

    /// Accepts a value of the given kind (any kind if `None`) and binds it.
    Bind(Name, Option<Kind>),

    /// An integer literal.
    Int(i64),

    /// A character literal.
    Char(char),

    /// Any one of the listed characters.
    CharIn(Rc<str>),

    /// Any character in the inclusive range.
    CharRange(char, char),

    Nil,

    Cons(Box<Pattern>, Box<Pattern>),

    Tuple(Box<[Pattern]>),

    Struct(Tag, Box<[Pattern]>),

    /// Matches the inner pattern and binds the whole value to the name.
    As(Name, Box<Pattern>),
}

impl Pattern {
    pub fn bind(name: &str) -> Pattern {
        Pattern::Bind(Name::from(name), None)
    }

    pub fn int(name: &str) -> Pattern {
        Pattern::Bind(Name::from(name), Some(Kind::Int))
    }

    pub fn char(name: &str) -> Pattern {
        Pattern::Bind(Name::from(name), Some(Kind::Char))
    }

    pub fn list(name: &str) -> Pattern {
        Pattern::Bind(Name::from(name), Some(Kind::List))
    }

    pub fn one_of(chars: &str) -> Pattern {
        Pattern::CharIn(Rc::from(chars))
    }

    pub fn digit() -> Pattern {
        Pattern::CharRange('0', '9')
    }

    pub fn cons(head: Pattern, tail: Pattern) -> Pattern {
        Pattern::Cons(Box::new(head), Box::new(tail))
    }

    pub fn tuple<const N: usize>(fields: [Pattern; N]) -> Pattern {
        Pattern::Tuple(Box::new(fields))
    }

    pub fn structure<const N: usize>(tag: &str, fields: [Pattern; N]) -> Pattern {
        Pattern::Struct(Tag::from(tag), Box::new(fields))
    }

    /// Binds whatever this pattern matches to `name`.
    pub fn named(self, name: &str) -> Pattern {
        Pattern::As(Name::from(name), Box::new(self))
    }

    /// The number of positions this pattern constrains.
    ///
    /// Literals, character classes, `Nil` and the `Cons`/struct constructors
    /// each count once; `Any` and bindings count zero. Tuples only group
    /// their fields.
    pub fn specificity(&self) -> usize {
        match self {
            Pattern::Any | Pattern::Bind(..) => 0,
            Pattern::Int(_) | Pattern::Char(_) | Pattern::CharIn(_) | Pattern::CharRange(..) | Pattern::Nil => 1,
            Pattern::Cons(head, tail) => 1 + head.specificity() + tail.specificity(),
            Pattern::Tuple(fields) => fields.iter().map(Pattern::specificity).sum(),
            Pattern::Struct(_, fields) => 1 + fields.iter().map(Pattern::specificity).sum::<usize>(),
            Pattern::As(_, inner) => inner.specificity(),
        }
    }

    /// Tries to match `value`, recording bound names in `bindings`.
    ///
    /// On failure `bindings` may hold partial results and should be discarded.
    pub fn matches(&self, value: &Value, bindings: &mut Bindings) -> bool {
        match (self, value) {
            (Pattern::Any, _) => true,
            (Pattern::Bind(name, kind), _) => {
                if kind.map_or(true, |kind| kind == value.kind()) {
                    bindings.insert(name.clone(), value.clone());
                    true
                } else {
                    false
                }
            }
            (Pattern::Int(expected), Value::Int(n)) => expected == n,
            (Pattern::Char(expected), Value::Char(c)) => expected == c,
            (Pattern::CharIn(chars), Value::Char(c)) => chars.contains(*c),
            (Pattern::CharRange(lo, hi), Value::Char(c)) => (*lo..=*hi).contains(c),
            (Pattern::Nil, Value::List(list)) => list.is_nil(),
            (Pattern::Cons(head, tail), Value::List(list)) => match list.uncons() {
                Some((first, rest)) => head.matches(first, bindings) && tail.matches(&Value::List(rest.clone()), bindings),
                None => false,
            },
            (Pattern::Tuple(patterns), Value::Tuple(fields)) => matches_all(patterns, fields, bindings),
            (Pattern::Struct(tag, patterns), Value::Struct(value_tag, fields)) => {
                tag == value_tag && matches_all(patterns, fields, bindings)
            }
            (Pattern::As(name, inner), _) => {
                if inner.matches(value, bindings) {
                    bindings.insert(name.clone(), value.clone());
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Whether some value matches both `self` and `other`.
    ///
    /// Patterns never repeat a name, so checking position by position is
    /// exact.
    pub fn overlaps(&self, other: &Pattern) -> bool {
        match (self, other) {
            (Pattern::As(_, inner), _) => inner.overlaps(other),
            (_, Pattern::As(_, inner)) => self.overlaps(inner),
            (Pattern::Any | Pattern::Bind(_, None), _) | (_, Pattern::Any | Pattern::Bind(_, None)) => true,
            (Pattern::Bind(_, Some(kind)), pattern) | (pattern, Pattern::Bind(_, Some(kind))) => {
                pattern.kind().map_or(true, |other| other == *kind)
            }
            (Pattern::Int(a), Pattern::Int(b)) => a == b,
            (
                Pattern::Char(_) | Pattern::CharIn(_) | Pattern::CharRange(..),
                Pattern::Char(_) | Pattern::CharIn(_) | Pattern::CharRange(..),
            ) => chars_overlap(self, other),
            (Pattern::Nil, Pattern::Nil) => true,
            (Pattern::Cons(h1, t1), Pattern::Cons(h2, t2)) => h1.overlaps(h2) && t1.overlaps(t2),
            (Pattern::Tuple(a), Pattern::Tuple(b)) => all_overlap(a, b),
            (Pattern::Struct(t1, a), Pattern::Struct(t2, b)) => t1 == t2 && all_overlap(a, b),
            _ => false,
        }
    }

    /// The kind of value this pattern accepts, `None` if it accepts any.
    fn kind(&self) -> Option<Kind> {
        match self {
            Pattern::Any => None,
            Pattern::Bind(_, kind) => *kind,
            Pattern::Int(_) => Some(Kind::Int),
            Pattern::Char(_) | Pattern::CharIn(_) | Pattern::CharRange(..) => Some(Kind::Char),
            Pattern::Nil | Pattern::Cons(..) => Some(Kind::List),
            Pattern::Tuple(_) => Some(Kind::Tuple),
            Pattern::Struct(..) => Some(Kind::Struct),
            Pattern::As(_, inner) => inner.kind(),
        }
    }

    /// Appends every name this pattern binds, in order of appearance.
    pub fn collect_names(&self, names: &mut Vec<Name>) {
        match self {
            Pattern::Bind(name, _) => names.push(name.clone()),
            Pattern::Cons(head, tail) => {
                head.collect_names(names);
                tail.collect_names(names);
            }
            Pattern::Tuple(fields) | Pattern::Struct(_, fields) => {
                for field in fields.iter() {
                    field.collect_names(names);
                }
            }
            Pattern::As(name, inner) => {
                names.push(name.clone());
                inner.collect_names(names);
            }
            _ => {}
        }
    }
}

fn all_overlap(a: &[Pattern], b: &[Pattern]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.overlaps(b))
}

fn chars_overlap(a: &Pattern, b: &Pattern) -> bool {
    match (a, b) {
        (Pattern::CharRange(lo1, hi1), Pattern::CharRange(lo2, hi2)) => lo1.max(lo2) <= hi1.min(hi2),
        (Pattern::CharRange(..), _) => chars_overlap(b, a),
        _ => literal_chars(a).into_iter().any(|c| b.matches(&Value::Char(c), &mut Bindings::new())),
    }
}

fn literal_chars(pattern: &Pattern) -> Vec<char> {
    match pattern {
        Pattern::Char(c) => vec![*c],
        Pattern::CharIn(chars) => chars.chars().collect(),
        _ => Vec::new(),
    }
}

fn matches_all(patterns: &[Pattern], values: &[Value], bindings: &mut Bindings) -> bool {
    patterns.len() == values.len() && patterns.iter().zip(values).all(|(pattern, value)| pattern.matches(value, bindings))
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Pattern::Any => f.write_str("_"),
            Pattern::Bind(name, Some(kind)) => write!(f, "{}: {}", name, kind),
            Pattern::Bind(name, None) => f.write_str(name),
            Pattern::Int(n) => write!(f, "{}", n),
            Pattern::Char(c) => write!(f, "'{}'", c),
            Pattern::CharIn(chars) => write!(f, "[{}]", chars),
            Pattern::CharRange(lo, hi) => write!(f, "'{}'..='{}'", lo, hi),
            Pattern::Nil => f.write_str("Nil"),
            Pattern::Cons(head, tail) => write!(f, "Cons<{}, {}>", head, tail),
            Pattern::Tuple(fields) => write_patterns(f, "(", fields, ")"),
            Pattern::Struct(tag, fields) => {
                f.write_str(tag)?;
                write_patterns(f, "<", fields, ">")
            }
            Pattern::As(name, inner) => write!(f, "{} @ {}", name, inner),
        }
    }
}

fn write_patterns(f: &mut fmt::Formatter, open: &str, patterns: &[Pattern], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (index, pattern) in patterns.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", pattern)?;
    }
    f.write_str(close)
}

// ----------------------------------------------------------------------------

/// Values bound by a matched rule, looked up by name in the rule body.
#[derive(Debug, Default, Clone)]
pub struct Bindings(Vec<(Name, Value)>);

impl Bindings {
    pub fn new() -> Self {
        Bindings(Vec::new())
    }

    fn insert(&mut self, name: Name, value: Value) {
        self.0.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(bound, _)| &**bound == name).map(|(_, value)| value)
    }

    pub fn value(&self, name: &str) -> Result<&Value, ResolveError> {
        self.get(name).ok_or_else(|| ResolveError::TypeError(format!("'{}' is not bound", name)))
    }

    pub fn int(&self, name: &str) -> Result<i64, ResolveError> {
        let value = self.value(name)?;
        value.as_int().ok_or_else(|| mismatch(name, Kind::Int, value))
    }

    pub fn char(&self, name: &str) -> Result<char, ResolveError> {
        let value = self.value(name)?;
        value.as_char().ok_or_else(|| mismatch(name, Kind::Char, value))
    }

    pub fn list(&self, name: &str) -> Result<&List, ResolveError> {
        let value = self.value(name)?;
        value.as_list().ok_or_else(|| mismatch(name, Kind::List, value))
    }
}

fn mismatch(name: &str, expected: Kind, value: &Value) -> ResolveError {
    ResolveError::TypeError(format!("'{}' is bound to {} {}, expected {}", name, value.kind(), value, expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_one(pattern: &Pattern, value: &Value) -> Option<Bindings> {
        let mut bindings = Bindings::new();
        pattern.matches(value, &mut bindings).then_some(bindings)
    }

    #[test]
    fn test_literals_match_exactly() {
        assert!(match_one(&Pattern::Int(0), &Value::Int(0)).is_some());
        assert!(match_one(&Pattern::Int(0), &Value::Int(1)).is_none());
        assert!(match_one(&Pattern::Char('+'), &Value::Char('+')).is_some());
        assert!(match_one(&Pattern::Char('+'), &Value::Int(43)).is_none());
    }

    #[test]
    fn test_bindings_check_kind() {
        let bindings = match_one(&Pattern::int("n"), &Value::Int(7)).expect("int binds");
        assert_eq!(bindings.int("n"), Ok(7));
        assert!(match_one(&Pattern::int("n"), &Value::Char('7')).is_none());

        let bindings = match_one(&Pattern::bind("x"), &Value::Char('q')).expect("untyped binds anything");
        assert_eq!(bindings.char("x"), Ok('q'));
        assert!(matches!(bindings.int("x"), Err(ResolveError::TypeError(_))));
        assert!(matches!(bindings.int("missing"), Err(ResolveError::TypeError(_))));
    }

    #[test]
    fn test_character_classes() {
        assert!(match_one(&Pattern::digit(), &Value::Char('0')).is_some());
        assert!(match_one(&Pattern::digit(), &Value::Char('9')).is_some());
        assert!(match_one(&Pattern::digit(), &Value::Char('a')).is_none());
        assert!(match_one(&Pattern::one_of("+-*/"), &Value::Char('/')).is_some());
        assert!(match_one(&Pattern::one_of("+-*/"), &Value::Char(' ')).is_none());
    }

    #[test]
    fn test_named_class_binds_and_stays_specific() {
        let pattern = Pattern::digit().named("c");
        let bindings = match_one(&pattern, &Value::Char('4')).expect("digit matches");
        assert_eq!(bindings.char("c"), Ok('4'));
        assert!(match_one(&pattern, &Value::Char('x')).is_none());
        assert_eq!(pattern.specificity(), 1);
        assert_eq!(pattern.to_string(), "c @ '0'..='9'");
    }

    #[test]
    fn test_cons_destructuring() {
        let list: List = "+1".chars().map(Value::Char).collect();
        let pattern = Pattern::cons(Pattern::Char('+'), Pattern::list("rest"));
        let bindings = match_one(&pattern, &Value::List(list)).expect("cons matches");
        assert_eq!(bindings.list("rest").map(List::len), Ok(1));

        assert!(match_one(&pattern, &Value::List(List::nil())).is_none());
        assert!(match_one(&Pattern::Nil, &Value::List(List::nil())).is_some());
    }

    #[test]
    fn test_struct_and_tuple_shapes() {
        let vec2 = Value::structure("Vec2", [Value::Int(3), Value::Int(4)]);
        let pattern = Pattern::structure("Vec2", [Pattern::int("x"), Pattern::int("y")]);
        let bindings = match_one(&pattern, &vec2).expect("struct matches");
        assert_eq!((bindings.int("x"), bindings.int("y")), (Ok(3), Ok(4)));

        let other = Pattern::structure("Vec3", [Pattern::int("x"), Pattern::int("y")]);
        assert!(match_one(&other, &vec2).is_none());

        let short = Pattern::tuple([Pattern::Any]);
        assert!(match_one(&short, &Value::tuple([Value::Int(1), Value::Int(2)])).is_none());
    }

    #[test]
    fn test_specificity_counts_constrained_positions() {
        assert_eq!(Pattern::int("n").specificity(), 0);
        assert_eq!(Pattern::Int(0).specificity(), 1);
        assert_eq!(Pattern::tuple([Pattern::int("v"), Pattern::char("op")]).specificity(), 0);
        assert_eq!(Pattern::cons(Pattern::Char('+'), Pattern::Any).specificity(), 2);
        assert_eq!(Pattern::structure("Vec2", [Pattern::Int(0), Pattern::Any]).specificity(), 2);
    }

    #[test]
    fn test_overlaps() {
        assert!(Pattern::Char('+').overlaps(&Pattern::one_of("+-")));
        assert!(!Pattern::Char('x').overlaps(&Pattern::one_of("+-")));
        assert!(Pattern::digit().overlaps(&Pattern::CharRange('5', 'z')));
        assert!(!Pattern::digit().overlaps(&Pattern::one_of("+-*/")));
        assert!(Pattern::one_of("a9").overlaps(&Pattern::digit().named("c")));
        assert!(!Pattern::Int(0).overlaps(&Pattern::Int(1)));
        assert!(Pattern::int("n").overlaps(&Pattern::Int(1)));
        assert!(!Pattern::int("n").overlaps(&Pattern::Char('1')));
        assert!(Pattern::Any.overlaps(&Pattern::Nil));
        assert!(!Pattern::Nil.overlaps(&Pattern::cons(Pattern::Any, Pattern::Any)));
        assert!(Pattern::list("xs").overlaps(&Pattern::Nil));
        assert!(!Pattern::structure("Vec2", [Pattern::Any, Pattern::Any])
            .overlaps(&Pattern::structure("Vec2", [Pattern::Any, Pattern::Any, Pattern::Any])));
        assert!(!Pattern::tuple([Pattern::Int(0), Pattern::Any]).overlaps(&Pattern::tuple([Pattern::Int(1), Pattern::Any])));
    }

    #[test]
    fn test_collect_names_in_order() {
        let pattern = Pattern::tuple([Pattern::int("value"), Pattern::cons(Pattern::char("c"), Pattern::bind("rest"))]);
        let mut names = Vec::new();
        pattern.collect_names(&mut names);
        let names: Vec<&str> = names.iter().map(|name| &**name).collect();
        assert_eq!(names, vec!["value", "c", "rest"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Pattern::tuple([Pattern::int("v"), Pattern::digit()]).to_string(), "(v: int, '0'..='9')");
        assert_eq!(Pattern::structure("Vec2", [Pattern::bind("x"), Pattern::Any]).to_string(), "Vec2<x, _>");
    }
}
