/// Symbol model
///
/// Atoms (characters and integers), the persistent `Cons`/`Nil` list and the
/// compound values built from them. Everything here is immutable; combinators
/// build fresh values instead of mutating existing ones.
use std::fmt;
use std::rc::Rc;

/// The name of a structure constructor, e.g. `Vec2`.
pub type Tag = Rc<str>;

/// The kind of a [`Value`], used by typed pattern bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Char,
    Int,
    List,
    Tuple,
    Struct,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Kind::Char => "char",
            Kind::Int => "int",
            Kind::List => "list",
            Kind::Tuple => "tuple",
            Kind::Struct => "struct",
        };
        f.write_str(name)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum Value {
    /// A character atom.
    Char(char),

    /// A signed integer atom.
    Int(i64),

    /// A `Cons`/`Nil` list.
    List(List),

    /// An anonymous fixed-size group, e.g. the calculator's accumulator.
    Tuple(Rc<[Value]>),

    /// A tagged group of fields, e.g. `Vec2<3, 4>`.
    Struct(Tag, Rc<[Value]>),
}

impl Value {
    pub fn tuple<const N: usize>(fields: [Value; N]) -> Value {
        Value::Tuple(Rc::new(fields))
    }

    pub fn structure<const N: usize>(tag: &str, fields: [Value; N]) -> Value {
        Value::Struct(Tag::from(tag), Rc::new(fields))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Char(_) => Kind::Char,
            Value::Int(_) => Kind::Int,
            Value::List(_) => Kind::List,
            Value::Tuple(_) => Kind::Tuple,
            Value::Struct(..) => Kind::Struct,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::List(list)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Char(c) => write!(f, "'{}'", c),
            Value::Int(n) => write!(f, "{}", n),
            Value::List(list) => fmt::Display::fmt(list, f),
            Value::Tuple(fields) => write_fields(f, "(", fields, ")"),
            Value::Struct(tag, fields) => {
                f.write_str(tag)?;
                write_fields(f, "<", fields, ">")
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn write_fields(f: &mut fmt::Formatter, open: &str, fields: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", field)?;
    }
    f.write_str(close)
}

// ----------------------------------------------------------------------------

struct Cell {
    head: Value,
    tail: List,
}

/// A persistent singly-linked list: either `Nil` or `Cons(head, tail)`.
///
/// Cells are shared through `Rc`, so cloning a list is O(1) and a list can be
/// the tail of any number of other lists.
#[derive(Clone, Default)]
pub struct List(Option<Rc<Cell>>);

impl List {
    pub fn nil() -> List {
        List(None)
    }

    pub fn cons(head: Value, tail: List) -> List {
        List(Some(Rc::new(Cell { head, tail })))
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_none()
    }

    /// Splits a `Cons` into its head and tail; `None` for `Nil`.
    pub fn uncons(&self) -> Option<(&Value, &List)> {
        self.0.as_deref().map(|cell| (&cell.head, &cell.tail))
    }

    pub fn head(&self) -> Option<&Value> {
        self.uncons().map(|(head, _)| head)
    }

    pub fn tail(&self) -> Option<&List> {
        self.uncons().map(|(_, tail)| tail)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { next: self }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.is_nil()
    }
}

impl Drop for List {
    // Unlink cell by cell so that dropping a long list does not recurse once
    // per element.
    fn drop(&mut self) {
        let mut next = self.0.take();
        while let Some(cell) = next {
            match Rc::try_unwrap(cell) {
                Ok(mut cell) => next = cell.tail.0.take(),
                Err(_) => break,
            }
        }
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        let mut left = self.iter();
        let mut right = other.iter();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a == b => continue,
                _ => return false,
            }
        }
    }
}

impl Eq for List {}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let items: Vec<Value> = iter.into_iter().collect();
        items.into_iter().rev().fold(List::nil(), |tail, head| List::cons(head, tail))
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut depth = 0usize;
        for item in self.iter() {
            write!(f, "Cons<{}, ", item)?;
            depth += 1;
        }
        f.write_str("Nil")?;
        for _ in 0..depth {
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

pub struct Iter<'a> {
    next: &'a List,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let (head, tail) = self.next.uncons()?;
        self.next = tail;
        Some(head)
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
