/// Error types for family construction, resolution and constant baking
use std::fmt;
use std::io;

/// Raised while building a dispatch family or registering it.
#[derive(Debug, Clone, PartialEq)]
pub enum FamilyError {
    /// The family has no rules at all.
    Empty(String),
    /// family, rule, expected arity, actual arity
    ArityMismatch(String, String, usize, usize),
    /// family, rule, name
    DuplicateBinding(String, String, String),
    /// A rule whose patterns repeat an earlier rule's and can never be selected.
    Unreachable { family: String, rule: String, shadowed_by: String },
    /// Two rules of equal specificity accept a common input.
    Overlap { family: String, rule: String, overlaps: String },
    DuplicateFamily(String),
}

impl fmt::Display for FamilyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FamilyError::Empty(family) => write!(f, "family '{}' has no rules", family),
            FamilyError::ArityMismatch(family, rule, expected, actual) => write!(
                f,
                "rule '{}' of family '{}' has {} patterns, expected {}",
                rule, family, actual, expected
            ),
            FamilyError::DuplicateBinding(family, rule, name) => {
                write!(f, "rule '{}' of family '{}' binds '{}' more than once", rule, family, name)
            }
            FamilyError::Unreachable { family, rule, shadowed_by } => write!(
                f,
                "rule '{}' of family '{}' is unreachable: it repeats the patterns of '{}'",
                rule, family, shadowed_by
            ),
            FamilyError::Overlap { family, rule, overlaps } => write!(
                f,
                "rule '{}' of family '{}' is as specific as '{}' and matches some of the same input",
                rule, family, overlaps
            ),
            FamilyError::DuplicateFamily(family) => write!(f, "family '{}' is already registered", family),
        }
    }
}

impl std::error::Error for FamilyError {}

/// Raised while resolving a family against concrete input.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveError {
    UnknownFamily(String),
    /// family, expected, actual
    ArityError(String, usize, usize),
    /// family, rendered input
    NoMatch(String, String),
    /// Two rules of equal specificity both match the input.
    Ambiguous { family: String, input: String, first: String, second: String },
    DepthExceeded { family: String, limit: usize },
    DivisionByZero,
    Overflow(String),
    TypeError(String),
    Family(FamilyError),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResolveError::UnknownFamily(family) => write!(f, "Unknown family: {}", family),
            ResolveError::ArityError(family, expected, actual) => {
                write!(f, "Arity error in '{}': expected {} arguments, got {}", family, expected, actual)
            }
            ResolveError::NoMatch(family, input) => write!(f, "No rule of '{}' matches {}", family, input),
            ResolveError::Ambiguous { family, input, first, second } => write!(
                f,
                "Ambiguous resolution of '{}' for {}: rules '{}' and '{}' are equally specific",
                family, input, first, second
            ),
            ResolveError::DepthExceeded { family, limit } => {
                write!(f, "Resolution of '{}' exceeded the depth limit of {}", family, limit)
            }
            ResolveError::DivisionByZero => f.write_str("Division by zero"),
            ResolveError::Overflow(op) => write!(f, "Integer overflow in {}", op),
            ResolveError::TypeError(msg) => write!(f, "Type error: {}", msg),
            ResolveError::Family(error) => write!(f, "Invalid family: {}", error),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Family(error) => Some(error),
            _ => None,
        }
    }
}

impl From<FamilyError> for ResolveError {
    fn from(error: FamilyError) -> Self {
        ResolveError::Family(error)
    }
}

/// Raised while writing a resolved constant into machine code.
#[derive(Debug)]
pub enum BakeError {
    InvalidSymbol(String),
    Object(object::write::Error),
    Io(io::Error),
    Map(io::Error),
    UnsupportedTarget(&'static str),
}

impl fmt::Display for BakeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BakeError::InvalidSymbol(name) => write!(f, "Invalid symbol name: '{}'", name),
            BakeError::Object(error) => write!(f, "Failed to build object file: {}", error),
            BakeError::Io(error) => write!(f, "Failed to write object file: {}", error),
            BakeError::Map(error) => write!(f, "Failed to map executable memory: {}", error),
            BakeError::UnsupportedTarget(arch) => write!(f, "Constant thunks are not supported on {}", arch),
        }
    }
}

impl std::error::Error for BakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BakeError::Object(error) => Some(error),
            BakeError::Io(error) | BakeError::Map(error) => Some(error),
            _ => None,
        }
    }
}

impl From<object::write::Error> for BakeError {
    fn from(error: object::write::Error) -> Self {
        BakeError::Object(error)
    }
}
