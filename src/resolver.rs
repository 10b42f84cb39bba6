/// Pattern-dispatch resolver
///
/// A [`Family`] is a named, ordered set of rules sharing one arity. Resolving
/// a family against concrete input selects the matching rule with the most
/// constrained positions, so literal base cases (`fib(0)`, `fib(1)`) win over
/// the general recursive rule (`fib(n)`), and evaluates its body. Bodies get
/// the [`Registry`] back and may resolve further families.
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::config::ResolverConfig;
use crate::error::{FamilyError, ResolveError};
use crate::log::targets;
use crate::pattern::{Bindings, Name, Pattern};
use crate::symbol::Value;

/// The body of a rule: computes the result from the bound names.
pub type Body = Rc<dyn Fn(&Bindings, &Registry) -> Result<Value, ResolveError>>;

pub struct Rule {
    name: Name,
    patterns: Box<[Pattern]>,
    specificity: usize,
    body: Body,
}

impl Rule {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Matches every argument against the corresponding pattern.
    pub fn bind(&self, args: &[Value]) -> Option<Bindings> {
        if args.len() != self.patterns.len() {
            return None;
        }
        let mut bindings = Bindings::new();
        self.patterns.iter().zip(args).all(|(pattern, arg)| pattern.matches(arg, &mut bindings)).then_some(bindings)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.name, render_patterns(&self.patterns))
    }
}

fn render_patterns(patterns: &[Pattern]) -> String {
    let rendered: Vec<String> = patterns.iter().map(Pattern::to_string).collect();
    format!("({})", rendered.join(", "))
}

pub(crate) fn render_args(args: &[Value]) -> String {
    let rendered: Vec<String> = args.iter().map(Value::to_string).collect();
    format!("({})", rendered.join(", "))
}

// ----------------------------------------------------------------------------

#[derive(Debug)]
pub struct Family {
    name: Name,
    arity: usize,
    rules: Box<[Rule]>,
}

impl Family {
    pub fn builder(name: &str, arity: usize) -> FamilyBuilder {
        FamilyBuilder { name: Name::from(name), arity, rules: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Picks the rule to apply to `args`.
    ///
    /// Rules are scanned in declaration order. Among the matching rules the
    /// one with the strictly highest specificity is chosen; a tie at the top
    /// is ambiguous and no match at all is a failure.
    pub fn select(&self, args: &[Value]) -> Result<(&Rule, Bindings), ResolveError> {
        if args.len() != self.arity {
            return Err(ResolveError::ArityError(self.name.to_string(), self.arity, args.len()));
        }

        let mut best: Option<(&Rule, Bindings)> = None;
        let mut tied: Option<&Rule> = None;
        for rule in self.rules.iter() {
            let Some(bindings) = rule.bind(args) else { continue };
            match &best {
                Some((current, _)) if rule.specificity < current.specificity => {}
                Some((current, _)) if rule.specificity == current.specificity => {
                    tied.get_or_insert(rule);
                }
                _ => {
                    best = Some((rule, bindings));
                    tied = None;
                }
            }
        }

        match (best, tied) {
            (Some((rule, _)), Some(other)) => Err(ResolveError::Ambiguous {
                family: self.name.to_string(),
                input: render_args(args),
                first: rule.name.to_string(),
                second: other.name.to_string(),
            }),
            (Some(selected), None) => Ok(selected),
            (None, _) => Err(ResolveError::NoMatch(self.name.to_string(), render_args(args))),
        }
    }
}

pub struct FamilyBuilder {
    name: Name,
    arity: usize,
    rules: Vec<Rule>,
}

impl FamilyBuilder {
    pub fn rule<P, F>(mut self, name: &str, patterns: P, body: F) -> Self
    where
        P: IntoIterator<Item = Pattern>,
        F: Fn(&Bindings, &Registry) -> Result<Value, ResolveError> + 'static,
    {
        let patterns: Box<[Pattern]> = patterns.into_iter().collect();
        let specificity = patterns.iter().map(Pattern::specificity).sum();
        self.rules.push(Rule { name: Name::from(name), patterns, specificity, body: Rc::new(body) });
        self
    }

    /// Validates the rules and seals the family.
    ///
    /// Two rules of equal specificity that can both match one input are
    /// rejected, so selection never has to break a tie.
    pub fn build(self) -> Result<Family, FamilyError> {
        let family = self.name.to_string();
        if self.rules.is_empty() {
            return Err(FamilyError::Empty(family));
        }

        for (index, rule) in self.rules.iter().enumerate() {
            if rule.patterns.len() != self.arity {
                return Err(FamilyError::ArityMismatch(family, rule.name.to_string(), self.arity, rule.patterns.len()));
            }

            let mut names = Vec::new();
            for pattern in rule.patterns.iter() {
                pattern.collect_names(&mut names);
            }
            for (position, name) in names.iter().enumerate() {
                if names[..position].contains(name) {
                    return Err(FamilyError::DuplicateBinding(family, rule.name.to_string(), name.to_string()));
                }
            }

            if let Some(earlier) = self.rules[..index].iter().find(|earlier| earlier.patterns == rule.patterns) {
                return Err(FamilyError::Unreachable {
                    family,
                    rule: rule.name.to_string(),
                    shadowed_by: earlier.name.to_string(),
                });
            }

            let overlapping = self.rules[..index].iter().find(|earlier| {
                earlier.specificity == rule.specificity
                    && earlier.patterns.iter().zip(rule.patterns.iter()).all(|(a, b)| a.overlaps(b))
            });
            if let Some(earlier) = overlapping {
                return Err(FamilyError::Overlap {
                    family,
                    rule: rule.name.to_string(),
                    overlaps: earlier.name.to_string(),
                });
            }
        }

        log::debug!(target: targets::FAMILY, "Built family '{}' with {} rules", self.name, self.rules.len());
        Ok(Family { name: self.name, arity: self.arity, rules: self.rules.into_boxed_slice() })
    }
}

// ----------------------------------------------------------------------------

/// Decrements the active depth when a resolution finishes, however it ends.
struct DepthGuard<'a>(&'a Cell<usize>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

/// The set of families available to rule bodies.
#[derive(Default)]
pub struct Registry {
    families: HashMap<Name, Family>,
    config: ResolverConfig,
    depth: Cell<usize>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Depth limits above the ceiling are clamped.
    pub fn with_config(config: ResolverConfig) -> Self {
        Registry { config: config.with_max_depth(config.max_depth), ..Registry::default() }
    }

    pub fn register(&mut self, family: Family) -> Result<(), FamilyError> {
        if self.families.contains_key(&family.name) {
            return Err(FamilyError::DuplicateFamily(family.name.to_string()));
        }
        self.families.insert(family.name.clone(), family);
        Ok(())
    }

    pub fn family(&self, name: &str) -> Result<&Family, ResolveError> {
        self.families.get(name).ok_or_else(|| ResolveError::UnknownFamily(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.families.contains_key(name)
    }

    /// Selects the rule of `family` matching `args` and evaluates its body.
    pub fn resolve(&self, family: &str, args: &[Value]) -> Result<Value, ResolveError> {
        let family = self.family(family)?;

        let depth = self.depth.get() + 1;
        if depth > self.config.max_depth {
            log::warn!(target: targets::RESOLVE, "'{}' exceeded the depth limit of {}", family.name, self.config.max_depth);
            return Err(ResolveError::DepthExceeded { family: family.name.to_string(), limit: self.config.max_depth });
        }
        self.depth.set(depth);
        let _guard = DepthGuard(&self.depth);

        let (rule, bindings) = family.select(args)?;
        log::trace!(target: targets::RESOLVE, "{}{} => rule '{}'", family.name, render_args(args), rule.name);
        (rule.body)(&bindings, self)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut names: Vec<&str> = self.families.keys().map(|name| &**name).collect();
        names.sort();
        f.debug_struct("Registry").field("families", &names).field("config", &self.config).finish()
    }
}
