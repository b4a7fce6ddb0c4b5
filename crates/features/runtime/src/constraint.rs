//! The ecosystem's constraint dialect, reduced to what runtime selection needs.
//!
//! ```text
//! constraint  := alternative ( ("||" | "|") alternative )*
//! alternative := term ( (" " | ",") term )*
//! term        := "*" | "^"V | "~"V | OP V | V ".*" | V "-" V | V " - " V | V
//! ```
//!
//! Candidates are `major.minor` runtime versions; they are compared as
//! `(major, minor, 0)` triples and missing parts of a bound count as `0`.

use mgen_domain::version::RuntimeVersion;
use std::fmt;

type Triple = (u32, u32, u32);

/// A bound with optional minor and patch (`8`, `8.1`, `8.1.4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Partial {
    major: u32,
    minor: Option<u32>,
    patch: Option<u32>,
}

impl Partial {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.strip_prefix(['v', 'V']).unwrap_or(raw);
        // Stability flags (`@dev`) and pre-release labels (`-beta1`) do not affect selection.
        let raw = raw.split('@').next().unwrap_or_default();
        let raw = match raw.split_once('-') {
            Some((version, label)) if is_label(label) => version,
            _ => raw,
        };

        let mut parts = raw.split('.');
        let major = number(parts.next()?)?;
        let minor = match parts.next() {
            Some(part) => Some(number(part)?),
            None => None,
        };
        let patch = match parts.next() {
            Some(part) => Some(number(part)?),
            None => None,
        };
        // A fourth component is tolerated (`8.1.0.0`) but ignored.
        if parts.next().is_some_and(|extra| number(extra).is_none()) {
            return None;
        }
        Some(Self { major, minor, patch })
    }

    fn triple(self) -> Triple {
        (self.major, self.minor.unwrap_or(0), self.patch.unwrap_or(0))
    }

    /// `major.minor` matches, or only `major` when no minor was given.
    fn same_line(self, candidate: RuntimeVersion) -> bool {
        candidate.major() == self.major && self.minor.is_none_or(|minor| candidate.minor() == minor)
    }
}

fn number(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn is_label(label: &str) -> bool {
    label.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '.')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Op {
    /// Longest operators first so `>=` is not read as `>`.
    const ALL: [(&'static str, Self); 7] = [
        (">=", Self::Ge),
        ("<=", Self::Le),
        ("!=", Self::Ne),
        ("==", Self::Eq),
        (">", Self::Gt),
        ("<", Self::Lt),
        ("=", Self::Eq),
    ];

    fn split(term: &str) -> Option<(Self, &str)> {
        Self::ALL.iter().find_map(|(symbol, op)| term.strip_prefix(symbol).map(|rest| (*op, rest)))
    }

    fn holds(self, candidate: Triple, bound: Triple) -> bool {
        match self {
            Self::Lt => candidate < bound,
            Self::Le => candidate <= bound,
            Self::Gt => candidate > bound,
            Self::Ge => candidate >= bound,
            Self::Eq => candidate == bound,
            Self::Ne => candidate != bound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Term {
    Any,
    /// `^X.Y`: same major, at least `X.Y`.
    Caret(Partial),
    /// `~X.Y`: exactly `X.Y`; `~X`: same major.
    Tilde(Partial),
    /// `X.Y[.Z]`: same `major.minor`; `X`: same major.
    Exact(Partial),
    /// `X.*` / `X.Y.*`.
    Wildcard(Partial),
    Compare(Op, Partial),
    /// Inclusive; a partial upper bound covers everything it prefixes.
    Range(Partial, Partial),
}

impl Term {
    fn parse(token: &str) -> Option<Self> {
        if matches!(token, "*" | "*.*" | "x" | "X") {
            return Some(Self::Any);
        }
        if let Some(rest) = token.strip_prefix('^') {
            return Partial::parse(rest).map(Self::Caret);
        }
        if let Some(rest) = token.strip_prefix('~') {
            return Partial::parse(rest).map(Self::Tilde);
        }
        if let Some((op, rest)) = Op::split(token) {
            return Partial::parse(rest).map(|bound| Self::Compare(op, bound));
        }
        if let Some(prefix) = token.strip_suffix(".*").or_else(|| token.strip_suffix(".x")) {
            return Partial::parse(prefix)
                .filter(|p| p.patch.is_none())
                .map(Self::Wildcard);
        }
        if let Some((low, high)) = token.split_once('-')
            && let (Some(low), Some(high)) = (Partial::parse(low), Partial::parse(high))
        {
            return Some(Self::Range(low, high));
        }
        Partial::parse(token).map(Self::Exact)
    }

    fn allows(self, candidate: RuntimeVersion) -> bool {
        match self {
            Self::Any => true,
            Self::Caret(bound) => {
                candidate.major() == bound.major
                    && bound.minor.is_none_or(|minor| candidate.minor() >= minor)
            },
            Self::Tilde(bound) | Self::Exact(bound) | Self::Wildcard(bound) => {
                bound.same_line(candidate)
            },
            Self::Compare(op, bound) => op.holds(candidate.triple(), bound.triple()),
            Self::Range(low, high) => {
                candidate.triple() >= low.triple()
                    && match high.minor {
                        Some(minor) => {
                            (candidate.major(), candidate.minor()) <= (high.major, minor)
                        },
                        None => candidate.major() <= high.major,
                    }
            },
        }
    }

    /// Smallest triple this term can accept; `None` when unbounded below.
    fn lower_bound(self) -> Option<Triple> {
        match self {
            Self::Any => None,
            Self::Caret(bound)
            | Self::Tilde(bound)
            | Self::Exact(bound)
            | Self::Wildcard(bound)
            | Self::Range(bound, _) => Some(bound.triple()),
            Self::Compare(Op::Ge | Op::Gt | Op::Eq, bound) => Some(bound.triple()),
            Self::Compare(Op::Lt | Op::Le | Op::Ne, _) => None,
        }
    }
}

/// A parsed runtime constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    raw: String,
    alternatives: Vec<Vec<Term>>,
}

impl Constraint {
    /// Parses `raw`. Returns `None` for input outside the dialect; callers treat that as
    /// "no constraint".
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let alternatives = raw
            .split("||")
            .flat_map(|group| group.split('|'))
            .map(parse_alternative)
            .collect::<Option<Vec<_>>>()?;
        Some(Self { raw: raw.trim().to_owned(), alternatives })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when any alternative accepts every candidate.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.alternatives.iter().any(|terms| terms.iter().all(|term| *term == Term::Any))
    }

    #[must_use]
    pub fn allows(&self, candidate: RuntimeVersion) -> bool {
        self.alternatives.iter().any(|terms| terms.iter().all(|term| term.allows(candidate)))
    }

    /// The lowest version the constraint could accept, as a `(major, minor, patch)` triple.
    ///
    /// Each alternative starts at the highest lower bound among its terms; the constraint
    /// starts at the lowest of those. Unbounded alternatives start at `(0, 0, 0)`.
    #[must_use]
    pub fn lowest_point(&self) -> (u32, u32, u32) {
        self.alternatives
            .iter()
            .map(|terms| {
                terms.iter().filter_map(|term| term.lower_bound()).max().unwrap_or_default()
            })
            .min()
            .unwrap_or_default()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_alternative(group: &str) -> Option<Vec<Term>> {
    let tokens: Vec<&str> =
        group.split([' ', ',', '\t']).map(str::trim).filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() {
        return None;
    }

    let mut terms = Vec::with_capacity(tokens.len());
    let mut index = 0;
    while index < tokens.len() {
        let token = tokens[index];
        // `8.1 - 8.3`
        if tokens.get(index + 1) == Some(&"-") {
            let low = Partial::parse(token)?;
            let high = Partial::parse(tokens.get(index + 2)?)?;
            terms.push(Term::Range(low, high));
            index += 3;
            continue;
        }
        // `>= 8.1`
        if let Some((op, "")) = Op::split(token) {
            let bound = Partial::parse(tokens.get(index + 1)?)?;
            terms.push(Term::Compare(op, bound));
            index += 2;
            continue;
        }
        terms.push(Term::parse(token)?);
        index += 1;
    }
    Some(terms)
}
