//! Terms: the values templates are written in.
//!
//! A term is one of five kinds (IRI, blank node, literal, list, none) and is
//! additionally flagged as a variable or a constant. Variables only ever
//! matter for substitution; constants are compared structurally.

use regex_lite::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::vocab;

/// A blank node.
///
/// Nodes renamed during expansion carry the sites they were renamed at, so
/// they never equal a node read from input, whatever its label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankNode {
    label: String,
    sites: Vec<u64>,
}

impl BlankNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sites: Vec::new(),
        }
    }

    /// A node renamed at `sites`, innermost first. Used by readers to restore
    /// written expansion output.
    pub fn with_sites(label: impl Into<String>, sites: Vec<u64>) -> Self {
        Self {
            label: label.into(),
            sites,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sites(&self) -> &[u64] {
        &self.sites
    }

    /// True if the node was produced by renaming.
    pub fn is_fresh(&self) -> bool {
        !self.sites.is_empty()
    }

    /// A copy of this node unique to an expansion site.
    pub fn fresh(&self, site: u64) -> Self {
        let mut sites = self.sites.clone();
        sites.push(site);
        Self {
            label: self.label.clone(),
            sites,
        }
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.label)?;
        for site in &self.sites {
            write!(f, "_{}", site)?;
        }
        Ok(())
    }
}

/// A literal value with datatype and optional language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    lexical: String,
    datatype: String,
    language: Option<String>,
}

impl Literal {
    /// A literal with an explicit datatype.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// A language-tagged string.
    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: vocab::RDF_LANG_STRING.to_string(),
            language: Some(language.into()),
        }
    }

    /// A plain `xsd:string` literal.
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self::typed(lexical, vocab::XSD_STRING)
    }

    /// A literal typed from the shape of its lexical form.
    ///
    /// Booleans, integers and decimals are recognised; anything else is a
    /// plain string.
    pub fn infer(lexical: impl Into<String>) -> Self {
        let lexical = lexical.into();
        let datatype = lexical_datatype(&lexical);
        Self::typed(lexical, datatype)
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.lexical.replace('"', "\\\""))?;
        match &self.language {
            Some(lang) => write!(f, "@{}", lang),
            None if self.datatype == vocab::XSD_STRING => Ok(()),
            None => write!(f, "^^<{}>", self.datatype),
        }
    }
}

const LEXICAL_PATTERNS: [(&str, &str); 3] = [
    (r"^(true|false)$", vocab::XSD_BOOLEAN),
    (r"^[+-]?[0-9]+$", vocab::XSD_INTEGER),
    (r"^[+-]?[0-9]*\.[0-9]+$", vocab::XSD_DECIMAL),
];

fn lexical_datatype(lexical: &str) -> &'static str {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        LEXICAL_PATTERNS
            .iter()
            .filter_map(|(pattern, dt)| Regex::new(pattern).ok().map(|re| (re, *dt)))
            .collect()
    });
    patterns
        .iter()
        .find(|(re, _)| re.is_match(lexical))
        .map(|(_, dt)| *dt)
        .unwrap_or(vocab::XSD_STRING)
}

/// The kind of a term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TermKind {
    Iri(String),
    Blank(BlankNode),
    Literal(Literal),
    List(Vec<Term>),
    /// Explicit absence of a value.
    None,
}

/// A term together with its variable flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Term {
    kind: TermKind,
    variable: bool,
}

impl Term {
    fn constant(kind: TermKind) -> Self {
        Self {
            kind,
            variable: false,
        }
    }

    fn var(kind: TermKind) -> Self {
        Self {
            kind,
            variable: true,
        }
    }

    pub fn iri(iri: impl Into<String>) -> Self {
        Self::constant(TermKind::Iri(iri.into()))
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Self::constant(TermKind::Blank(BlankNode::new(label)))
    }

    pub fn literal(literal: Literal) -> Self {
        Self::constant(TermKind::Literal(literal))
    }

    pub fn list(items: Vec<Term>) -> Self {
        Self::constant(TermKind::List(items))
    }

    pub fn none() -> Self {
        Self::constant(TermKind::None)
    }

    /// A variable identified by a blank node label, the usual parameter form.
    pub fn var_blank(label: impl Into<String>) -> Self {
        Self::var(TermKind::Blank(BlankNode::new(label)))
    }

    /// A variable identified by an IRI.
    pub fn var_iri(iri: impl Into<String>) -> Self {
        Self::var(TermKind::Iri(iri.into()))
    }

    /// Build a term from a kind and flag. `None` is never a variable.
    pub fn from_parts(kind: TermKind, variable: bool) -> Self {
        let variable = variable && !matches!(kind, TermKind::None);
        Self { kind, variable }
    }

    pub fn kind(&self) -> &TermKind {
        &self.kind
    }

    pub fn into_kind(self) -> TermKind {
        self.kind
    }

    pub fn is_variable(&self) -> bool {
        self.variable
    }

    pub fn is_none(&self) -> bool {
        matches!(self.kind, TermKind::None)
    }

    pub fn is_blank(&self) -> bool {
        matches!(self.kind, TermKind::Blank(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, TermKind::List(_))
    }

    pub fn as_iri(&self) -> Option<&str> {
        match &self.kind {
            TermKind::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_blank(&self) -> Option<&BlankNode> {
        match &self.kind {
            TermKind::Blank(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            TermKind::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Term]> {
        match &self.kind {
            TermKind::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the more specific of two compatible terms.
    ///
    /// A variable unifies with anything. Two constants unify only when equal;
    /// lists unify element-wise. `None` only unifies with `None` or a variable.
    pub fn unify(&self, other: &Term) -> Option<Term> {
        if self.variable {
            return Some(other.clone());
        }
        if other.variable {
            return Some(self.clone());
        }
        match (&self.kind, &other.kind) {
            (TermKind::List(left), TermKind::List(right)) => {
                if left.len() != right.len() {
                    return None;
                }
                left.iter()
                    .zip(right)
                    .map(|(l, r)| l.unify(r))
                    .collect::<Option<Vec<_>>>()
                    .map(Term::list)
            }
            _ if self == other => Some(self.clone()),
            _ => None,
        }
    }

    /// A constant copy of this term with the same identifier.
    pub fn shallow_clone(&self) -> Term {
        Self::constant(self.kind.clone())
    }

    /// A copy with every variable, including nested list elements, made constant.
    pub fn interned(&self) -> Term {
        match &self.kind {
            TermKind::List(items) => Term::list(items.iter().map(Term::interned).collect()),
            _ => self.shallow_clone(),
        }
    }

    /// True if this term or any nested list element is a variable.
    pub fn has_variables(&self) -> bool {
        self.variable
            || self
                .as_list()
                .is_some_and(|items| items.iter().any(Term::has_variables))
    }

    /// Visit this term and every nested list element, depth first, with the
    /// list depth at which each occurs.
    pub fn walk<F: FnMut(&Term, usize)>(&self, f: &mut F) {
        self.walk_at(0, f);
    }

    fn walk_at<F: FnMut(&Term, usize)>(&self, depth: usize, f: &mut F) {
        f(self, depth);
        if let TermKind::List(items) = &self.kind {
            for item in items {
                item.walk_at(depth + 1, f);
            }
        }
    }

    /// Rebuild this term bottom-up, replacing every subterm for which `f`
    /// returns a value.
    pub fn map<F: Fn(&Term) -> Option<Term>>(&self, f: &F) -> Term {
        if let Some(replacement) = f(self) {
            return replacement;
        }
        match &self.kind {
            TermKind::List(items) => Term {
                kind: TermKind::List(items.iter().map(|t| t.map(f)).collect()),
                variable: self.variable,
            },
            _ => self.clone(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.variable {
            write!(f, "?")?;
        }
        match &self.kind {
            TermKind::Iri(iri) => write!(f, "<{}>", iri),
            TermKind::Blank(b) => write!(f, "{}", b),
            TermKind::Literal(l) => write!(f, "{}", l),
            TermKind::None => write!(f, "none"),
            TermKind::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::literal(literal)
    }
}

impl From<BlankNode> for Term {
    fn from(blank: BlankNode) -> Self {
        Term::constant(TermKind::Blank(blank))
    }
}
