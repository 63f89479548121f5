//! Arguments and list expansion.

use std::fmt;

use stencil_core::{Term, TermKind};

use crate::{RegistryError, RegistryResult};

/// How list-expansion arguments of an instance are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ListExpander {
    /// No expansion; lists are passed as single values.
    #[default]
    None,
    /// Cartesian product, rightmost list varying fastest.
    Cross,
    /// Position-wise, as many instances as the shortest list.
    ZipMin,
    /// Position-wise, as many instances as the longest list, padding with `none`.
    ZipMax,
}

impl ListExpander {
    pub fn name(self) -> &'static str {
        match self {
            ListExpander::None => "none",
            ListExpander::Cross => "cross",
            ListExpander::ZipMin => "zipMin",
            ListExpander::ZipMax => "zipMax",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            ListExpander::None,
            ListExpander::Cross,
            ListExpander::ZipMin,
            ListExpander::ZipMax,
        ]
        .into_iter()
        .find(|e| e.name() == name)
    }
}

impl fmt::Display for ListExpander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An actual argument of an instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Argument {
    pub value: Term,
    pub list_expand: bool,
}

impl Argument {
    pub fn new(value: Term) -> Self {
        Self {
            value,
            list_expand: false,
        }
    }

    /// An argument marked for list expansion.
    pub fn expanded(value: Term) -> Self {
        Self {
            value,
            list_expand: true,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.list_expand {
            write!(f, "++")?;
        }
        write!(f, "{}", self.value)
    }
}

/// The arguments of an instance together with its list expander.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ArgumentList {
    arguments: Vec<Argument>,
    expander: ListExpander,
}

impl ArgumentList {
    pub fn new(arguments: Vec<Argument>, expander: ListExpander) -> Self {
        Self {
            arguments,
            expander,
        }
    }

    /// Plain arguments without list expansion.
    pub fn from_terms(terms: Vec<Term>) -> Self {
        Self::new(terms.into_iter().map(Argument::new).collect(), ListExpander::None)
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.arguments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.arguments.iter()
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.arguments.iter().map(|a| &a.value)
    }

    pub fn expander(&self) -> ListExpander {
        self.expander
    }

    pub fn has_expansion(&self) -> bool {
        self.arguments.iter().any(|a| a.list_expand)
    }

    /// A list expander is set if and only if some argument is marked.
    pub fn validate(&self) -> RegistryResult<()> {
        match (self.expander, self.has_expansion()) {
            (ListExpander::None, true) => Err(RegistryError::ExpanderMissing),
            (expander, false) if expander != ListExpander::None => {
                Err(RegistryError::NothingToExpand(expander))
            }
            _ => Ok(()),
        }
    }

    /// Rebuild with every term mapped through `f`, keeping flags and expander.
    pub fn map_terms<F: FnMut(&Term) -> Term>(&self, mut f: F) -> ArgumentList {
        ArgumentList {
            arguments: self
                .arguments
                .iter()
                .map(|a| Argument {
                    value: f(&a.value),
                    list_expand: a.list_expand,
                })
                .collect(),
            expander: self.expander,
        }
    }

    /// Apply list expansion.
    ///
    /// Returns one argument list per generated instance, none of them marked
    /// for expansion. Without an expander the list is returned unchanged.
    pub fn expand(&self) -> RegistryResult<Vec<ArgumentList>> {
        self.validate()?;
        if self.expander == ListExpander::None {
            return Ok(vec![self.clone()]);
        }

        let positions: Vec<usize> = self
            .arguments
            .iter()
            .enumerate()
            .filter(|(_, a)| a.list_expand)
            .map(|(i, _)| i)
            .collect();

        let mut lists = Vec::with_capacity(positions.len());
        for &index in &positions {
            let value = &self.arguments[index].value;
            let items = match value.kind() {
                _ if value.is_variable() => {
                    return Err(RegistryError::unexpandable(index, value.to_string()))
                }
                TermKind::List(items) => items.clone(),
                TermKind::None => vec![Term::none()],
                TermKind::Blank(_) => {
                    return Err(RegistryError::unexpandable(index, value.to_string()))
                }
                _ => return Err(RegistryError::not_a_list(index, value.to_string())),
            };
            lists.push(items);
        }

        let rows = match self.expander {
            ListExpander::Cross => cartesian(&lists),
            ListExpander::ZipMin => {
                let len = lists.iter().map(Vec::len).min().unwrap_or(0);
                zip(&lists, len)
            }
            ListExpander::ZipMax => {
                let len = lists.iter().map(Vec::len).max().unwrap_or(0);
                zip(&lists, len)
            }
            ListExpander::None => Vec::new(),
        };

        Ok(rows
            .into_iter()
            .map(|row| self.with_values(&positions, row))
            .collect())
    }

    fn with_values(&self, positions: &[usize], row: Vec<Term>) -> ArgumentList {
        let mut arguments: Vec<Argument> = self
            .arguments
            .iter()
            .map(|a| Argument::new(a.value.clone()))
            .collect();
        for (&index, value) in positions.iter().zip(row) {
            arguments[index].value = value;
        }
        ArgumentList::new(arguments, ListExpander::None)
    }
}

fn cartesian(lists: &[Vec<Term>]) -> Vec<Vec<Term>> {
    let mut rows = vec![Vec::with_capacity(lists.len())];
    for list in lists {
        rows = rows
            .into_iter()
            .flat_map(|row| {
                list.iter().map(move |item| {
                    let mut next = row.clone();
                    next.push(item.clone());
                    next
                })
            })
            .collect();
    }
    rows
}

fn zip(lists: &[Vec<Term>], len: usize) -> Vec<Vec<Term>> {
    (0..len)
        .map(|i| {
            lists
                .iter()
                .map(|list| list.get(i).cloned().unwrap_or_else(Term::none))
                .collect()
        })
        .collect()
}

impl fmt::Display for ArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}
