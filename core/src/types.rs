//! The type lattice.
//!
//! Basic types form a tree rooted at `rdfs:Resource` with `ottr:Bot` below
//! every type. List types are covariant in their element type, non-empty
//! lists are a subtype of lists, and every list is a resource. `LUB<T>` is
//! the type of a constant known only to be some subtype of `T`.

use std::fmt;
use std::str::FromStr;

use crate::vocab::{self, Prefixes};
use crate::{CoreError, Term, TermKind};

/// Named types of the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BasicType {
    Top,
    Iri,
    Class,
    OwlClass,
    Restriction,
    Datatype,
    Property,
    ObjectProperty,
    DatatypeProperty,
    AnnotationProperty,
    NamedIndividual,
    Literal,
    String,
    LangString,
    Boolean,
    Decimal,
    Integer,
    NonNegativeInteger,
    Double,
    Float,
    Date,
    DateTime,
    AnyUri,
    Bot,
}

impl BasicType {
    pub const ALL: [BasicType; 24] = [
        BasicType::Top,
        BasicType::Iri,
        BasicType::Class,
        BasicType::OwlClass,
        BasicType::Restriction,
        BasicType::Datatype,
        BasicType::Property,
        BasicType::ObjectProperty,
        BasicType::DatatypeProperty,
        BasicType::AnnotationProperty,
        BasicType::NamedIndividual,
        BasicType::Literal,
        BasicType::String,
        BasicType::LangString,
        BasicType::Boolean,
        BasicType::Decimal,
        BasicType::Integer,
        BasicType::NonNegativeInteger,
        BasicType::Double,
        BasicType::Float,
        BasicType::Date,
        BasicType::DateTime,
        BasicType::AnyUri,
        BasicType::Bot,
    ];

    /// The IRI naming this type.
    pub fn iri(self) -> &'static str {
        match self {
            BasicType::Top => "http://www.w3.org/2000/01/rdf-schema#Resource",
            BasicType::Iri => "http://ns.ottr.xyz/0.4/IRI",
            BasicType::Class => "http://www.w3.org/2000/01/rdf-schema#Class",
            BasicType::OwlClass => "http://www.w3.org/2002/07/owl#Class",
            BasicType::Restriction => "http://www.w3.org/2002/07/owl#Restriction",
            BasicType::Datatype => "http://www.w3.org/2000/01/rdf-schema#Datatype",
            BasicType::Property => "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property",
            BasicType::ObjectProperty => "http://www.w3.org/2002/07/owl#ObjectProperty",
            BasicType::DatatypeProperty => "http://www.w3.org/2002/07/owl#DatatypeProperty",
            BasicType::AnnotationProperty => "http://www.w3.org/2002/07/owl#AnnotationProperty",
            BasicType::NamedIndividual => "http://www.w3.org/2002/07/owl#NamedIndividual",
            BasicType::Literal => "http://www.w3.org/2000/01/rdf-schema#Literal",
            BasicType::String => vocab::XSD_STRING,
            BasicType::LangString => vocab::RDF_LANG_STRING,
            BasicType::Boolean => vocab::XSD_BOOLEAN,
            BasicType::Decimal => vocab::XSD_DECIMAL,
            BasicType::Integer => vocab::XSD_INTEGER,
            BasicType::NonNegativeInteger => "http://www.w3.org/2001/XMLSchema#nonNegativeInteger",
            BasicType::Double => "http://www.w3.org/2001/XMLSchema#double",
            BasicType::Float => "http://www.w3.org/2001/XMLSchema#float",
            BasicType::Date => "http://www.w3.org/2001/XMLSchema#date",
            BasicType::DateTime => "http://www.w3.org/2001/XMLSchema#dateTime",
            BasicType::AnyUri => "http://www.w3.org/2001/XMLSchema#anyURI",
            BasicType::Bot => "http://ns.ottr.xyz/0.4/Bot",
        }
    }

    pub fn from_iri(iri: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.iri() == iri)
    }

    /// The immediate supertype. `Top` and `Bot` have none.
    pub fn parent(self) -> Option<BasicType> {
        use BasicType::*;
        match self {
            Top | Bot => None,
            Iri | Literal => Some(Top),
            Class | Property | NamedIndividual => Some(Iri),
            OwlClass | Datatype => Some(Class),
            Restriction => Some(OwlClass),
            ObjectProperty | DatatypeProperty | AnnotationProperty => Some(Property),
            String | LangString | Boolean | Decimal | Double | Float | Date | DateTime
            | AnyUri => Some(Literal),
            Integer => Some(Decimal),
            NonNegativeInteger => Some(Integer),
        }
    }

    /// This type followed by its supertypes, ending at `Top`.
    pub fn ancestors(self) -> impl Iterator<Item = BasicType> {
        std::iter::successors(Some(self), |t| t.parent())
    }

    pub fn is_subtype_of(self, other: BasicType) -> bool {
        self == BasicType::Bot || other == BasicType::Top || self.ancestors().any(|t| t == other)
    }

    /// Least upper bound.
    pub fn lub(self, other: BasicType) -> BasicType {
        if self == BasicType::Bot {
            return other;
        }
        if other == BasicType::Bot {
            return self;
        }
        self.ancestors()
            .find(|t| other.is_subtype_of(*t))
            .unwrap_or(BasicType::Top)
    }
}

/// A type in the lattice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Basic(BasicType),
    List(Box<Type>),
    NeList(Box<Type>),
    Lub(BasicType),
}

impl Type {
    pub fn top() -> Self {
        Type::Basic(BasicType::Top)
    }

    pub fn bot() -> Self {
        Type::Basic(BasicType::Bot)
    }

    pub fn list(inner: Type) -> Self {
        Type::List(Box::new(inner))
    }

    pub fn ne_list(inner: Type) -> Self {
        Type::NeList(Box::new(inner))
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Type::Basic(BasicType::Top))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Type::List(_) | Type::NeList(_))
    }

    /// Element type of a list type.
    pub fn inner(&self) -> Option<&Type> {
        match self {
            Type::List(inner) | Type::NeList(inner) => Some(inner),
            _ => None,
        }
    }

    /// The same type with every `LUB<T>` replaced by `T`.
    pub fn without_lub(&self) -> Type {
        match self {
            Type::Lub(t) => Type::Basic(*t),
            Type::List(inner) => Type::list(inner.without_lub()),
            Type::NeList(inner) => Type::ne_list(inner.without_lub()),
            Type::Basic(_) => self.clone(),
        }
    }

    pub fn is_subtype_of(&self, other: &Type) -> bool {
        match (self, other) {
            (_, Type::Basic(BasicType::Top)) => true,
            (Type::Basic(BasicType::Bot), _) => true,
            (Type::Lub(a), _) => Type::Basic(*a).is_subtype_of(other),
            (_, Type::Lub(b)) => self.is_subtype_of(&Type::Basic(*b)),
            (Type::Basic(a), Type::Basic(b)) => a.is_subtype_of(*b),
            (Type::NeList(a), Type::NeList(b))
            | (Type::NeList(a), Type::List(b))
            | (Type::List(a), Type::List(b)) => a.is_subtype_of(b),
            _ => false,
        }
    }

    /// Whether a value of this type may be passed where `other` is expected.
    ///
    /// Same as subtyping, except that `LUB<T>` is accepted by any type
    /// comparable with `T`.
    pub fn is_compatible_with(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Lub(a), _) => {
                let bound = Type::Basic(*a);
                bound.is_subtype_of(other) || other.without_lub().is_subtype_of(&bound)
            }
            (Type::NeList(a), Type::NeList(b))
            | (Type::NeList(a), Type::List(b))
            | (Type::List(a), Type::List(b)) => a.is_compatible_with(b),
            _ => self.is_subtype_of(other),
        }
    }

    /// Least upper bound.
    pub fn lub(&self, other: &Type) -> Type {
        match (self, other) {
            (Type::Basic(BasicType::Bot), t) | (t, Type::Basic(BasicType::Bot)) => t.clone(),
            (Type::Lub(a), Type::Lub(b)) => Type::Lub(a.lub(*b)),
            (Type::Lub(a), t) | (t, Type::Lub(a)) => Type::Basic(*a).lub(t),
            (Type::Basic(a), Type::Basic(b)) => Type::Basic(a.lub(*b)),
            (Type::NeList(a), Type::NeList(b)) => Type::ne_list(a.lub(b)),
            (Type::NeList(a), Type::List(b))
            | (Type::List(a), Type::NeList(b))
            | (Type::List(a), Type::List(b)) => Type::list(a.lub(b)),
            _ => Type::top(),
        }
    }

    /// The type a term carries by itself, without any declaration.
    pub fn of(term: &Term) -> Type {
        if term.is_variable() {
            return Type::top();
        }
        match term.kind() {
            TermKind::Iri(_) => Type::Lub(BasicType::Iri),
            TermKind::Blank(_) => Type::Lub(BasicType::Top),
            TermKind::Literal(literal) => Type::Basic(
                BasicType::from_iri(literal.datatype()).unwrap_or(BasicType::Literal),
            ),
            TermKind::None => Type::bot(),
            TermKind::List(items) if items.is_empty() => Type::list(Type::bot()),
            TermKind::List(items) => Type::ne_list(
                items
                    .iter()
                    .map(Type::of)
                    .fold(Type::bot(), |acc, t| acc.lub(&t)),
            ),
        }
    }

    fn fmt_basic(t: BasicType, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Prefixes::standard().compact(t.iri()) {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "<{}>", t.iri()),
        }
    }

    /// Parse a type expression, resolving names with `prefixes`.
    pub fn parse(expr: &str, prefixes: &Prefixes) -> Result<Type, CoreError> {
        let expr = expr.trim();
        let wrapped = |name: &str| {
            expr.strip_prefix(name)
                .and_then(|rest| rest.strip_prefix('<'))
                .and_then(|rest| rest.strip_suffix('>'))
        };
        if let Some(inner) = wrapped("NEList") {
            return Ok(Type::ne_list(Type::parse(inner, prefixes)?));
        }
        if let Some(inner) = wrapped("List") {
            return Ok(Type::list(Type::parse(inner, prefixes)?));
        }
        if let Some(inner) = wrapped("LUB") {
            return match Type::parse(inner, prefixes)? {
                Type::Basic(t) => Ok(Type::Lub(t)),
                _ => Err(CoreError::malformed_type(expr)),
            };
        }
        if expr.is_empty() || expr.contains(['<', '>']) && !expr.starts_with('<') {
            return Err(CoreError::malformed_type(expr));
        }
        let iri = prefixes.expand(expr)?;
        BasicType::from_iri(&iri)
            .map(Type::Basic)
            .ok_or_else(|| CoreError::unknown_type(expr))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Basic(t) => Type::fmt_basic(*t, f),
            Type::List(inner) => write!(f, "List<{}>", inner),
            Type::NeList(inner) => write!(f, "NEList<{}>", inner),
            Type::Lub(t) => {
                write!(f, "LUB<")?;
                Type::fmt_basic(*t, f)?;
                write!(f, ">")
            }
        }
    }
}

impl FromStr for Type {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Type::parse(s, &Prefixes::standard())
    }
}

impl From<BasicType> for Type {
    fn from(t: BasicType) -> Self {
        Type::Basic(t)
    }
}
