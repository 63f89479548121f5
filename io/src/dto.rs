//! Serde shapes of the JSON format and their conversion to the model.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use stencil_core::{BlankNode, Literal, Prefixes, Term, TermKind, Type};
use stencil_registry::{
    Argument, ArgumentList, Instance, ListExpander, Parameter, Template, TemplateBuilder,
};

use crate::{FormatError, FormatResult};

fn is_false(v: &bool) -> bool {
    !v
}

// ── Documents ──

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateDocument<T = Value> {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub prefixes: BTreeMap<String, String>,
    #[serde(default)]
    pub templates: Vec<T>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceDocument<T = Value> {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub prefixes: BTreeMap<String, String>,
    #[serde(default)]
    pub instances: Vec<T>,
}

/// The standard prefixes overridden by a document's own.
pub fn document_prefixes(declared: &BTreeMap<String, String>) -> Prefixes {
    let mut prefixes = Prefixes::standard();
    for (prefix, namespace) in declared {
        prefixes.insert(prefix.clone(), namespace.clone());
    }
    prefixes
}

// ── Templates ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDto {
    pub iri: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<InstanceDto>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub base: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDto {
    pub variable: TermDto,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(rename = "nonBlank", default, skip_serializing_if = "is_false")]
    pub non_blank: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<TermDto>,
}

impl TemplateDto {
    pub fn from_template(template: &Template) -> Self {
        Self {
            iri: template.iri().to_string(),
            parameters: template.parameters().iter().map(ParameterDto::from_parameter).collect(),
            body: template
                .body
                .as_ref()
                .map(|body| body.iter().map(InstanceDto::from_instance).collect()),
            base: template.is_base(),
        }
    }

    pub fn to_template(&self, prefixes: &Prefixes) -> FormatResult<Template> {
        let parameters = self
            .parameters
            .iter()
            .map(|p| p.to_parameter(prefixes))
            .collect::<FormatResult<Vec<_>>>()?;
        let mut builder = TemplateBuilder::new(prefixes.expand(&self.iri)?).params(parameters);
        if self.base {
            builder = builder.base();
        }
        if let Some(body) = &self.body {
            builder = builder.empty_body();
            for instance in body {
                builder = builder.instance(instance.to_instance(prefixes)?);
            }
        }
        Ok(builder.build()?)
    }
}

impl ParameterDto {
    pub fn from_parameter(parameter: &Parameter) -> Self {
        Self {
            variable: TermDto::from_term(&parameter.term),
            ty: parameter.declared.as_ref().map(Type::to_string),
            optional: parameter.optional,
            non_blank: parameter.non_blank,
            default: parameter.default.as_ref().map(TermDto::from_term),
        }
    }

    pub fn to_parameter(&self, prefixes: &Prefixes) -> FormatResult<Parameter> {
        let mut parameter = Parameter::new(self.variable.to_term(prefixes)?);
        parameter.declared = self
            .ty
            .as_deref()
            .map(|ty| Type::parse(ty, prefixes))
            .transpose()?;
        parameter.optional = self.optional;
        parameter.non_blank = self.non_blank;
        parameter.default = self
            .default
            .as_ref()
            .map(|d| d.to_term(prefixes))
            .transpose()?;
        Ok(parameter)
    }
}

// ── Instances ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceDto {
    pub template: String,
    #[serde(default)]
    pub arguments: Vec<ArgumentDto>,
    #[serde(rename = "listExpander", default, skip_serializing_if = "Option::is_none")]
    pub list_expander: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentDto {
    Expanded { expand: TermDto },
    Plain(TermDto),
}

impl InstanceDto {
    pub fn from_instance(instance: &Instance) -> Self {
        let arguments = instance.arguments();
        Self {
            template: instance.template().to_string(),
            arguments: arguments
                .iter()
                .map(|a| {
                    let term = TermDto::from_term(&a.value);
                    if a.list_expand {
                        ArgumentDto::Expanded { expand: term }
                    } else {
                        ArgumentDto::Plain(term)
                    }
                })
                .collect(),
            list_expander: (arguments.expander() != ListExpander::None)
                .then(|| arguments.expander().name().to_string()),
        }
    }

    pub fn to_instance(&self, prefixes: &Prefixes) -> FormatResult<Instance> {
        let expander = match &self.list_expander {
            None => ListExpander::None,
            Some(name) => ListExpander::from_name(name)
                .ok_or_else(|| FormatError::UnknownExpander(name.clone()))?,
        };
        let arguments = self
            .arguments
            .iter()
            .map(|a| match a {
                ArgumentDto::Expanded { expand } => expand.to_term(prefixes).map(Argument::expanded),
                ArgumentDto::Plain(term) => term.to_term(prefixes).map(Argument::new),
            })
            .collect::<FormatResult<Vec<_>>>()?;
        let arguments = ArgumentList::new(arguments, expander);
        arguments.validate()?;
        Ok(Instance::with_arguments(prefixes.expand(&self.template)?, arguments))
    }
}

// ── Terms ──

/// A term: a bare name, an auto-typed scalar or a tagged object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TermDto {
    Bool(bool),
    Number(Number),
    Name(String),
    Tagged(TaggedTerm),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaggedTerm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<TermDto>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub none: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub var: bool,
    /// Expansion sites of a renamed blank node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sites: Vec<u64>,
}

impl TermDto {
    /// The tagged form of `term`.
    pub fn from_term(term: &Term) -> Self {
        let mut tagged = TaggedTerm {
            var: term.is_variable(),
            ..TaggedTerm::default()
        };
        match term.kind() {
            TermKind::Iri(iri) => tagged.iri = Some(iri.clone()),
            TermKind::Blank(blank) => {
                tagged.blank = Some(blank.label().to_string());
                tagged.sites = blank.sites().to_vec();
            }
            TermKind::Literal(literal) => {
                tagged.literal = Some(literal.lexical().to_string());
                match literal.language() {
                    Some(lang) => tagged.lang = Some(lang.to_string()),
                    None => tagged.datatype = Some(literal.datatype().to_string()),
                }
            }
            TermKind::List(items) => tagged.list = Some(items.iter().map(TermDto::from_term).collect()),
            TermKind::None => tagged.none = true,
        }
        TermDto::Tagged(tagged)
    }

    pub fn to_term(&self, prefixes: &Prefixes) -> FormatResult<Term> {
        match self {
            TermDto::Bool(b) => Ok(Term::literal(Literal::infer(b.to_string()))),
            TermDto::Number(n) => Ok(Term::literal(Literal::infer(n.to_string()))),
            TermDto::Name(name) => name_to_term(name, prefixes),
            TermDto::Tagged(tagged) => tagged.to_term(prefixes),
        }
    }
}

impl TaggedTerm {
    fn to_term(&self, prefixes: &Prefixes) -> FormatResult<Term> {
        let given = [
            self.iri.is_some(),
            self.blank.is_some(),
            self.literal.is_some(),
            self.list.is_some(),
            self.none,
        ]
        .into_iter()
        .filter(|given| *given)
        .count();
        if given != 1 {
            return Err(FormatError::malformed_term(
                "a term object needs exactly one of iri, blank, literal, list or none",
            ));
        }
        if !self.sites.is_empty() && self.blank.is_none() {
            return Err(FormatError::malformed_term("sites are only allowed on blank nodes"));
        }

        let kind = if let Some(iri) = &self.iri {
            TermKind::Iri(prefixes.expand(iri)?)
        } else if let Some(label) = &self.blank {
            TermKind::Blank(BlankNode::with_sites(label.as_str(), self.sites.clone()))
        } else if let Some(lexical) = &self.literal {
            TermKind::Literal(match (&self.lang, &self.datatype) {
                (Some(lang), _) => Literal::lang(lexical.as_str(), lang.as_str()),
                (None, Some(datatype)) => Literal::typed(lexical.as_str(), prefixes.expand(datatype)?),
                (None, None) => Literal::plain(lexical.as_str()),
            })
        } else if let Some(items) = &self.list {
            TermKind::List(
                items
                    .iter()
                    .map(|item| item.to_term(prefixes))
                    .collect::<FormatResult<_>>()?,
            )
        } else {
            TermKind::None
        };
        Ok(Term::from_parts(kind, self.var))
    }
}

/// `<iri>`, an absolute IRI or a prefixed name.
fn name_pattern() -> Option<&'static Regex> {
    static NAME: OnceLock<Option<Regex>> = OnceLock::new();
    NAME.get_or_init(|| Regex::new(r#"^(<[^<>"\s]*>|[A-Za-z][A-Za-z0-9+.\-]*:[^<>"\s]*|:[^<>"\s]*)$"#).ok())
        .as_ref()
}

/// Bare names: `_:label` is a blank node, `?label` a variable, anything
/// else an IRI or prefixed name.
fn name_to_term(name: &str, prefixes: &Prefixes) -> FormatResult<Term> {
    if let Some(label) = name.strip_prefix("_:").filter(|l| !l.is_empty()) {
        return Ok(Term::blank(label));
    }
    if let Some(label) = name.strip_prefix('?').filter(|l| !l.is_empty()) {
        return Ok(Term::var_blank(label));
    }
    if !name_pattern().map_or(true, |re| re.is_match(name)) {
        return Err(FormatError::malformed_term(name));
    }
    Ok(Term::iri(prefixes.expand(name)?))
}
