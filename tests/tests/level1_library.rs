//! Level 1 - Standard library.
//!
//! User templates built on the bundled o-rdf, o-rdfs and o-owl templates.

use stencil_tests::prelude::*;

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
const OWL_ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
const OWL_SOME_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#someValuesFrom";

fn ex(local: &str) -> String {
    format!("http://example.com/{}", local)
}

mod ontology {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("ontology")
            .with_standard_library()
            .templates("level-1/library/templates.json")
            .instances("level-1/library/instances.json")
            .check(|a| a.passes())
            .expand(|a| {
                a.count(12)
                    .triple(ex("Dog"), RDF_TYPE, OWL_CLASS)
                    .triple(ex("Dog"), RDFS_LABEL, "Dog")
                    .triple(ex("Dog"), RDFS_SUBCLASS_OF, ex("Animal"))
                    .triple(ex("Dog"), RDFS_SUBCLASS_OF, ex("Pet"))
                    .triple(ex("Dog"), RDFS_SUBCLASS_OF, "_:restriction")
                    .triple("_:restriction", OWL_ON_PROPERTY, ex("hasPart"))
                    .triple("_:restriction", OWL_SOME_VALUES_FROM, ex("Tail"))
                    .predicate_count(RDFS_SUBCLASS_OF, 4)
                    .predicate_count(OWL_ON_PROPERTY, 2)
                    .passes()
            })
    }

    #[test]
    fn test_library_templates_expand_to_triples() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_library_templates_expand_in_parallel() {
        scenario()
            .settings(Settings::new().with_parallel(true))
            .run()
            .unwrap();
    }
}

mod isolation {
    use pretty_assertions::assert_eq;
    use stencil_core::{vocab, Term};
    use stencil_expander::Expander;
    use stencil_io::FormatManager;
    use stencil_registry::{Instance, Region, TemplateStore};

    use super::*;

    fn store() -> TemplateStore {
        let library = stencil_library::load_standard_library(&FormatManager::default())
            .into_value()
            .unwrap();
        TemplateStore::with_standard_library(library).unwrap()
    }

    #[test]
    fn test_library_is_shared_but_not_user_visible() {
        // GIVEN
        let first = store();
        let second = store();

        // THEN
        assert!(first.all_user_template_iris().is_empty());
        assert!(!first.all_standard_library_iris().is_empty());
        assert_eq!(
            first.all_standard_library_iris(),
            second.all_standard_library_iris()
        );
        assert_eq!(
            first.region_of("http://tpl.ottr.xyz/owl/declaration/0.1/Class"),
            Some(Region::Library)
        );
        assert_eq!(first.region_of(vocab::TRIPLE), Some(Region::Builtin));
    }

    #[test]
    fn test_restrictions_get_distinct_blank_nodes() {
        // GIVEN
        let store = store();
        let expander = Expander::new(&store);
        let axiom = |class: &str| {
            Instance::new(
                "http://tpl.ottr.xyz/owl/axiom/0.1/SubObjectSomeValuesFrom",
                vec![Term::iri(ex(class)), Term::iri(ex("hasPart")), Term::iri(ex("Tail"))],
            )
        };

        // WHEN
        let (triples, diagnostics) = expander.expand_parallel(&[axiom("Dog"), axiom("Cat")]);

        // THEN - each root names its own restriction
        assert!(diagnostics.is_empty());
        let restrictions: std::collections::BTreeSet<String> = triples
            .iter()
            .filter_map(|t| t.terms().next())
            .filter(|s| s.is_blank())
            .map(ToString::to_string)
            .collect();
        assert_eq!(restrictions.len(), 2);
    }
}
