//! Level 3 - Rewriting.
//!
//! Expanding base instances changes nothing, and templates can be
//! rewritten into bodies of base instances only.

use stencil_tests::prelude::*;

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

fn ex(local: &str) -> String {
    format!("http://example.com/{}", local)
}

mod herd {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("herd")
            .with_standard_library()
            .templates("level-3/rewrite/templates.json")
            .instances("level-3/rewrite/instances.json")
            .check(|a| a.passes().clean())
            .expand(|a| {
                a.count(8)
                    .predicate_count(RDF_TYPE, 4)
                    .predicate_count(RDFS_LABEL, 4)
                    .triple(ex("rex"), RDFS_LABEL, "Rex")
                    .triple(ex("a"), RDF_TYPE, ex("Animal"))
                    .triple(ex("c"), RDF_TYPE, ex("Animal"))
                    .triple(ex("b"), RDFS_LABEL, "none")
            })
    }

    #[test]
    fn test_list_expansion_with_unnamed_animals() {
        scenario().run().unwrap();
    }
}

mod direct {
    use std::fs;

    use pretty_assertions::assert_eq;
    use stencil_core::{vocab, Outcome};
    use stencil_expander::Expander;
    use stencil_session::Session;

    use super::*;

    fn fixture(name: &str) -> String {
        let path = format!(
            "{}/fixtures/level-3/rewrite/{}",
            env!("CARGO_MANIFEST_DIR"),
            name
        );
        fs::read_to_string(path).unwrap()
    }

    fn session() -> Session {
        let mut session = Session::open(Settings::new().with_parallel(false)).unwrap();
        assert_eq!(session.read_templates("json", &fixture("templates.json")), 2);
        session
    }

    #[test]
    fn test_expanding_base_instances_is_idempotent() {
        // GIVEN
        let mut session = session();
        let roots = session.read_instances("json", &fixture("instances.json"));
        let triples = session.expand(&roots);

        // WHEN
        let expander = Expander::new(session.store());
        let (again, diagnostics) = Outcome::gather(expander.expand(&triples));

        // THEN
        assert!(diagnostics.is_empty());
        assert_eq!(again, triples);
    }

    #[test]
    fn test_rewritten_templates_call_only_base_templates() {
        // GIVEN
        let mut session = session();

        // WHEN
        let rewritten = session.expand_templates();

        // THEN - Herd keeps its list expansion over an unbound parameter
        let animal = rewritten
            .iter()
            .find(|t| t.iri() == ex("Animal"))
            .unwrap();
        assert!(animal
            .body()
            .iter()
            .all(|i| i.template() == vocab::TRIPLE || i.template() == vocab::NULLABLE_TRIPLE));
        let herd = rewritten.iter().find(|t| t.iri() == ex("Herd")).unwrap();
        assert!(herd.body().iter().all(|i| i.arguments().has_expansion()));
    }

    #[test]
    fn test_rewriting_twice_changes_nothing() {
        // GIVEN
        let mut session = session();
        let once = session.expand_templates();

        // WHEN
        let text = session.write_templates("json", &once).unwrap();
        let mut second = Session::open(Settings::new().with_parallel(false)).unwrap();
        second.read_templates("json", &text);
        let twice = second.expand_templates();

        // THEN
        assert_eq!(twice, once);
    }
}
