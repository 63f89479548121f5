//! Level 2 - Partial failure.
//!
//! Broken templates are reported one by one; unrelated templates still
//! check and expand.

use stencil_core::Severity;
use stencil_tests::prelude::*;

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

fn errors() -> Scenario {
    Scenario::new("errors")
        .templates("level-2/errors/templates.json")
        .instances("level-2/errors/instances.json")
}

mod default_threshold {
    use super::*;

    pub fn scenario() -> Scenario {
        errors()
            .check(|a| {
                a.fails()
                    .error("Malformed item 5")
                    .error("Wrong number of arguments")
                    .error("incompatible with ottr:IRI")
                    .error("depends on failing template http://example.com/WrongArity")
                    .warning("is not used in the body")
            })
            .expand(|a| a.empty())
    }

    #[test]
    fn test_every_problem_is_reported_and_expansion_halts() {
        scenario().run().unwrap();
    }
}

mod fatal_threshold {
    use super::*;

    pub fn scenario() -> Scenario {
        errors()
            .settings(Settings::minimal().with_fail_on(Severity::Fatal))
            .check(|a| a.passes())
            .expand(|a| {
                a.count(2)
                    .triple("http://example.com/a", RDF_TYPE, "http://example.com/Good")
                    .triple("http://example.com/c", RDF_TYPE, "http://example.com/Good")
                    .error("Reference to undefined template http://example.com/Nowhere")
                    .passes()
            })
    }

    #[test]
    fn test_good_roots_expand_next_to_broken_ones() {
        scenario().run().unwrap();
    }
}
