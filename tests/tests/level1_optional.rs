//! Level 1 - Optional arguments.
//!
//! An unbound optional argument suppresses only the base instances that
//! would have used it; defaults fill in where they are declared.

use stencil_tests::prelude::*;

const EX: &str = "http://example.com/";
const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

fn ex(local: &str) -> String {
    format!("{}{}", EX, local)
}

mod dropping {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("dropping")
            .templates("level-1/optional/templates.json")
            .instances("level-1/optional/instances.json")
            .check(|a| a.passes().clean())
            .expand(|a| {
                a.count(2)
                    .triple(ex("A"), RDF_TYPE, ex("Type1"))
                    .triple(ex("C"), RDF_TYPE, ex("Type3"))
                    .no_subject(ex("B"))
                    .passes()
            })
    }

    #[test]
    fn test_unbound_optional_drops_only_its_instance() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_dropping_is_the_same_in_parallel() {
        scenario()
            .settings(Settings::minimal().with_parallel(true))
            .run()
            .unwrap();
    }
}

mod defaults {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("defaults")
            .templates("level-1/optional/templates.json")
            .instances("level-1/optional/defaults.json")
            .expand(|a| {
                a.count(2)
                    .triple(ex("a"), RDFS_LABEL, "Alpha")
                    .triple(ex("b"), RDFS_LABEL, "unnamed")
            })
    }

    #[test]
    fn test_absent_argument_takes_the_default() {
        scenario().run().unwrap();
    }
}
