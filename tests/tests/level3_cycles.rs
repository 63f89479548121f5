//! Level 3 - Cyclic templates.
//!
//! A template referring to itself, directly or through another, is an
//! error for the checker and stops the expander before it starts.

use stencil_tests::prelude::*;

fn cycles() -> Scenario {
    Scenario::new("cycles")
        .templates("level-3/cycles/templates.json")
        .instances("level-3/cycles/instances.json")
}

mod checked {
    use super::*;

    pub fn scenario() -> Scenario {
        cycles()
            .check(|a| a.fails().error("dependency cycle"))
            .expand(|a| a.empty().fails())
    }

    #[test]
    fn test_checker_reports_cycles_and_halts() {
        scenario().run().unwrap();
    }
}

mod unchecked {
    use super::*;

    pub fn scenario() -> Scenario {
        cycles()
            .settings(Settings::minimal().with_check(false))
            .check(|a| a.passes())
            .expand(|a| {
                a.empty()
                    .fatal("cyclic template dependencies")
                    .message_pattern(r"http://example\.com/Loop.*http://example\.com/Ping")
            })
    }

    #[test]
    fn test_expander_refuses_cyclic_store() {
        scenario().run().unwrap();
    }
}

mod direct {
    use stencil_core::Term;
    use stencil_registry::{Instance, Parameter, TemplateBuilder, TemplateStore};

    #[test]
    fn test_detect_cycles_names_every_member() {
        // GIVEN
        let mut store = TemplateStore::new();
        let calls = |iri: &str, callee: &str| {
            TemplateBuilder::new(iri)
                .param(Parameter::new(Term::var_blank("x")))
                .instance(Instance::new(callee, vec![Term::var_blank("x")]))
                .build()
                .unwrap()
        };
        store.register(calls("urn:Self", "urn:Self")).unwrap();
        store.register(calls("urn:A", "urn:B")).unwrap();
        store.register(calls("urn:B", "urn:A")).unwrap();
        store.register(calls("urn:C", "urn:A")).unwrap();

        // WHEN
        let cyclic = store.detect_cycles();

        // THEN - C only reaches the cycle
        assert_eq!(
            cyclic.into_iter().collect::<Vec<_>>(),
            vec!["urn:A", "urn:B", "urn:Self"]
        );
    }
}
