//! Level 2 - List expansion.
//!
//! Two list arguments of lengths 2 and 3 under each expander.

use stencil_tests::prelude::*;

const RELATED: &str = "http://example.com/related";

fn ex(local: &str) -> String {
    format!("http://example.com/{}", local)
}

fn lists(name: &str, instances: &str) -> Scenario {
    Scenario::new(name)
        .templates("level-2/lists/templates.json")
        .instances(instances)
        .check(|a| a.passes().clean())
}

mod cross {
    use super::*;

    pub fn scenario() -> Scenario {
        lists("cross", "level-2/lists/cross.json").expand(|a| {
            a.count(6)
                .predicate_count(RELATED, 6)
                .triple(ex("a"), RELATED, ex("x"))
                .triple(ex("a"), RELATED, ex("z"))
                .triple(ex("b"), RELATED, ex("y"))
                .triple(ex("b"), RELATED, ex("z"))
        })
    }

    #[test]
    fn test_cross_yields_every_combination() {
        scenario().run().unwrap();
    }
}

mod zip_min {
    use super::*;

    pub fn scenario() -> Scenario {
        lists("zipMin", "level-2/lists/zipmin.json").expand(|a| {
            a.count(2)
                .triple(ex("a"), RELATED, ex("x"))
                .triple(ex("b"), RELATED, ex("y"))
        })
    }

    #[test]
    fn test_zip_min_stops_at_the_shortest_list() {
        scenario().run().unwrap();
    }
}

mod zip_max {
    use super::*;

    pub fn scenario() -> Scenario {
        lists("zipMax", "level-2/lists/zipmax.json").expand(|a| {
            a.count(3)
                .triple(ex("a"), RELATED, ex("x"))
                .triple(ex("b"), RELATED, ex("y"))
                .triple("none", RELATED, ex("z"))
                .passes()
        })
    }

    #[test]
    fn test_zip_max_pads_the_shorter_list_with_none() {
        scenario().run().unwrap();
    }
}
