//! Test utilities for Retest Core

use crate::model::{MethodRef, Node, TestUniverse};

/// A node header frame as the call-graph engine renders it.
pub fn node_frame(loader: &str, class: &str, selector: &str) -> String {
    format!("Node: < {}, {}, {} > Context: Everywhere", loader, class, selector)
}

/// An invocation frame as the call-graph engine renders it.
pub fn call_frame(loader: &str, class: &str, selector: &str) -> String {
    format!(" invokevirtual < {}, {}, {} >@0", loader, class, selector)
}

/// Build a descriptor: application caller plus `(loader, class, selector)` callees.
pub fn descriptor(caller: (&str, &str), callees: &[(&str, &str, &str)]) -> String {
    let mut out = node_frame("Application", caller.0, caller.1);
    for (loader, class, selector) in callees {
        out.push_str("\n -");
        out.push_str(&call_frame(loader, class, selector));
    }
    out
}

/// Method node for an internal class descriptor and selector.
pub fn method(class: &str, selector: &str) -> Node {
    Node::from_method_ref(&MethodRef::new(class, selector))
}

pub const CALC: &str = "Lnet/mooctest/Calc";
pub const CALC_TEST: &str = "Lnet/mooctest/CalcTest";
pub const CALC_HELPER: &str = "Lnet/mooctest/CalcTestHelper";
pub const SERVICE: &str = "Lnet/mooctest/Service";
pub const SERVICE_TEST: &str = "Lnet/mooctest/ServiceTest";

/// A small project: two test classes, a helper whose name contains a test
/// class name, and a service sitting between a test and the calculator.
pub fn sample_descriptors() -> Vec<String> {
    vec![
        descriptor(
            (CALC_TEST, "testAdd()V"),
            &[
                ("Application", CALC, "<init>()V"),
                ("Application", CALC, "add(II)I"),
                ("Primordial", "Ljava/lang/Object", "<init>()V"),
            ],
        ),
        descriptor(
            (SERVICE_TEST, "testCompute()V"),
            &[
                ("Application", SERVICE, "<init>()V"),
                ("Application", SERVICE, "compute()I"),
            ],
        ),
        descriptor(
            (SERVICE, "compute()I"),
            &[
                ("Application", CALC, "add(II)I"),
                ("Primordial", "Ljava/lang/Math", "abs(I)I"),
            ],
        ),
        descriptor((CALC_HELPER, "helper()V"), &[("Application", CALC, "add(II)I")]),
        descriptor((CALC, "add(II)I"), &[("Primordial", "Ljava/lang/Math", "addExact(II)I")]),
        descriptor((CALC_TEST, "<init>()V"), &[("Primordial", "Ljava/lang/Object", "<init>()V")]),
    ]
}

pub fn sample_universe() -> TestUniverse {
    [
        method(CALC_TEST, "testAdd()V"),
        method(CALC_TEST, "testUnused()V"),
        method(SERVICE_TEST, "testCompute()V"),
    ]
    .into_iter()
    .collect()
}

pub fn sample_test_names() -> Vec<String> {
    vec!["CalcTest".to_string(), "ServiceTest".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::parse_descriptor;

    #[test]
    fn test_fixture_descriptors_parse() {
        for d in sample_descriptors() {
            assert!(parse_descriptor(&d).is_ok(), "fixture should parse: {}", d);
        }
    }
}
