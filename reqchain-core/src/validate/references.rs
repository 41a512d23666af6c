use std::collections::BTreeSet;

use crate::error::Violation;
use crate::expressions::parse_template;
use crate::types::WorkflowDefinition;
use crate::validate::Validator;

/// Warn about placeholders that no earlier step extracts.
///
/// Such placeholders are sent literally at run time. This never blocks an import or a run;
/// the violations are advisory.
pub fn lint_references(def: &WorkflowDefinition) -> Vec<Violation> {
    let mut v = Validator::new();
    let mut known = BTreeSet::<String>::new();

    let mut order: Vec<usize> = (0..def.steps.len()).collect();
    order.sort_by_key(|i| def.steps[*i].order);

    for idx in order {
        let step = &def.steps[idx];
        let base = format!("$.steps[{idx}].request");
        let req = &step.request;

        check(&mut v, &known, &format!("{base}.path"), &req.path);
        for (k, val) in &req.headers {
            check(&mut v, &known, &format!("{base}.headers.{k}"), val);
        }
        for (k, val) in &req.query_params {
            check(&mut v, &known, &format!("{base}.queryParams.{k}"), val);
        }
        if let Some(body) = &req.body {
            check(&mut v, &known, &format!("{base}.body"), body);
        }

        known.extend(step.extractions.iter().map(|e| e.name.clone()));
    }

    v.into_violations()
}

fn check(v: &mut Validator, known: &BTreeSet<String>, path: &str, text: &str) {
    for name in parse_template(text).placeholder_names() {
        if !known.contains(name) {
            let msg = format!("references {{{{{name}}}}} which no earlier step extracts");
            v.push(path, format!("{msg}; it will be sent literally"));
        }
    }
}
