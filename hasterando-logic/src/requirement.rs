use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::CollectionState;

/// Boolean condition over a `CollectionState`. There is no negation, so every
/// requirement is monotonic: collecting more items can never make it false.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requirement {
    Free,
    Never,
    Item { name: String, count: usize },
    And(Vec<Requirement>),
    Or(Vec<Requirement>),
}

impl Requirement {
    pub fn make_item(name: &str, count: usize) -> Requirement {
        if count == 0 {
            Requirement::Free
        } else {
            Requirement::Item {
                name: name.to_string(),
                count,
            }
        }
    }

    pub fn make_and(reqs: Vec<Requirement>) -> Requirement {
        let mut out_reqs: Vec<Requirement> = vec![];
        for req in reqs {
            if let Requirement::Never = req {
                return Requirement::Never;
            } else if let Requirement::Free = req {
                continue;
            } else if let Requirement::And(and_reqs) = req {
                out_reqs.extend(and_reqs);
            } else {
                out_reqs.push(req);
            }
        }
        match out_reqs.len() {
            0 => Requirement::Free,
            1 => out_reqs.remove(0),
            _ => Requirement::And(out_reqs),
        }
    }

    pub fn make_or(reqs: Vec<Requirement>) -> Requirement {
        let mut out_reqs: Vec<Requirement> = vec![];
        for req in reqs {
            if let Requirement::Never = req {
                continue;
            } else if let Requirement::Free = req {
                return Requirement::Free;
            } else if let Requirement::Or(or_reqs) = req {
                out_reqs.extend(or_reqs);
            } else {
                out_reqs.push(req);
            }
        }
        match out_reqs.len() {
            0 => Requirement::Never,
            1 => out_reqs.remove(0),
            _ => Requirement::Or(out_reqs),
        }
    }

    pub fn is_satisfied(&self, state: &CollectionState) -> bool {
        match self {
            Requirement::Free => true,
            Requirement::Never => false,
            Requirement::Item { name, count } => state.has(name, *count),
            Requirement::And(reqs) => reqs.iter().all(|x| x.is_satisfied(state)),
            Requirement::Or(reqs) => reqs.iter().any(|x| x.is_satisfied(state)),
        }
    }
}

fn fmt_list(f: &mut Formatter<'_>, op: &str, reqs: &[Requirement]) -> fmt::Result {
    write!(f, "{op}(")?;
    for (i, req) in reqs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{req}")?;
    }
    write!(f, ")")
}

impl Display for Requirement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Free => write!(f, "Free"),
            Requirement::Never => write!(f, "Never"),
            Requirement::Item { name, count: 1 } => write!(f, "{name}"),
            Requirement::Item { name, count } => write!(f, "{name} x{count}"),
            Requirement::And(reqs) => fmt_list(f, "And", reqs),
            Requirement::Or(reqs) => fmt_list(f, "Or", reqs),
        }
    }
}
