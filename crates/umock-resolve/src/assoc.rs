//! Associated-type constraint solving over a flattened interface family.
//!
//! The inputs are every interface in the inheritance closure of a mocked
//! interface, base-most last. Abstract member types are collected uniquely by
//! name in declaration order. Constraints are folded into two maps: a
//! same-type map where a later requirement overwrites an earlier one, and a
//! conformance map where requirements accumulate in encounter order without
//! deduplication. Abstract types with a same-type equivalence are *derived*
//! (they become alias members of the mock); the rest are *primary* (they
//! become generic parameters of the mock).

use crate::collector::TypeInfo;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;
use umock_syntax::members::GenericConstraint;
use umock_syntax::types::TypeExpr;

/// One abstract member type after constraint solving.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAssociatedType {
    pub name: String,
    /// Accumulated conformance requirements, in encounter order. Repeated
    /// requirements repeat here.
    pub conformances: Vec<TypeExpr>,
    /// Winning same-type equivalence, when any constraint pinned this type.
    pub equivalent: Option<TypeExpr>,
}

impl ResolvedAssociatedType {
    pub fn is_derived(&self) -> bool {
        self.equivalent.is_some()
    }
}

/// Solves associated-type constraints for one interface family.
pub struct AssociatedTypeResolver {
    resolved: Vec<ResolvedAssociatedType>,
}

impl AssociatedTypeResolver {
    /// Solve over `family`, every interface in one inheritance closure.
    pub fn solve(family: &[&TypeInfo]) -> Self {
        let mut order: Vec<String> = Vec::new();
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut conformances: IndexMap<String, Vec<TypeExpr>> = IndexMap::new();
        let mut same_type: IndexMap<String, TypeExpr> = IndexMap::new();

        // First declaration of a name wins the declaration slot; its inline
        // conformance list and attached constraints still accumulate from
        // every re-declaration.
        for info in family {
            for assoc in &info.associated_types {
                if seen.insert(assoc.name.clone()) {
                    order.push(assoc.name.clone());
                }
            }
        }

        for info in family {
            for assoc in &info.associated_types {
                conformances
                    .entry(assoc.name.clone())
                    .or_default()
                    .extend(assoc.conformances.iter().cloned());
                fold_constraints(&assoc.constraints, &seen, &mut conformances, &mut same_type);
            }
            fold_constraints(&info.constraints, &seen, &mut conformances, &mut same_type);
        }

        let resolved = order
            .into_iter()
            .map(|name| ResolvedAssociatedType {
                conformances: conformances.get(&name).cloned().unwrap_or_default(),
                equivalent: same_type.get(&name).cloned(),
                name,
            })
            .collect();
        Self { resolved }
    }

    pub fn all(&self) -> &[ResolvedAssociatedType] {
        &self.resolved
    }

    /// Abstract types with no same-type pin, in declaration order. These
    /// become the mock's generic parameters.
    pub fn primary(&self) -> impl Iterator<Item = &ResolvedAssociatedType> {
        self.resolved.iter().filter(|assoc| !assoc.is_derived())
    }

    /// Abstract types pinned to a concrete equivalent. These become alias
    /// members of the mock.
    pub fn derived(&self) -> impl Iterator<Item = &ResolvedAssociatedType> {
        self.resolved.iter().filter(|assoc| assoc.is_derived())
    }
}

fn fold_constraints(
    constraints: &[GenericConstraint],
    names: &FxHashSet<String>,
    conformances: &mut IndexMap<String, Vec<TypeExpr>>,
    same_type: &mut IndexMap<String, TypeExpr>,
) {
    for constraint in constraints {
        match constraint {
            GenericConstraint::Conformance { left, right } => {
                if let Some(name) = referenced_name(left, names) {
                    conformances
                        .entry(name.to_string())
                        .or_default()
                        .push(right.clone());
                }
            }
            GenericConstraint::SameType { left, right } => {
                // Either side may name the abstract type; the other side is
                // the equivalent. A later requirement overwrites.
                let (name, equivalent) = if let Some(name) = referenced_name(left, names) {
                    (name, right)
                } else if let Some(name) = referenced_name(right, names) {
                    (name, left)
                } else {
                    continue;
                };
                if let Some(previous) = same_type.insert(name.to_string(), equivalent.clone()) {
                    debug!(
                        name,
                        previous = %previous,
                        winner = %equivalent,
                        "conflicting same-type requirements; last one wins"
                    );
                }
            }
        }
    }
}

/// The abstract-type name an expression refers to, if any. Both the bare
/// `T` spelling and the qualified `Self.T` spelling count.
fn referenced_name<'e>(expr: &'e TypeExpr, names: &FxHashSet<String>) -> Option<&'e str> {
    match expr {
        TypeExpr::Identifier { name, generic_args } if generic_args.is_empty() => {
            names.contains(name).then_some(name.as_str())
        }
        TypeExpr::Member { base, name } => match base.as_ref() {
            TypeExpr::Identifier {
                name: base_name,
                generic_args,
            } if base_name == "Self" && generic_args.is_empty() => {
                names.contains(name).then_some(name.as_str())
            }
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::TypeCollector;
    use umock_syntax::decl::{Decl, SourceUnit, TypeDecl, TypeKind};
    use umock_syntax::members::{AssociatedTypeDecl, Member};
    use umock_syntax::parse_type;

    fn interface(name: &str, members: Vec<Member>) -> TypeInfo {
        let unit = SourceUnit::new(vec![Decl::Type(
            TypeDecl::new(TypeKind::Interface, name).with_members(members),
        )]);
        TypeCollector::collect_units(&[unit], "mock").remove(0)
    }

    fn assoc(name: &str, conformances: &[&str]) -> AssociatedTypeDecl {
        let mut decl = AssociatedTypeDecl::new(name);
        decl.conformances = conformances
            .iter()
            .map(|text| parse_type(text).unwrap())
            .collect();
        decl
    }

    #[test]
    fn test_unpinned_types_are_primary() {
        let base = interface(
            "Repository",
            vec![
                Member::AssociatedType(assoc("Element", &["Hashable"])),
                Member::AssociatedType(assoc("Key", &[])),
            ],
        );
        let solved = AssociatedTypeResolver::solve(&[&base]);
        let primary: Vec<&str> = solved.primary().map(|a| a.name.as_str()).collect();
        assert_eq!(primary, vec!["Element", "Key"]);
        assert_eq!(solved.derived().count(), 0);
    }

    #[test]
    fn test_same_type_pin_makes_type_derived() {
        let mut base = interface(
            "Repository",
            vec![Member::AssociatedType(assoc("Element", &[]))],
        );
        base.constraints.push(GenericConstraint::SameType {
            left: parse_type("Element").unwrap(),
            right: parse_type("String").unwrap(),
        });
        let solved = AssociatedTypeResolver::solve(&[&base]);
        let derived: Vec<_> = solved.derived().collect();
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].equivalent, Some(parse_type("String").unwrap()));
        assert_eq!(solved.primary().count(), 0);
    }

    #[test]
    fn test_later_same_type_requirement_overwrites() {
        let mut narrow = interface(
            "Narrow",
            vec![Member::AssociatedType(assoc("Element", &[]))],
        );
        narrow.constraints.push(GenericConstraint::SameType {
            left: parse_type("Element").unwrap(),
            right: parse_type("Int").unwrap(),
        });
        let mut wide = interface("Wide", vec![]);
        wide.constraints.push(GenericConstraint::SameType {
            left: parse_type("Self.Element").unwrap(),
            right: parse_type("String").unwrap(),
        });

        let solved = AssociatedTypeResolver::solve(&[&narrow, &wide]);
        let element = &solved.all()[0];
        assert_eq!(element.equivalent, Some(parse_type("String").unwrap()));
    }

    #[test]
    fn test_flipped_same_type_sides_still_pin() {
        let mut base = interface(
            "Source",
            vec![Member::AssociatedType(assoc("Output", &[]))],
        );
        base.constraints.push(GenericConstraint::SameType {
            left: parse_type("[Data]").unwrap(),
            right: parse_type("Output").unwrap(),
        });
        let solved = AssociatedTypeResolver::solve(&[&base]);
        assert_eq!(
            solved.all()[0].equivalent,
            Some(parse_type("[Data]").unwrap())
        );
    }

    #[test]
    fn test_conformances_accumulate_without_dedup() {
        let parent = interface(
            "Parent",
            vec![Member::AssociatedType(assoc("Element", &["Hashable"]))],
        );
        let mut child = interface(
            "Child",
            vec![Member::AssociatedType(assoc("Element", &["Hashable"]))],
        );
        child.constraints.push(GenericConstraint::Conformance {
            left: parse_type("Element").unwrap(),
            right: parse_type("Codable").unwrap(),
        });

        let solved = AssociatedTypeResolver::solve(&[&parent, &child]);
        let element = &solved.all()[0];
        let spelled: Vec<String> = element
            .conformances
            .iter()
            .map(|ty| ty.to_string())
            .collect();
        // The repeated `Hashable` is kept; accumulation never deduplicates.
        assert_eq!(spelled, vec!["Hashable", "Hashable", "Codable"]);
    }

    #[test]
    fn test_first_declaration_fixes_order() {
        let first = interface(
            "First",
            vec![
                Member::AssociatedType(assoc("B", &[])),
                Member::AssociatedType(assoc("A", &[])),
            ],
        );
        let second = interface(
            "Second",
            vec![
                Member::AssociatedType(assoc("A", &[])),
                Member::AssociatedType(assoc("C", &[])),
            ],
        );
        let solved = AssociatedTypeResolver::solve(&[&first, &second]);
        let names: Vec<&str> = solved.all().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }
}
