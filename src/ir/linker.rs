use indexmap::IndexMap;

use super::ir::{Fragment, Operation};
use crate::error::{Error, Result};

/// Links the operations and fragments of all walked documents together.
///
/// This enforces name uniqueness across documents, resolves every fragment
/// reference, computes each operation's transitive fragment closure, and attaches
/// the closure's source text to the operation.
pub(crate) fn link(
    mut operations: Vec<Operation>,
    fragments: Vec<Fragment>,
) -> Result<(Vec<Operation>, Vec<Fragment>)> {
    {
        let mut seen: IndexMap<String, &Operation> = IndexMap::new();
        for operation in operations.iter() {
            let key = format!(
                "{}.{}",
                formatted_package_name(&operation.file_path),
                operation.operation_name
            );
            if seen.insert(key, operation).is_some() {
                return Err(Error::new(
                    format!(
                        "There can be only one operation named '{}'",
                        operation.operation_name
                    ),
                    None,
                ));
            }
        }
    }

    let mut fragment_map: IndexMap<&str, &Fragment> = IndexMap::new();
    for fragment in fragments.iter() {
        if fragment_map
            .insert(fragment.fragment_name.as_str(), fragment)
            .is_some()
        {
            return Err(Error::new(
                format!(
                    "There can be only one fragment named '{}'",
                    fragment.fragment_name
                ),
                None,
            ));
        }
    }

    for fragment in fragments.iter() {
        for name in fragment.fragments_referenced.iter() {
            if !fragment_map.contains_key(name.as_str()) {
                return Err(undefined_fragment(name, &fragment.file_path));
            }
        }
    }

    for operation in operations.iter_mut() {
        // Worklist closure over fragment references, keeping first-reference order
        let mut closure: Vec<String> = operation.fragments_referenced.clone();
        let mut index = 0;
        while index < closure.len() {
            let name = closure[index].clone();
            index += 1;
            let fragment = fragment_map
                .get(name.as_str())
                .copied()
                .ok_or_else(|| undefined_fragment(&name, &operation.file_path))?;
            for nested in fragment.fragments_referenced.iter() {
                if !closure.contains(nested) {
                    closure.push(nested.clone());
                }
            }
        }

        let mut source_with_fragments = operation.source.clone();
        for name in closure.iter() {
            let fragment = fragment_map[name.as_str()];
            if !fragment.source.trim().is_empty() {
                source_with_fragments.push('\n');
                source_with_fragments.push_str(&fragment.source);
            }
        }

        operation.fragments_referenced = closure;
        operation.source_with_fragments = source_with_fragments;
    }

    Ok((operations, fragments))
}

fn undefined_fragment(name: &str, file_path: &str) -> Error {
    Error::new(
        format!("Undefined fragment '{}' referenced from '{}'", name, file_path),
        None,
    )
}

/// Derives the package an operation belongs to from its file path: the
/// project-relative directory with separators folded to `.` and each segment
/// stripped to identifier characters. The file name itself is dropped.
pub(crate) fn formatted_package_name(file_path: &str) -> String {
    let segments: Vec<&str> = file_path
        .split(|c| c == '/' || c == '\\')
        .collect();
    let directories = segments.len().saturating_sub(1);
    segments[..directories]
        .iter()
        .map(|segment| {
            segment
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::super::ir::OperationType;
    use super::*;

    fn operation(name: &str, file_path: &str, fragments_referenced: Vec<&str>) -> Operation {
        Operation {
            operation_name: name.to_string(),
            operation_type: OperationType::Query,
            variables: Vec::new(),
            source: format!("query {} {{ me }}", name),
            source_with_fragments: String::new(),
            fields: Vec::new(),
            fragments_referenced: fragments_referenced
                .into_iter()
                .map(|name| name.to_string())
                .collect(),
            file_path: file_path.to_string(),
            operation_id: String::new(),
        }
    }

    fn fragment(name: &str, fragments_referenced: Vec<&str>) -> Fragment {
        Fragment {
            fragment_name: name.to_string(),
            type_condition: "User".to_string(),
            possible_types: vec!["User".to_string()],
            source: format!("fragment {} on User {{ id }}", name),
            fields: Vec::new(),
            fragment_spreads: fragments_referenced
                .iter()
                .map(|name| name.to_string())
                .collect(),
            inline_fragments: Vec::new(),
            fragments_referenced: fragments_referenced
                .into_iter()
                .map(|name| name.to_string())
                .collect(),
            file_path: "src/fragments/Shared.graphql".to_string(),
        }
    }

    #[test]
    fn package_names() {
        assert_eq!(
            formatted_package_name("src/queries/Feed.graphql"),
            "src.queries"
        );
        assert_eq!(
            formatted_package_name("src\\queries\\Feed.graphql"),
            "src.queries"
        );
        assert_eq!(formatted_package_name("Feed.graphql"), "");
        assert_eq!(
            formatted_package_name("./src/api-v2/Feed.graphql"),
            "src.apiv2"
        );
    }

    #[test]
    fn duplicate_operations_in_one_package() {
        let operations = vec![
            operation("Feed", "src/queries/Feed.graphql", vec![]),
            operation("Feed", "src/queries/Other.graphql", vec![]),
        ];
        let error = link(operations, vec![]).unwrap_err();
        assert_eq!(
            error.message(),
            "There can be only one operation named 'Feed'"
        );
    }

    #[test]
    fn equally_named_operations_in_distinct_packages() {
        let operations = vec![
            operation("Feed", "src/queries/Feed.graphql", vec![]),
            operation("Feed", "src/admin/Feed.graphql", vec![]),
        ];
        link(operations, vec![]).unwrap();
    }

    #[test]
    fn duplicate_fragments() {
        let fragments = vec![fragment("UserBits", vec![]), fragment("UserBits", vec![])];
        let error = link(vec![], fragments).unwrap_err();
        assert_eq!(
            error.message(),
            "There can be only one fragment named 'UserBits'"
        );
    }

    #[test]
    fn undefined_fragment_reference() {
        let operations = vec![operation("Feed", "src/queries/Feed.graphql", vec!["Missing"])];
        let error = link(operations, vec![]).unwrap_err();
        assert_eq!(
            error.message(),
            "Undefined fragment 'Missing' referenced from 'src/queries/Feed.graphql'"
        );
    }

    #[test]
    fn undefined_fragment_reference_from_fragment() {
        let fragments = vec![fragment("UserBits", vec!["Gone"])];
        let error = link(vec![], fragments).unwrap_err();
        assert_eq!(
            error.message(),
            "Undefined fragment 'Gone' referenced from 'src/fragments/Shared.graphql'"
        );
    }

    #[test]
    fn transitive_sources_are_attached() {
        let operations = vec![operation("Feed", "src/queries/Feed.graphql", vec!["A"])];
        let fragments = vec![
            fragment("A", vec!["B"]),
            fragment("B", vec!["C"]),
            fragment("C", vec![]),
        ];
        let (operations, _) = link(operations, fragments).unwrap();
        let operation = &operations[0];
        assert_eq!(operation.fragments_referenced, vec!["A", "B", "C"]);
        assert_eq!(
            operation.source_with_fragments,
            "query Feed { me }\n\
             fragment A on User { id }\n\
             fragment B on User { id }\n\
             fragment C on User { id }"
        );
    }

    #[test]
    fn linking_is_idempotent_for_unreferenced_fragments() {
        let operations = vec![operation("Feed", "src/queries/Feed.graphql", vec![])];
        let fragments = vec![fragment("Unused", vec![])];
        let (operations, fragments) = link(operations, fragments).unwrap();
        assert_eq!(operations[0].source_with_fragments, operations[0].source);
        assert_eq!(fragments.len(), 1);
    }
}
