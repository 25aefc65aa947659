//! Flattening of the module / folder / endpoint tree.

use log::warn;

use crate::model::EndpointNode;

/// Endpoint ids in module, child, grandchild order.
///
/// Only two levels below the modules are read: a module's direct endpoints
/// and the endpoints of its folders. Folders nested inside folders are
/// skipped with a warning, as are endpoints placed directly at the top level.
pub fn flatten_endpoint_ids(modules: &[EndpointNode]) -> Vec<String> {
    let mut ids = Vec::new();
    for module in modules {
        if let Some(api) = &module.api {
            warn!("skipping endpoint {} placed outside of any module", api.id);
        }
        for child in &module.children {
            if let Some(api) = &child.api {
                ids.push(api.id.clone());
                continue;
            }
            for grandchild in &child.children {
                match &grandchild.api {
                    Some(api) => ids.push(api.id.clone()),
                    None => warn!(
                        "skipping folder '{}' nested deeper than two levels in '{}'",
                        grandchild.name.as_deref().unwrap_or_default(),
                        module.name.as_deref().unwrap_or_default(),
                    ),
                }
            }
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> Vec<EndpointNode> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_flatten_order() {
        let modules = tree(json!([
            {"name": "users", "children": [
                {"api": {"id": 1}},
                {"name": "admin", "children": [{"api": {"id": 2}}, {"api": {"id": 3}}]},
                {"api": {"id": 4}}
            ]},
            {"name": "orders", "children": [{"api": {"id": "5"}}]}
        ]));
        assert_eq!(flatten_endpoint_ids(&modules), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_deeper_folders_are_omitted() {
        let modules = tree(json!([
            {"name": "m", "children": [
                {"name": "f1", "children": [
                    {"api": {"id": 1}},
                    {"name": "f2", "children": [{"api": {"id": 99}}]}
                ]}
            ]}
        ]));
        assert_eq!(flatten_endpoint_ids(&modules), vec!["1"]);
    }

    #[test]
    fn test_empty_tree() {
        assert!(flatten_endpoint_ids(&[]).is_empty());
        let modules = tree(json!([{"name": "empty"}, {"api": {"id": 8}}]));
        assert!(flatten_endpoint_ids(&modules).is_empty());
    }
}
