//! DOM structure snapshots.

use serde::{Deserialize, Serialize};

/// One node of the page structure tree.
///
/// `tag` and `depth` are always present; every other field is omitted from
/// the serialized form when the underlying value is empty or absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomNode {
	pub tag: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default, rename = "class", skip_serializing_if = "Option::is_none")]
	pub class_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub widget_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub key: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
	pub depth: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub children: Option<Vec<DomNode>>,
}

impl DomNode {
	/// Indented one-node-per-line rendering for the interactive `structure`
	/// command. Long text is elided to keep the tree readable.
	pub fn render_tree(&self) -> String {
		let mut out = String::new();
		self.render_into(&mut out);
		out
	}

	fn render_into(&self, out: &mut String) {
		let indent = " ".repeat(self.depth as usize * 2);
		out.push_str(&indent);
		out.push_str("- ");
		out.push_str(&self.tag);
		if let Some(widget_type) = &self.widget_type {
			out.push_str(&format!(" ({widget_type})"));
		}
		if let Some(text) = &self.text {
			if !text.is_empty() && text.len() < 30 {
				out.push_str(&format!(": {text}"));
			}
		}
		out.push('\n');
		if let Some(children) = &self.children {
			for child in children {
				child.render_into(out);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn leaf(tag: &str, depth: u32) -> DomNode {
		DomNode {
			tag: tag.into(),
			id: None,
			class_name: None,
			widget_type: None,
			key: None,
			text: None,
			depth,
			children: None,
		}
	}

	#[test]
	fn serialization_omits_absent_fields() {
		let json = serde_json::to_value(leaf("BODY", 0)).unwrap();
		assert_eq!(json, serde_json::json!({ "tag": "BODY", "depth": 0 }));
	}

	#[test]
	fn serialization_keeps_present_fields() {
		let node = DomNode {
			text: Some("Communities".into()),
			widget_type: Some("TextButton".into()),
			..leaf("FLT-SEMANTICS", 3)
		};
		let json = serde_json::to_value(node).unwrap();
		assert_eq!(
			json,
			serde_json::json!({
				"tag": "FLT-SEMANTICS",
				"widgetType": "TextButton",
				"text": "Communities",
				"depth": 3,
			})
		);
	}

	#[test]
	fn deserializes_page_shaped_json() {
		let json = serde_json::json!({
			"tag": "BODY",
			"class": "flt-glass",
			"depth": 0,
			"children": [{ "tag": "DIV", "depth": 1 }],
		});
		let node: DomNode = serde_json::from_value(json).unwrap();
		assert_eq!(node.class_name.as_deref(), Some("flt-glass"));
		assert_eq!(node.children.as_ref().unwrap().len(), 1);
	}

	#[test]
	fn render_tree_indents_by_depth_and_elides_long_text() {
		let node = DomNode {
			children: Some(vec![
				DomNode {
					text: Some("Communities".into()),
					..leaf("DIV", 1)
				},
				DomNode {
					text: Some("x".repeat(80)),
					..leaf("SPAN", 1)
				},
			]),
			..leaf("BODY", 0)
		};
		let tree = node.render_tree();
		assert!(tree.contains("- BODY\n"));
		assert!(tree.contains("  - DIV: Communities\n"));
		assert!(tree.contains("  - SPAN\n"));
		assert!(!tree.contains(&"x".repeat(80)));
	}
}
