//! Element descriptors and lookup criteria.
//!
//! Descriptors are read-only snapshots of one DOM node's identifying
//! attributes and screen rectangle, produced by the page-side scan. They are
//! stale after the next render frame and are consumed immediately, usually to
//! compute a click point.

use serde::{Deserialize, Serialize};

/// A point in CSS pixels, viewport-relative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

/// Bounding rectangle of a DOM element in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl BoundingRect {
	/// Midpoint of the rectangle, the synthetic click target.
	pub fn center(&self) -> Point {
		Point {
			x: self.x + self.width / 2.0,
			y: self.y + self.height / 2.0,
		}
	}
}

/// Snapshot of one matched DOM node.
///
/// The schema is fixed: `tag` and `rect` are always present, the rest mirror
/// the target app's attribute convention (`data-flutter-key`,
/// `data-flutter-widget-type`) and visible text, absent when the node does
/// not carry them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
	pub tag: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub key: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub widget_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
	#[serde(default)]
	pub rect: BoundingRect,
}

impl ElementDescriptor {
	/// Click point for this element.
	pub fn center(&self) -> Point {
		self.rect.center()
	}
}

/// Lookup criteria for the page-side element scan.
///
/// Criteria combine with logical OR; matches come back in DOM traversal
/// order with no ranking. An empty query matches nothing and is answered
/// locally without touching the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementQuery {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub key: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub widget_type: Option<String>,
}

impl ElementQuery {
	pub fn text(text: impl Into<String>) -> Self {
		Self {
			text: Some(text.into()),
			..Self::default()
		}
	}

	pub fn key(key: impl Into<String>) -> Self {
		Self {
			key: Some(key.into()),
			..Self::default()
		}
	}

	pub fn widget_type(widget_type: impl Into<String>) -> Self {
		Self {
			widget_type: Some(widget_type.into()),
			..Self::default()
		}
	}

	pub fn is_empty(&self) -> bool {
		self.key.is_none() && self.text.is_none() && self.widget_type.is_none()
	}
}

/// Outcome of a click-by-visible-text attempt.
///
/// Tagged so callers cannot index into data that was never found. A
/// `Clicked` outcome records what was hit and where; it does not verify that
/// the page reacted to the click.
#[derive(Debug, Clone, PartialEq)]
pub enum TextClick {
	Clicked {
		descriptor: ElementDescriptor,
		point: Point,
	},
	NotFound,
}

impl TextClick {
	pub fn clicked(&self) -> bool {
		matches!(self, TextClick::Clicked { .. })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rect_center_is_the_midpoint() {
		let rect = BoundingRect {
			x: 10.0,
			y: 20.0,
			width: 100.0,
			height: 40.0,
		};
		assert_eq!(rect.center(), Point { x: 60.0, y: 40.0 });
	}

	#[test]
	fn query_with_no_criteria_is_empty() {
		assert!(ElementQuery::default().is_empty());
		assert!(!ElementQuery::text("Login").is_empty());
		assert!(!ElementQuery::key("nav-home").is_empty());
		assert!(!ElementQuery::widget_type("ElevatedButton").is_empty());
	}

	#[test]
	fn query_serializes_only_supplied_criteria() {
		let json = serde_json::to_value(ElementQuery::text("Communities")).unwrap();
		assert_eq!(json, serde_json::json!({ "text": "Communities" }));
	}

	#[test]
	fn descriptor_tolerates_extra_rect_fields() {
		// getBoundingClientRect().toJSON() also carries top/right/bottom/left.
		let json = serde_json::json!({
			"tag": "FLT-SEMANTICS",
			"text": "Communities",
			"rect": { "x": 10.0, "y": 20.0, "width": 100.0, "height": 40.0,
			          "top": 20.0, "left": 10.0, "right": 110.0, "bottom": 60.0 }
		});
		let descriptor: ElementDescriptor = serde_json::from_value(json).unwrap();
		assert_eq!(descriptor.center(), Point { x: 60.0, y: 40.0 });
		assert_eq!(descriptor.key, None);
	}

	#[test]
	fn text_click_not_found_is_not_clicked() {
		assert!(!TextClick::NotFound.clicked());
	}
}
