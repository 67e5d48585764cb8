//! Static page host.
//!
//! A page fixture is a JSON document describing a laid-out page: the
//! viewport, the document root, and a flat list of elements in tree order.
//! [`StaticPage`] answers element lookups and layout reads from it, which is
//! enough to drive full measurement cycles without a browser.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use geometry_perceiver::{LayoutFrame, LayoutReadError, LayoutReader};
use serde::{Deserialize, Serialize};
use slot_locator::{ElementLookup, ElementQuery, LookupError, DATA_ADUNIT_CODE, DATA_AD_UNIT};
use stretch_core_types::{BoundingBox, ComputedStyle, ElementRef, Viewport};

use crate::errors::RtdError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageFixture {
    pub viewport: Viewport,
    pub root: ElementRef,
    #[serde(default)]
    pub elements: Vec<ElementFixture>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElementFixture {
    pub node: ElementRef,
    #[serde(default)]
    pub parent: Option<ElementRef>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    pub rect: RectFixture,
    #[serde(default)]
    pub style: ComputedStyle,
}

/// Border box as reported by `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RectFixture {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

struct PageElement {
    node: ElementRef,
    parent: Option<ElementRef>,
    id: Option<String>,
    class_attr: String,
    attributes: BTreeMap<String, String>,
    rect: BoundingBox,
    style: ComputedStyle,
}

impl PageElement {
    fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            "class" if !self.class_attr.is_empty() => Some(self.class_attr.as_str()),
            _ => self.attributes.get(name).map(String::as_str),
        }
    }
}

struct PageFrame {
    viewport: Viewport,
    root: ElementRef,
    elements: Vec<PageElement>,
    index: HashMap<ElementRef, usize>,
}

impl PageFrame {
    fn element(&self, node: ElementRef) -> Result<&PageElement, LayoutReadError> {
        self.index
            .get(&node)
            .map(|&at| &self.elements[at])
            .ok_or(LayoutReadError::UnknownElement(node))
    }
}

impl LayoutFrame for PageFrame {
    fn viewport(&self) -> Result<Viewport, LayoutReadError> {
        Ok(self.viewport)
    }

    fn bounding_box(&self, element: ElementRef) -> Result<BoundingBox, LayoutReadError> {
        Ok(self.element(element)?.rect)
    }

    fn computed_style(&self, element: ElementRef) -> Result<ComputedStyle, LayoutReadError> {
        Ok(self.element(element)?.style)
    }

    fn parent(&self, element: ElementRef) -> Result<Option<ElementRef>, LayoutReadError> {
        Ok(self.element(element)?.parent)
    }

    fn is_document_root(&self, element: ElementRef) -> bool {
        element == self.root
    }
}

/// An immutable laid-out page. Every [`LayoutReader::freeze`] returns the
/// same frame.
#[derive(Clone)]
pub struct StaticPage {
    frame: Arc<PageFrame>,
}

impl StaticPage {
    pub fn from_fixture(fixture: PageFixture) -> Result<Self, RtdError> {
        let mut index = HashMap::with_capacity(fixture.elements.len());
        let mut elements = Vec::with_capacity(fixture.elements.len());
        for (at, element) in fixture.elements.into_iter().enumerate() {
            if index.insert(element.node, at).is_some() {
                return Err(RtdError::Fixture(format!(
                    "duplicate element {}",
                    element.node
                )));
            }
            let rect = element.rect;
            elements.push(PageElement {
                node: element.node,
                parent: element.parent,
                id: element.id,
                class_attr: element.classes.join(" "),
                attributes: element.attributes,
                rect: BoundingBox::from_xywh(rect.x, rect.y, rect.width, rect.height),
                style: element.style,
            });
        }

        if let Some(orphan) = elements
            .iter()
            .filter_map(|element| element.parent)
            .find(|parent| *parent != fixture.root && !index.contains_key(parent))
        {
            return Err(RtdError::Fixture(format!(
                "parent {} is not declared",
                orphan
            )));
        }

        Ok(Self {
            frame: Arc::new(PageFrame {
                viewport: fixture.viewport,
                root: fixture.root,
                elements,
                index,
            }),
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, RtdError> {
        Self::from_fixture(serde_json::from_str(raw)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, RtdError> {
        Self::from_fixture(serde_json::from_value(value)?)
    }

    pub fn load(path: &Path) -> Result<Self, RtdError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| RtdError::Fixture(format!("{}: {}", path.display(), err)))?;
        Self::from_json(&raw)
    }

    pub fn viewport(&self) -> Viewport {
        self.frame.viewport
    }

    /// Ad unit codes declared through data attributes, in tree order.
    pub fn declared_slots(&self) -> Vec<String> {
        let mut slots: Vec<String> = Vec::new();
        for element in &self.frame.elements {
            let code = element
                .attribute(DATA_ADUNIT_CODE)
                .or_else(|| element.attribute(DATA_AD_UNIT));
            if let Some(code) = code {
                if !slots.iter().any(|known| known == code) {
                    slots.push(code.to_string());
                }
            }
        }
        slots
    }
}

impl ElementLookup for StaticPage {
    fn query(&self, query: &ElementQuery) -> Result<Option<ElementRef>, LookupError> {
        Ok(self
            .frame
            .elements
            .iter()
            .find(|element| query.matches(|name| element.attribute(name)))
            .map(|element| element.node))
    }
}

impl LayoutReader for StaticPage {
    fn freeze(&self) -> Result<Arc<dyn LayoutFrame>, LayoutReadError> {
        let frame: Arc<dyn LayoutFrame> = self.frame.clone();
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page() -> StaticPage {
        StaticPage::from_value(json!({
            "viewport": {"width": 1280.0, "height": 800.0},
            "root": 1,
            "elements": [
                {"node": 1, "rect": {"x": 0.0, "y": 0.0, "width": 1280.0, "height": 3000.0}},
                {"node": 2, "parent": 1, "id": "content", "classes": ["main", "wrap"],
                 "rect": {"x": 40.0, "y": 0.0, "width": 1200.0, "height": 3000.0}},
                {"node": 3, "parent": 2, "id": "div-gpt-ad-top",
                 "attributes": {"data-adunit-code": "top"},
                 "rect": {"x": 40.0, "y": 20.0, "width": 728.0, "height": 90.0}},
                {"node": 4, "parent": 2, "classes": ["ad-slot", "sidebar-unit"],
                 "attributes": {"data-ad-unit": "side"},
                 "rect": {"x": 900.0, "y": 200.0, "width": 300.0, "height": 600.0},
                 "style": {"display": "block", "position": "sticky"}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn queries_follow_tree_order() {
        let page = page();
        let by_class = ElementQuery::AttributeContains {
            name: "class".into(),
            value: "a".into(),
        };
        assert_eq!(page.query(&by_class).unwrap(), Some(ElementRef(2)));

        let by_id = ElementQuery::ById {
            id: "div-gpt-ad-top".into(),
        };
        assert_eq!(page.query(&by_id).unwrap(), Some(ElementRef(3)));

        let missing = ElementQuery::AttributeEquals {
            name: DATA_ADUNIT_CODE.into(),
            value: "footer".into(),
        };
        assert_eq!(page.query(&missing).unwrap(), None);
    }

    #[test]
    fn frame_reads_fixture_layout() {
        let page = page();
        let frame = page.freeze().unwrap();
        let rect = frame.bounding_box(ElementRef(3)).unwrap();
        assert_eq!(rect.right, 768.0);
        assert_eq!(rect.bottom, 110.0);
        assert_eq!(frame.parent(ElementRef(3)).unwrap(), Some(ElementRef(2)));
        assert!(frame.is_document_root(ElementRef(1)));
        assert!(matches!(
            frame.bounding_box(ElementRef(99)),
            Err(LayoutReadError::UnknownElement(ElementRef(99)))
        ));
    }

    #[test]
    fn declared_slots_come_from_data_attributes() {
        assert_eq!(page().declared_slots(), vec!["top", "side"]);
    }

    #[test]
    fn rejects_duplicate_and_dangling_nodes() {
        let duplicate = StaticPage::from_value(json!({
            "viewport": {"width": 100.0, "height": 100.0},
            "root": 1,
            "elements": [
                {"node": 1, "rect": {"x": 0.0, "y": 0.0, "width": 1.0, "height": 1.0}},
                {"node": 1, "rect": {"x": 0.0, "y": 0.0, "width": 1.0, "height": 1.0}}
            ]
        }));
        assert!(matches!(duplicate, Err(RtdError::Fixture(_))));

        let dangling = StaticPage::from_value(json!({
            "viewport": {"width": 100.0, "height": 100.0},
            "root": 1,
            "elements": [
                {"node": 2, "parent": 7, "rect": {"x": 0.0, "y": 0.0, "width": 1.0, "height": 1.0}}
            ]
        }));
        assert!(matches!(dangling, Err(RtdError::Fixture(_))));
    }
}
