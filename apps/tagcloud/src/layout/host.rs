//! The two collaborators a layout pass talks to: the text measurement oracle
//! and the visual host that owns the container and its elements.
//!
//! `HeadlessHost` is an in-memory host used by the HTTP front end and tests.
//! It sizes elements with the same `TextMeasurer` the pass measures with, so
//! live boxes agree with measured boxes unless a test deliberately skews them.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::layout::geometry::{Point, Rect, Size};

// ────────────────────────────────────────────────────────────────────────────
// Measurement oracle
// ────────────────────────────────────────────────────────────────────────────

/// Rendered size of a topic's text at a given tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasuredBox {
    pub width: f64,
    pub height: f64,
    /// CSS-style font size, e.g. `"18px"`.
    pub font_size: String,
}

impl MeasuredBox {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Synchronous text measurement. Must agree with how the host renders tiers.
pub trait TextMeasurer: Send + Sync {
    fn measure(&self, text: &str, tier: u8) -> MeasuredBox;
}

// ────────────────────────────────────────────────────────────────────────────
// Visual host
// ────────────────────────────────────────────────────────────────────────────

/// Everything the host needs to realize one placed topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSpec {
    pub id: String,
    pub class_name: String,
    pub text: String,
    pub href: String,
    pub title: String,
    pub tier: u8,
    pub font_size: String,
    pub data_attributes: BTreeMap<String, String>,
    pub position: Point,
}

/// The container and element surface a layout pass renders into.
pub trait CloudHost {
    type Handle: Clone;

    fn container_size(&self) -> Size;
    fn is_visible(&self) -> bool;
    /// Resizes the container and offsets it by `margin` inside its parent.
    fn resize_container(&mut self, size: Size, margin: Point);
    /// Removes every element and resets any applied scale.
    fn clear_container(&mut self);
    fn create_element(&mut self, spec: &ElementSpec) -> Self::Handle;
    /// Current on-screen box of an element, in unscaled container coordinates.
    fn live_box(&self, handle: &Self::Handle) -> Rect;
    fn apply_uniform_scale(&mut self, factor: f64);
    fn translate_element(&mut self, handle: &Self::Handle, dx: f64, dy: f64);
}

// ────────────────────────────────────────────────────────────────────────────
// Headless host
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlessElement {
    pub spec: ElementSpec,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl HeadlessElement {
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.left + self.width,
            self.top + self.height,
        )
    }
}

pub struct HeadlessHost {
    size: Size,
    margin: Point,
    visible: bool,
    scale: f64,
    measurer: Arc<dyn TextMeasurer>,
    elements: Vec<HeadlessElement>,
}

impl HeadlessHost {
    pub fn new(size: Size, measurer: Arc<dyn TextMeasurer>) -> Self {
        Self {
            size,
            margin: Point::default(),
            visible: true,
            scale: 1.0,
            measurer,
            elements: Vec::new(),
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn margin(&self) -> Point {
        self.margin
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn elements(&self) -> &[HeadlessElement] {
        &self.elements
    }

    pub fn element(&self, id: &str) -> Option<&HeadlessElement> {
        self.elements.iter().find(|e| e.spec.id == id)
    }
}

impl CloudHost for HeadlessHost {
    /// Index into the element list.
    type Handle = usize;

    fn container_size(&self) -> Size {
        self.size
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn resize_container(&mut self, size: Size, margin: Point) {
        self.size = size;
        self.margin = margin;
    }

    fn clear_container(&mut self) {
        self.elements.clear();
        self.scale = 1.0;
    }

    fn create_element(&mut self, spec: &ElementSpec) -> usize {
        let measured = self.measurer.measure(&spec.text, spec.tier);
        self.elements.push(HeadlessElement {
            spec: spec.clone(),
            left: spec.position.x,
            top: spec.position.y,
            width: measured.width,
            height: measured.height,
        });
        self.elements.len() - 1
    }

    fn live_box(&self, handle: &usize) -> Rect {
        self.elements
            .get(*handle)
            .map(HeadlessElement::rect)
            .unwrap_or_default()
    }

    fn apply_uniform_scale(&mut self, factor: f64) {
        self.scale = factor;
    }

    fn translate_element(&mut self, handle: &usize, dx: f64, dy: f64) {
        if let Some(element) = self.elements.get_mut(*handle) {
            element.left += dx;
            element.top += dy;
        }
    }
}
