//! Layout Orchestrator: one `TagCloud` owns a topic list and a host container
//! and runs complete layout passes over them.
//!
//! # Pass
//! 1. Bail out if the container is hidden (nothing is touched).
//! 2. Optionally square the container (`circle`).
//! 3. Clear the container, capture its size, reset the collision index.
//! 4. Rank and annotate topics; stop here if there are none.
//! 5. Measure every topic at its tier, then place each one on the spiral,
//!    starting the search at its rank index.
//! 6. Create an element for every placed topic; omitted topics are reported
//!    but produce no output.
//! 7. Auto-fit unless disabled.
//!
//! Every pass recomputes from scratch. Omissions are expected and never fail
//! the pass.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::CloudError;
use crate::layout::autofit::{compute_fit, FitAdjustment};
use crate::layout::collision::CollisionIndex;
use crate::layout::font_metrics::MetricMeasurer;
use crate::layout::geometry::{Point, Rect, Size};
use crate::layout::host::{CloudHost, ElementSpec, MeasuredBox, TextMeasurer};
use crate::layout::spiral::{SpiralParams, SpiralPlacer, SpiralSearch, Viewport};
use crate::layout::weights::{prepare_topics, UNIFORM_TIER};
use crate::models::Topic;

pub const DEFAULT_WORD_CLASS: &str = "epixword";
pub const DEFAULT_WEIGHT_CLASS: &str = "epixweight-";
pub const DEFAULT_ID_HEAD: &str = "epixcloud-";

/// Called once per omitted topic, in rank order.
pub type OmissionCallback = Box<dyn FnMut(&OmittedTopic) + Send>;

// ────────────────────────────────────────────────────────────────────────────
// Options
// ────────────────────────────────────────────────────────────────────────────

/// Construction options. `topics` and `container` are required.
pub struct CloudOptions<H> {
    pub topics: Option<Vec<Topic>>,
    pub container: Option<H>,
    /// Defaults to [`MetricMeasurer::default`].
    pub measurer: Option<Arc<dyn TextMeasurer>>,
    pub word_class: Option<String>,
    pub weight_class: Option<String>,
    pub id_head: Option<String>,
    /// Disables the auto-fit step.
    pub no_scale: bool,
    /// Squares the container before each pass.
    pub circle: bool,
    pub spiral: SpiralParams,
    pub on_omitted: Option<OmissionCallback>,
}

impl<H> Default for CloudOptions<H> {
    fn default() -> Self {
        Self {
            topics: None,
            container: None,
            measurer: None,
            word_class: None,
            weight_class: None,
            id_head: None,
            no_scale: false,
            circle: false,
            spiral: SpiralParams::default(),
            on_omitted: None,
        }
    }
}

impl<H> CloudOptions<H> {
    pub fn new(topics: Vec<Topic>, container: H) -> Self {
        Self {
            topics: Some(topics),
            container: Some(container),
            ..Self::default()
        }
    }

    pub fn measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.measurer = Some(measurer);
        self
    }

    pub fn word_class(mut self, class: impl Into<String>) -> Self {
        self.word_class = Some(class.into());
        self
    }

    pub fn weight_class(mut self, prefix: impl Into<String>) -> Self {
        self.weight_class = Some(prefix.into());
        self
    }

    pub fn id_head(mut self, head: impl Into<String>) -> Self {
        self.id_head = Some(head.into());
        self
    }

    pub fn no_scale(mut self, no_scale: bool) -> Self {
        self.no_scale = no_scale;
        self
    }

    pub fn circle(mut self, circle: bool) -> Self {
        self.circle = circle;
        self
    }

    pub fn on_omitted(mut self, callback: impl FnMut(&OmittedTopic) + Send + 'static) -> Self {
        self.on_omitted = Some(Box::new(callback));
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pass output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStatus {
    Rendered,
    /// The container was not visible; nothing was laid out.
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedTopic {
    pub rank: usize,
    /// Rectangle accepted by the placer, before auto-fit translation.
    pub rect: Rect,
    pub spiral_step: usize,
    pub element: ElementSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OmittedTopic {
    pub rank: usize,
    pub text: String,
    pub size: Size,
    pub probes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderReport {
    pub status: RenderStatus,
    pub viewport: Option<Viewport>,
    pub placed: Vec<PlacedTopic>,
    pub omitted: Vec<OmittedTopic>,
    pub fit: Option<FitAdjustment>,
}

impl RenderReport {
    fn hidden() -> Self {
        Self {
            status: RenderStatus::Hidden,
            viewport: None,
            placed: Vec::new(),
            omitted: Vec::new(),
            fit: None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// TagCloud
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct ClassNames {
    word: String,
    weight: String,
    id_head: String,
}

pub struct TagCloud<H: CloudHost> {
    topics: Vec<Topic>,
    host: H,
    measurer: Arc<dyn TextMeasurer>,
    classes: ClassNames,
    no_scale: bool,
    circle: bool,
    spiral: SpiralParams,
    on_omitted: Option<OmissionCallback>,
    viewport: Viewport,
    collisions: CollisionIndex,
    measured: Vec<MeasuredBox>,
    handles: Vec<H::Handle>,
}

impl<H: CloudHost> fmt::Debug for TagCloud<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagCloud")
            .field("topics", &self.topics.len())
            .field("classes", &self.classes)
            .field("no_scale", &self.no_scale)
            .field("circle", &self.circle)
            .field("viewport", &self.viewport)
            .field("collisions", &self.collisions.len())
            .finish_non_exhaustive()
    }
}

impl<H: CloudHost> TagCloud<H> {
    /// Validates the options and prepares the cloud.
    ///
    /// On success the container is cleared and the topics are already ranked
    /// and annotated with their tiers.
    pub fn new(options: CloudOptions<H>) -> Result<Self, CloudError> {
        let topics = options.topics.ok_or(CloudError::MissingTopics)?;
        let host = options.container.ok_or(CloudError::MissingContainer)?;

        for (index, topic) in topics.iter().enumerate() {
            if let Some(reason) = topic_defect(topic) {
                return Err(CloudError::InvalidTopic {
                    index,
                    reason: reason.to_string(),
                });
            }
        }

        let viewport = Viewport::new(host.container_size());
        let mut cloud = Self {
            topics,
            host,
            measurer: options
                .measurer
                .unwrap_or_else(|| Arc::new(MetricMeasurer::default())),
            classes: ClassNames {
                word: options
                    .word_class
                    .unwrap_or_else(|| DEFAULT_WORD_CLASS.to_string()),
                weight: options
                    .weight_class
                    .unwrap_or_else(|| DEFAULT_WEIGHT_CLASS.to_string()),
                id_head: options.id_head.unwrap_or_else(|| DEFAULT_ID_HEAD.to_string()),
            },
            no_scale: options.no_scale,
            circle: options.circle,
            spiral: options.spiral,
            on_omitted: options.on_omitted,
            viewport,
            collisions: CollisionIndex::new(),
            measured: Vec::new(),
            handles: Vec::new(),
        };
        cloud.reset();
        Ok(cloud)
    }

    // ── accessors ───────────────────────────────────────────────────────────

    /// Topics in rank order as of the last preparation.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Mutable topic list; changes take effect on the next `render`.
    pub fn topics_mut(&mut self) -> &mut Vec<Topic> {
        &mut self.topics
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Rectangles accepted during the last pass.
    pub fn collisions(&self) -> &CollisionIndex {
        &self.collisions
    }

    /// Measured boxes from the last pass, parallel to `topics()`.
    pub fn measured(&self) -> &[MeasuredBox] {
        &self.measured
    }

    pub fn into_host(self) -> H {
        self.host
    }

    // ── pass ────────────────────────────────────────────────────────────────

    /// Runs one full layout pass.
    pub fn render(&mut self) -> RenderReport {
        if !self.host.is_visible() {
            debug!("Container hidden, skipping layout pass");
            return RenderReport::hidden();
        }

        if self.circle {
            self.square_container();
        }

        self.reset();

        let mut report = RenderReport {
            status: RenderStatus::Rendered,
            viewport: Some(self.viewport),
            placed: Vec::new(),
            omitted: Vec::new(),
            fit: None,
        };
        if self.topics.is_empty() {
            return report;
        }

        self.measure_all();

        let placer = SpiralPlacer::new(self.viewport, self.spiral);
        for rank in 0..self.topics.len() {
            let size = self.measured[rank].size();
            match placer.place(&mut self.collisions, size, rank) {
                SpiralSearch::Placed { rect, step, .. } => {
                    let element = self.element_spec(rank, rect.origin());
                    let handle = self.host.create_element(&element);
                    self.handles.push(handle);
                    report.placed.push(PlacedTopic {
                        rank,
                        rect,
                        spiral_step: step,
                        element,
                    });
                }
                SpiralSearch::Exhausted { probes } => {
                    let omitted = OmittedTopic {
                        rank,
                        text: self.topics[rank].text.clone(),
                        size,
                        probes,
                    };
                    warn!(
                        rank,
                        width = size.width,
                        height = size.height,
                        probes,
                        "Topic omitted: no free slot on the spiral"
                    );
                    if let Some(callback) = self.on_omitted.as_mut() {
                        callback(&omitted);
                    }
                    report.omitted.push(omitted);
                }
            }
        }

        if !self.no_scale {
            report.fit = self.auto_fit();
        }

        debug!(
            placed = report.placed.len(),
            omitted = report.omitted.len(),
            scale = ?report.fit.map(|f| f.scale),
            "Layout pass complete"
        );
        report
    }

    /// Scales and recenters the elements created by the last pass using their
    /// live boxes. Does nothing when no element was placed.
    pub fn auto_fit(&mut self) -> Option<FitAdjustment> {
        let boxes: Vec<Rect> = self.handles.iter().map(|h| self.host.live_box(h)).collect();
        let fit = compute_fit(self.viewport.size, &boxes)?;

        self.host.apply_uniform_scale(fit.scale);
        for handle in &self.handles {
            self.host.translate_element(handle, fit.dx, fit.dy);
        }
        Some(fit)
    }

    // ── internal helpers ────────────────────────────────────────────────────

    /// Clears pass-local state, captures the container size and re-prepares topics.
    fn reset(&mut self) {
        self.host.clear_container();
        self.viewport = Viewport::new(self.host.container_size());
        self.collisions.clear();
        self.measured.clear();
        self.handles.clear();
        prepare_topics(&mut self.topics);
    }

    /// Shrinks the longer side to the shorter one and centers the square with a margin.
    fn square_container(&mut self) {
        let size = self.host.container_size();
        if size.width == size.height {
            return;
        }
        let side = size.min_side();
        let margin = Point::new((size.width - side) / 2.0, (size.height - side) / 2.0);
        self.host.resize_container(Size::new(side, side), margin);
    }

    fn measure_all(&mut self) {
        self.measured = self
            .topics
            .iter()
            .map(|t| {
                self.measurer
                    .measure(&t.text, t.adjusted_weight.unwrap_or(UNIFORM_TIER))
            })
            .collect();
    }

    fn element_spec(&self, rank: usize, position: Point) -> ElementSpec {
        let topic = &self.topics[rank];
        let tier = topic.adjusted_weight.unwrap_or(UNIFORM_TIER);
        let class_name = format!(
            "{} {}{} {}",
            self.classes.word,
            self.classes.weight,
            tier,
            topic.custom_class.as_deref().unwrap_or("")
        );
        ElementSpec {
            id: format!("{}{}", self.classes.id_head, rank),
            class_name: class_name.trim_end().to_string(),
            text: topic.text.clone(),
            href: topic.href().to_string(),
            title: topic.display_title().to_string(),
            tier,
            font_size: self.measured[rank].font_size.clone(),
            data_attributes: topic.data_attributes.clone(),
            position,
        }
    }
}

/// Non-finite weights are let through; the normalizer gives them the top tier.
fn topic_defect(topic: &Topic) -> Option<&'static str> {
    if topic.text.trim().is_empty() {
        Some("text is empty")
    } else if topic.weight.is_finite() && topic.weight <= 0.0 {
        Some("weight must be positive")
    } else {
        None
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
