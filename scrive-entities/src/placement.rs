//! Field placements on document pages, and the text anchors that pin them.

use crate::enums::Tip;
use scrive_model::{
    Codec, Descriptor, Entity, EntityKind, EntitySet, Kwargs, Object, RATIO, Result, Rule, Value,
    WireEnum,
};

/// A text anchor: the placement follows the `index`-th occurrence of `text`.
#[derive(Clone, Debug, PartialEq)]
pub struct Anchor(Object);

pub static ANCHOR: EntityKind = EntityKind {
    name: "Anchor",
    descriptors: &[
        Descriptor::new("text").rule(Rule::NonEmptyText),
        Descriptor::new("index").rule(Rule::Int),
    ],
};

entity_handle!(Anchor, &ANCHOR);

impl Anchor {
    pub fn new(text: &str, index: i64) -> Result<Self> {
        Self::with_kwargs(Kwargs::new().arg("text", text).arg("index", index))
    }

    pub fn text(&self) -> Result<String> {
        self.0.get_as("text")
    }

    pub fn set_text(&self, text: &str) -> Result<()> {
        self.0.set("text", text)
    }

    pub fn index(&self) -> Result<i64> {
        self.0.get_as("index")
    }

    pub fn set_index(&self, index: i64) -> Result<()> {
        self.0.set("index", index)
    }
}

/// Position and size of a field on one page, as ratios of the page size.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement(Object);

pub static PLACEMENT: EntityKind = EntityKind {
    name: "Placement",
    descriptors: &[
        Descriptor::new("left").wire("xrel").rule(RATIO),
        Descriptor::new("top").wire("yrel").rule(RATIO),
        Descriptor::new("width").wire("wrel").rule(RATIO),
        Descriptor::new("height").wire("hrel").rule(RATIO),
        Descriptor::new("font_size")
            .wire("fsrel")
            .rule(RATIO)
            .default_to(|| Value::Float(Placement::FONT_SIZE_NORMAL)),
        Descriptor::new("page")
            .rule(Rule::PositiveInt)
            .default_to(|| Value::Int(1)),
        Descriptor::new("tip")
            .rule(Rule::Enum(Tip::spec))
            .default_to(|| Value::from(Tip::Right))
            .codec(Codec::Variant {
                spec: Tip::spec,
                aliases: &[],
                null_as: Some("left"),
            }),
        Descriptor::new("anchors")
            .rule(Rule::SetOf(&ANCHOR))
            .default_to(|| Value::List(Vec::new()))
            .codec(Codec::Entities(&ANCHOR)),
    ],
};

entity_handle!(Placement, &PLACEMENT);

impl Placement {
    pub const FONT_SIZE_SMALL: f64 = 12.0 / 943.0;
    pub const FONT_SIZE_NORMAL: f64 = 16.0 / 943.0;
    pub const FONT_SIZE_LARGE: f64 = 20.0 / 943.0;
    pub const FONT_SIZE_HUGE: f64 = 24.0 / 943.0;

    /// Keyword construction. `left`, `top`, `width` and `height` are required.
    pub fn new(kwargs: Kwargs) -> Result<Self> {
        Self::with_kwargs(kwargs)
    }

    pub fn left(&self) -> Result<f64> {
        self.0.get_as("left")
    }

    pub fn set_left(&self, left: f64) -> Result<()> {
        self.0.set("left", left)
    }

    pub fn top(&self) -> Result<f64> {
        self.0.get_as("top")
    }

    pub fn set_top(&self, top: f64) -> Result<()> {
        self.0.set("top", top)
    }

    pub fn width(&self) -> Result<f64> {
        self.0.get_as("width")
    }

    pub fn set_width(&self, width: f64) -> Result<()> {
        self.0.set("width", width)
    }

    pub fn height(&self) -> Result<f64> {
        self.0.get_as("height")
    }

    pub fn set_height(&self, height: f64) -> Result<()> {
        self.0.set("height", height)
    }

    pub fn font_size(&self) -> Result<f64> {
        self.0.get_as("font_size")
    }

    pub fn set_font_size(&self, font_size: f64) -> Result<()> {
        self.0.set("font_size", font_size)
    }

    /// 1-based page number.
    pub fn page(&self) -> Result<i64> {
        self.0.get_as("page")
    }

    pub fn set_page(&self, page: i64) -> Result<()> {
        self.0.set("page", page)
    }

    pub fn tip(&self) -> Result<Tip> {
        self.0.get_as("tip")
    }

    pub fn set_tip(&self, tip: Tip) -> Result<()> {
        self.0.set("tip", tip)
    }

    pub fn anchors(&self) -> Result<EntitySet<Anchor>> {
        self.0.get_as("anchors")
    }

    pub fn set_anchors(&self, anchors: Vec<Anchor>) -> Result<()> {
        self.0.set("anchors", anchors)
    }
}
