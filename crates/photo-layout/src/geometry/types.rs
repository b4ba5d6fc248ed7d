//! Geometry primitives tagged with the coordinate space they live in
//!
//! Every rectangle, point and size carries a zero-sized marker naming its
//! space. Values only move between spaces through the functions in
//! `transform`, so a display-space rectangle can never be stored on a photo
//! by accident.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::marker::PhantomData;

/// Marker trait for coordinate spaces
pub trait Space: Debug + Clone + Copy + PartialEq + Default {
    const NAME: &'static str;
}

/// Pixels of the stored (possibly cropped) source image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OriginalSpace;

/// Pixels of the image as currently rendered in an editing surface.
/// The origin is the top-left corner of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplaySpace;

/// Fractions (0..1) of the image width and height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizedSpace;

impl Space for OriginalSpace {
    const NAME: &'static str = "original";
}

impl Space for DisplaySpace {
    const NAME: &'static str = "display";
}

impl Space for NormalizedSpace {
    const NAME: &'static str = "normalized";
}

/// A point (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point<S: Space> {
    pub x: f64,
    pub y: f64,
    space: PhantomData<S>,
}

impl<S: Space> Point<S> {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            space: PhantomData,
        }
    }

    /// Offset from `origin` to this point
    pub fn delta_from(&self, origin: Point<S>) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// Width and height of an image in some space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size<S: Space> {
    pub width: f64,
    pub height: f64,
    space: PhantomData<S>,
}

impl<S: Space> Size<S> {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            space: PhantomData,
        }
    }

    /// True when either dimension is zero, negative or not a number
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// The rectangle covering the whole image
    pub fn bounds(&self) -> Rect<S> {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect<S: Space> {
    /// X position (left edge)
    pub x: f64,
    /// Y position (top edge)
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(skip)]
    space: PhantomData<S>,
}

impl<S: Space> Rect<S> {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            space: PhantomData,
        }
    }

    /// Rectangle spanned by two corners given in any order
    pub fn from_corners(a: Point<S>, b: Point<S>) -> Self {
        Self::new(
            a.x.min(b.x),
            a.y.min(b.y),
            (b.x - a.x).abs(),
            (b.y - a.y).abs(),
        )
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point<S> {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size<S> {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point<S> {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn contains_point(&self, p: Point<S>) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// True when `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect<S>) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// True when the two rectangles share a region of positive area.
    /// Rectangles that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect<S>) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Overlapping region of two rectangles, if any
    pub fn intersection(&self, other: &Rect<S>) -> Option<Rect<S>> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(x, y, right - x, bottom - y))
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Rect<S> {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Move the rectangle so that it lies inside `bounds` without resizing it.
    /// A rectangle larger than `bounds` is pinned to the top-left corner.
    pub fn moved_inside(&self, bounds: &Rect<S>) -> Rect<S> {
        let x = self.x.min(bounds.right() - self.width).max(bounds.x);
        let y = self.y.min(bounds.bottom() - self.height).max(bounds.y);
        Rect::new(x, y, self.width, self.height)
    }
}

/// One of the eight resize handles around a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NorthWest,
        ResizeHandle::North,
        ResizeHandle::NorthEast,
        ResizeHandle::West,
        ResizeHandle::East,
        ResizeHandle::SouthWest,
        ResizeHandle::South,
        ResizeHandle::SouthEast,
    ];

    /// Handle moves the left edge (right edge stays fixed)
    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeHandle::West | ResizeHandle::NorthWest | ResizeHandle::SouthWest
        )
    }

    /// Handle moves the right edge (left edge stays fixed)
    pub fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeHandle::East | ResizeHandle::NorthEast | ResizeHandle::SouthEast
        )
    }

    /// Handle moves the top edge (bottom edge stays fixed)
    pub fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeHandle::North | ResizeHandle::NorthEast | ResizeHandle::NorthWest
        )
    }

    /// Handle moves the bottom edge (top edge stays fixed)
    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeHandle::South | ResizeHandle::SouthEast | ResizeHandle::SouthWest
        )
    }

    /// Compass abbreviation used by UI layers ("nw", "e", ...)
    pub fn as_str(self) -> &'static str {
        match self {
            ResizeHandle::North => "n",
            ResizeHandle::South => "s",
            ResizeHandle::East => "e",
            ResizeHandle::West => "w",
            ResizeHandle::NorthEast => "ne",
            ResizeHandle::NorthWest => "nw",
            ResizeHandle::SouthEast => "se",
            ResizeHandle::SouthWest => "sw",
        }
    }
}

impl std::str::FromStr for ResizeHandle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ResizeHandle::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| format!("unknown resize handle '{}'", s))
    }
}
