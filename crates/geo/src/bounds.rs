//! Axis-aligned latitude/longitude bounding boxes.

use crate::Coordinate;
use serde::{Deserialize, Serialize};

/// The minimal north/south/east/west rectangle containing a set of coordinates.
///
/// An empty box is represented by the inverted sentinel [`BoundingBox::EMPTY`]
/// so that folding the first coordinate collapses it onto that coordinate.
/// Antimeridian crossing is not handled: a set spanning ±180° yields a box
/// covering the long way round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// The "no data" box: north=-90, south=90, east=-180, west=180.
    pub const EMPTY: BoundingBox = BoundingBox {
        north: -90.0,
        south: 90.0,
        east: -180.0,
        west: 180.0,
    };

    /// Builds a box from an iterator of coordinates.
    pub fn from_coordinates<'a, I>(coordinates: I) -> Self
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        coordinates.into_iter().fold(Self::EMPTY, |mut bbox, c| {
            bbox.extend(c);
            bbox
        })
    }

    /// Grows the box to include `coord`.
    #[inline]
    pub fn extend(&mut self, coord: &Coordinate) {
        self.north = self.north.max(coord.lat);
        self.south = self.south.min(coord.lat);
        self.east = self.east.max(coord.lng);
        self.west = self.west.min(coord.lng);
    }

    /// True while no coordinate has been folded in.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.north < self.south || self.east < self.west
    }

    /// Returns true if `coord` lies inside the box (edges included).
    pub fn contains(&self, coord: &Coordinate) -> bool {
        !self.is_empty()
            && (self.south..=self.north).contains(&coord.lat)
            && (self.west..=self.east).contains(&coord.lng)
    }

    /// Midpoint of the box, or `None` for an empty box.
    pub fn center(&self) -> Option<Coordinate> {
        if self.is_empty() {
            return None;
        }
        Some(Coordinate::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        ))
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}
