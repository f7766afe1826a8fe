use std::ops::{Add, Sub};

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

/// A point in either page or surface space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Sum a chain of container offsets into one absolute position.
    ///
    /// Each item is an element's offset relative to its containing parent,
    /// innermost first; the result is the innermost element's position
    /// relative to the page.
    #[must_use]
    pub fn accumulate<I>(offsets: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        offsets.into_iter().fold(Self::default(), |acc, offset| acc + offset)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}
