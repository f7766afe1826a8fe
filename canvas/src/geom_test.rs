#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_default_is_origin() {
    assert_eq!(Point::default(), Point::new(0.0, 0.0));
}

#[test]
fn point_add_and_sub() {
    let a = Point::new(10.0, 20.0);
    let b = Point::new(3.0, 5.0);
    assert_eq!(a + b, Point::new(13.0, 25.0));
    assert_eq!(a - b, Point::new(7.0, 15.0));
}

#[test]
fn accumulate_empty_chain_is_origin() {
    assert_eq!(Point::accumulate(Vec::new()), Point::default());
}

#[test]
fn accumulate_sums_every_ancestor_offset() {
    let chain = [Point::new(8.0, 4.0), Point::new(100.0, 50.0), Point::new(0.0, 12.0)];
    assert_eq!(Point::accumulate(chain), Point::new(108.0, 66.0));
}
