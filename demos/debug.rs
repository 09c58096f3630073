//! Minimal usage demo: subtract one triangle from another and print the
//! result. Run with `cargo run --example debug`.

use planarbool::{Path, Point2D, Polygon};

fn main() {
    let subject_polygon = Polygon::new(vec![Path::from_coords([
        Point2D::new(5.0, 5.0),
        Point2D::new(10.0, 10.0),
        Point2D::new(10.0, 5.0),
    ])]);

    // Same as subject_polygon but offset by 2.0 in x.
    let clip_polygon = Polygon::new(vec![Path::from_coords([
        Point2D::new(7.0, 5.0),
        Point2D::new(12.0, 10.0),
        Point2D::new(12.0, 5.0),
    ])]);

    println!("subject polygon: {:?}", subject_polygon.subtract(&clip_polygon));
}
