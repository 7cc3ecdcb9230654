use crate::{Grid, GridOffset, Point, Rectangle};
use svg::{
    node::{
        element::{Polygon, Rectangle as SvgRectangle},
        Comment,
    },
    Document,
};

const GRID_STROKE: &str = "#999999";

/// Render the grid mesh covering `bounds` as an SVG. Each cell polygon is
/// preceded by a comment naming its offset, which makes the output
/// greppable when debugging coordinate math.
pub fn grid_to_svg(grid: &Grid, bounds: Rectangle) -> Document {
    let mut document = Document::new()
        .set(
            "viewBox",
            (bounds.x, bounds.y, bounds.width, bounds.height),
        )
        .set("shape-rendering", "crispEdges")
        .add(Comment::new(format!("\n{:#?}\n", grid.config())));

    if grid.config().grid_type.is_gridless() {
        // No mesh to draw; just mark the canvas extent
        return document.add(
            SvgRectangle::new()
                .set("x", bounds.x)
                .set("y", bounds.y)
                .set("width", bounds.width)
                .set("height", bounds.height)
                .set("fill", "none")
                .set("stroke", GRID_STROKE),
        );
    }

    let (i0, j0, i1, j1) = grid.get_offset_range(bounds);
    for i in i0..=i1 {
        for j in j0..=j1 {
            let offset = GridOffset::new(i, j);
            document = document.add(Comment::new(offset.to_string())).add(
                outline_to_polygon(&grid.get_vertices(offset))
                    .set("fill", "none")
                    .set("stroke", GRID_STROKE),
            );
        }
    }
    document
}

/// Overlay filled cell polygons on a rendered document, e.g. to show the
/// cells a measured path crosses
pub fn highlight_cells(
    mut document: Document,
    grid: &Grid,
    cells: &[GridOffset],
    color: &str,
) -> Document {
    for &cell in cells {
        document = document.add(
            outline_to_polygon(&grid.get_vertices(cell))
                .set("fill", color)
                .set("fill-opacity", 0.4),
        );
    }
    document
}

/// Convert an outline (e.g. from [Grid::get_circle]) into an SVG polygon
/// with no styling applied
pub fn outline_to_polygon(outline: &[Point]) -> Polygon {
    Polygon::new().set(
        "points",
        outline
            .iter()
            .map(|point| (point.x, point.y))
            .collect::<Vec<_>>(),
    )
}
