use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use resvg::{tiny_skia, usvg};
use tracing::debug;

use super::{ChartImage, RenderError};

static FONT_DB: Lazy<Arc<usvg::fontdb::Database>> = Lazy::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    debug!(faces = db.len(), "loaded system fonts for chart rendering");
    Arc::new(db)
});

/// Rasterises an SVG document to PNG and base64-encodes it. The pixmap lives only for
/// the duration of this call.
pub fn rasterize(svg: &str) -> Result<ChartImage, RenderError> {
    let options = usvg::Options {
        fontdb: Arc::clone(&FONT_DB),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(svg, &options)?;
    let size = tree.size().to_int_size();

    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or(
        RenderError::Surface {
            width: size.width(),
            height: size.height(),
        },
    )?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let png = pixmap
        .encode_png()
        .map_err(|err| RenderError::Encode(err.to_string()))?;

    Ok(ChartImage {
        width: size.width(),
        height: size.height(),
        png_base64: STANDARD.encode(png),
    })
}
