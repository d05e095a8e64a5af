/// GDAL affine transform:
/// `[top_left_x, pixel_width, row_rotation, top_left_y, column_rotation, -pixel_height]`
pub type GeoTransform = [f64; 6];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Bounds {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self, String> {
        if [xmin, xmax, ymin, ymax].iter().any(|v| !v.is_finite()) {
            return Err("Bounds must be finite".to_string());
        }

        if xmin > xmax || ymin > ymax {
            return Err("Min values must be <= max values".to_string());
        }

        Ok(Bounds {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// Extent covered by a north-up raster of `size` (width, height) pixels.
    pub fn of_raster(geotransform: &GeoTransform, size: (usize, usize)) -> Self {
        let (width, height) = size;
        let x0 = geotransform[0];
        let x1 = geotransform[0] + width as f64 * geotransform[1];
        let y0 = geotransform[3];
        let y1 = geotransform[3] + height as f64 * geotransform[5];

        Bounds {
            xmin: x0.min(x1),
            xmax: x0.max(x1),
            ymin: y0.min(y1),
            ymax: y0.max(y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

/// A rectangular block of pixels, in raster (column, row) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PixelWindow {
    pub fn full(size: (usize, usize)) -> Self {
        PixelWindow {
            x: 0,
            y: 0,
            width: size.0,
            height: size.1,
        }
    }

    /// Pixel window covering `bounds`, clamped to a raster of `size` pixels. Returns `None`
    /// when the bounds do not overlap the raster.
    pub fn from_bounds(
        geotransform: &GeoTransform,
        bounds: &Bounds,
        size: (usize, usize),
    ) -> Option<Self> {
        let (width, height) = (size.0 as i64, size.1 as i64);

        // Outer pixel edges, rounded outwards so partially covered pixels are kept
        let pixel_min_x = ((bounds.xmin - geotransform[0]) / geotransform[1]).floor() as i64;
        let pixel_max_x = ((bounds.xmax - geotransform[0]) / geotransform[1]).ceil() as i64;
        let pixel_min_y = ((bounds.ymax - geotransform[3]) / geotransform[5]).floor() as i64;
        let pixel_max_y = ((bounds.ymin - geotransform[3]) / geotransform[5]).ceil() as i64;

        let start_x = pixel_min_x.clamp(0, width);
        let end_x = pixel_max_x.clamp(0, width);
        let start_y = pixel_min_y.clamp(0, height);
        let end_y = pixel_max_y.clamp(0, height);

        if end_x <= start_x || end_y <= start_y {
            return None;
        }

        Some(PixelWindow {
            x: start_x as usize,
            y: start_y as usize,
            width: (end_x - start_x) as usize,
            height: (end_y - start_y) as usize,
        })
    }

    pub fn offset(&self) -> (isize, isize) {
        (self.x as isize, self.y as isize)
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Transform of the window's top-left pixel within a raster georeferenced by `geotransform`.
    pub fn transform(&self, geotransform: &GeoTransform) -> GeoTransform {
        let (col, row) = (self.x as f64, self.y as f64);
        [
            geotransform[0] + col * geotransform[1] + row * geotransform[2],
            geotransform[1],
            geotransform[2],
            geotransform[3] + col * geotransform[4] + row * geotransform[5],
            geotransform[4],
            geotransform[5],
        ]
    }
}

/// Transform of the same extent sampled `factor` times more finely along each axis.
pub fn scale_transform(geotransform: &GeoTransform, factor: f64) -> GeoTransform {
    [
        geotransform[0],
        geotransform[1] / factor,
        geotransform[2] / factor,
        geotransform[3],
        geotransform[4] / factor,
        geotransform[5] / factor,
    ]
}
