/// Vertical extent of a rendered element, in scroll-content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct ElementRect {
    pub top: f64,
    pub height: f64,
}

impl ElementRect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct Viewport {
    pub scroll_top: f64,
    pub height: f64,
}

/// New `scroll_top` that centers `element`, or `None` while the element
/// sits inside the middle third of the viewport.
pub fn scroll_target(element: ElementRect, viewport: Viewport) -> Option<f64> {
    if viewport.height <= 0.0 {
        return None;
    }

    let third = viewport.height / 3.0;
    let band_top = viewport.scroll_top + third;
    let band_bottom = viewport.scroll_top + 2.0 * third;
    if element.top >= band_top && element.bottom() <= band_bottom {
        return None;
    }

    let target = (element.center() - viewport.height / 2.0).max(0.0);
    // already as centered as it gets, e.g. an element taller than the band
    if (target - viewport.scroll_top).abs() < 1.0 {
        return None;
    }
    Some(target)
}
