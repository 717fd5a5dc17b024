//! Video surface sizing

use crate::Resolution;

/// Size a video surface to fit the display while keeping the video's
/// aspect ratio.
///
/// A video wider than the display fills the display width; otherwise it
/// fills the display height. Degenerate sizes return the display unchanged.
pub fn fit_to_display(video: Resolution, display: Resolution) -> Resolution {
    if video.aspect_ratio().is_none() || display.aspect_ratio().is_none() {
        return display;
    }

    let (vw, vh) = (u64::from(video.width), u64::from(video.height));
    let (dw, dh) = (u64::from(display.width), u64::from(display.height));

    // vw / vh > dw / dh without float rounding
    if vw * dh > dw * vh {
        Resolution::new(display.width, (dw * vh / vw) as u32)
    } else {
        Resolution::new((dh * vw / vh) as u32, display.height)
    }
}
