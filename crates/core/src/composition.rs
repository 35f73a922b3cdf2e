//! Rules for outfit compositions.
//!
//! A composition is the ordered stack of image layers that makes up an
//! outfit on the canvas. Layers snapshot the source item's image at save
//! time, so deleting the item later never breaks the outfit.

use rust_decimal::Decimal;

use crate::error::CoreError;

/// Smallest number of layers a composition may hold.
pub const MIN_LAYERS: usize = 1;

/// Largest scale factor storable in the layer table (NUMERIC(5,2)).
pub fn max_scale() -> Decimal {
    Decimal::new(99_999, 2)
}

/// Reject compositions that would leave an outfit without any layers.
pub fn validate_layer_count(count: usize) -> Result<(), CoreError> {
    if count < MIN_LAYERS {
        return Err(CoreError::Validation(
            "An outfit must contain at least one layer".to_string(),
        ));
    }
    Ok(())
}

/// Reject scale factors the layer table cannot represent.
///
/// Zero and negative scales are meaningless on the canvas; anything above
/// the column precision would fail the insert with an opaque numeric error.
pub fn validate_scale(scale: Decimal) -> Result<(), CoreError> {
    if scale <= Decimal::ZERO || scale > max_scale() {
        return Err(CoreError::Validation(format!(
            "Layer scale must be between 0 (exclusive) and {}, got {scale}",
            max_scale()
        )));
    }
    Ok(())
}

/// Resolve the image shown for an outfit in lists and calendars.
///
/// A non-empty explicit preview wins; otherwise the first non-empty layer
/// snapshot stands in. `snapshots` must be ordered bottom layer first.
pub fn pick_preview<'a>(
    preview: Option<&'a str>,
    snapshots: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    if let Some(url) = preview {
        if !url.is_empty() {
            return Some(url);
        }
    }
    snapshots.into_iter().find(|url| !url.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- layer count --------------------------------------------------------

    #[test]
    fn empty_composition_rejected() {
        assert!(validate_layer_count(0).is_err());
        assert!(validate_layer_count(1).is_ok());
    }

    // -- scale ----------------------------------------------------------------

    #[test]
    fn scale_bounds() {
        assert!(validate_scale(Decimal::new(100, 2)).is_ok()); // 1.00
        assert!(validate_scale(max_scale()).is_ok());
        assert!(validate_scale(Decimal::ZERO).is_err());
        assert!(validate_scale(Decimal::new(-50, 2)).is_err());
        assert!(validate_scale(max_scale() + Decimal::new(1, 2)).is_err());
    }

    // -- preview ----------------------------------------------------------

    #[test]
    fn explicit_preview_wins() {
        let got = pick_preview(Some("https://cdn/preview.jpg"), ["https://cdn/layer0.jpg"]);
        assert_eq!(got, Some("https://cdn/preview.jpg"));
    }

    #[test]
    fn empty_preview_falls_back_to_bottom_layer() {
        let got = pick_preview(Some(""), ["https://cdn/layer0.jpg", "https://cdn/layer1.jpg"]);
        assert_eq!(got, Some("https://cdn/layer0.jpg"));
    }

    #[test]
    fn blank_snapshots_skipped() {
        let got = pick_preview(None, ["", "https://cdn/layer1.jpg"]);
        assert_eq!(got, Some("https://cdn/layer1.jpg"));
    }

    #[test]
    fn nothing_to_show() {
        assert_eq!(pick_preview(None, []), None);
        assert_eq!(pick_preview(Some(""), []), None);
    }
}
