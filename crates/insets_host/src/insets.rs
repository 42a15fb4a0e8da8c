//! Inset value records and inset-category masks shared by every host adapter.

use std::ops::BitOr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Pixel insets reported by the native layer for each display edge.
///
/// Every edge is non-negative. Missing, `null`, negative, or non-finite native values decode as
/// `0`, so a snapshot always carries exactly these four fields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InsetSnapshot {
    /// Inset from the top edge.
    #[serde(default, deserialize_with = "deserialize_edge")]
    pub top: f64,
    /// Inset from the right edge.
    #[serde(default, deserialize_with = "deserialize_edge")]
    pub right: f64,
    /// Inset from the bottom edge.
    #[serde(default, deserialize_with = "deserialize_edge")]
    pub bottom: f64,
    /// Inset from the left edge.
    #[serde(default, deserialize_with = "deserialize_edge")]
    pub left: f64,
}

impl InsetSnapshot {
    /// Snapshot with every edge at zero; the state before any native data arrives.
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Builds a snapshot, clamping each edge to a non-negative finite value.
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top: clamp_edge(top),
            right: clamp_edge(right),
            bottom: clamp_edge(bottom),
            left: clamp_edge(left),
        }
    }

    /// Decodes a native bridge payload.
    ///
    /// A `null` payload means the native layer had no data and yields [`InsetSnapshot::ZERO`].
    ///
    /// # Errors
    ///
    /// Returns an error when the payload is neither `null` nor an inset record.
    pub fn from_payload(payload: serde_json::Value) -> Result<Self, String> {
        if payload.is_null() {
            return Ok(Self::ZERO);
        }
        serde_json::from_value(payload).map_err(|e| e.to_string())
    }

    /// Returns whether every edge is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

fn clamp_edge(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn deserialize_edge<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map_or(0.0, clamp_edge))
}

bitflags::bitflags! {
    /// Bitwise combination of inset categories requested from the native layer.
    ///
    /// The bit values are application-level identifiers. Translating them to the native
    /// platform's own constants is the native collaborator's job, and unknown bits are kept as-is.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InsetTypeMask: u32 {
        /// Caption bar of a freeform window.
        const CAPTION_BAR = 1;
        /// Display cutout (notch).
        const DISPLAY_CUTOUT = 1 << 1;
        /// Input method (on-screen keyboard).
        const IME = 1 << 2;
        /// Gesture areas the app can never opt out of.
        const MANDATORY_SYSTEM_GESTURES = 1 << 3;
        /// Navigation bars.
        const NAVIGATION_BARS = 1 << 4;
        /// Status bars.
        const STATUS_BARS = 1 << 5;
        /// All system bars.
        const SYSTEM_BARS = 1 << 6;
        /// System gesture areas.
        const SYSTEM_GESTURES = 1 << 7;
        /// Tappable system elements.
        const TAPPABLE_ELEMENT = 1 << 8;
    }
}

impl Serialize for InsetTypeMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for InsetTypeMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::from_bits_retain)
    }
}

/// Named inset category; each maps to exactly one [`InsetTypeMask`] bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsetType {
    /// See [`InsetTypeMask::CAPTION_BAR`].
    CaptionBar,
    /// See [`InsetTypeMask::DISPLAY_CUTOUT`].
    DisplayCutout,
    /// See [`InsetTypeMask::IME`].
    Ime,
    /// See [`InsetTypeMask::MANDATORY_SYSTEM_GESTURES`].
    MandatorySystemGestures,
    /// See [`InsetTypeMask::NAVIGATION_BARS`].
    NavigationBars,
    /// See [`InsetTypeMask::STATUS_BARS`].
    StatusBars,
    /// See [`InsetTypeMask::SYSTEM_BARS`].
    SystemBars,
    /// See [`InsetTypeMask::SYSTEM_GESTURES`].
    SystemGestures,
    /// See [`InsetTypeMask::TAPPABLE_ELEMENT`].
    TappableElement,
}

impl InsetType {
    /// Every inset category in ascending bit order.
    pub const ALL: [Self; 9] = [
        Self::CaptionBar,
        Self::DisplayCutout,
        Self::Ime,
        Self::MandatorySystemGestures,
        Self::NavigationBars,
        Self::StatusBars,
        Self::SystemBars,
        Self::SystemGestures,
        Self::TappableElement,
    ];

    /// Returns the single-bit mask for this category.
    pub const fn mask(self) -> InsetTypeMask {
        match self {
            Self::CaptionBar => InsetTypeMask::CAPTION_BAR,
            Self::DisplayCutout => InsetTypeMask::DISPLAY_CUTOUT,
            Self::Ime => InsetTypeMask::IME,
            Self::MandatorySystemGestures => InsetTypeMask::MANDATORY_SYSTEM_GESTURES,
            Self::NavigationBars => InsetTypeMask::NAVIGATION_BARS,
            Self::StatusBars => InsetTypeMask::STATUS_BARS,
            Self::SystemBars => InsetTypeMask::SYSTEM_BARS,
            Self::SystemGestures => InsetTypeMask::SYSTEM_GESTURES,
            Self::TappableElement => InsetTypeMask::TAPPABLE_ELEMENT,
        }
    }

    /// Returns the stable constant name used by application code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CaptionBar => "CAPTION_BAR",
            Self::DisplayCutout => "DISPLAY_CUTOUT",
            Self::Ime => "IME",
            Self::MandatorySystemGestures => "MANDATORY_SYSTEM_GESTURES",
            Self::NavigationBars => "NAVIGATION_BARS",
            Self::StatusBars => "STATUS_BARS",
            Self::SystemBars => "SYSTEM_BARS",
            Self::SystemGestures => "SYSTEM_GESTURES",
            Self::TappableElement => "TAPPABLE_ELEMENT",
        }
    }
}

impl From<InsetType> for InsetTypeMask {
    fn from(value: InsetType) -> Self {
        value.mask()
    }
}

impl BitOr for InsetType {
    type Output = InsetTypeMask;

    fn bitor(self, rhs: Self) -> InsetTypeMask {
        self.mask() | rhs.mask()
    }
}

impl FromIterator<InsetType> for InsetTypeMask {
    fn from_iter<I: IntoIterator<Item = InsetType>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |mask, kind| mask | kind.mask())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn payload_decode_defaults_missing_and_invalid_edges_to_zero() {
        let decoded = InsetSnapshot::from_payload(json!({
            "top": 24,
            "bottom": -3,
            "left": null
        }))
        .expect("decode");

        assert_eq!(decoded, InsetSnapshot::new(24.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn null_payload_is_zero_snapshot() {
        let decoded = InsetSnapshot::from_payload(serde_json::Value::Null).expect("decode");
        assert!(decoded.is_zero());
    }

    #[test]
    fn non_record_payload_is_rejected() {
        assert!(InsetSnapshot::from_payload(json!("not insets")).is_err());
        assert!(InsetSnapshot::from_payload(json!({ "top": "wide" })).is_err());
    }

    #[test]
    fn constructor_clamps_negative_and_non_finite_edges() {
        let snapshot = InsetSnapshot::new(-1.0, f64::NAN, f64::INFINITY, 12.5);
        assert_eq!(snapshot, InsetSnapshot::new(0.0, 0.0, 0.0, 12.5));
    }

    #[test]
    fn mask_bits_match_application_constants() {
        let expected = [1, 2, 4, 8, 16, 32, 64, 128, 256];
        let actual = InsetType::ALL.map(|kind| kind.mask().bits());
        assert_eq!(actual, expected);
    }

    #[test]
    fn mask_serializes_as_plain_bits_and_keeps_unknown_bits() {
        let mask = InsetType::StatusBars | InsetType::NavigationBars;
        assert_eq!(serde_json::to_value(mask).expect("serialize"), json!(48));

        let retained: InsetTypeMask = serde_json::from_value(json!(1024 | 2)).expect("deserialize");
        assert_eq!(retained.bits(), 1026);
        assert!(retained.contains(InsetTypeMask::DISPLAY_CUTOUT));
    }

    #[test]
    fn mask_collects_from_named_types() {
        let mask: InsetTypeMask = [InsetType::Ime, InsetType::SystemBars].into_iter().collect();
        assert_eq!(mask, InsetTypeMask::IME | InsetTypeMask::SYSTEM_BARS);
        assert_eq!(InsetType::TappableElement.as_str(), "TAPPABLE_ELEMENT");
    }
}
