use serde::{Deserialize, Serialize};

/// What the host can do with an image clipboard write. Resolved once at
/// startup by a probe and passed in; nothing in the pipeline inspects the
/// environment itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCapabilities {
    pub supports_unattended_image_write: bool,
    pub requires_user_gesture_to_write: bool,
    pub supports_blob_write_at_all: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryRoute {
    /// Write straight to the clipboard.
    Unattended,
    /// Show the image and write only from an explicit user action.
    GestureConfirm,
    /// Show the image; the user copies it by hand.
    ManualSave,
}

impl PlatformCapabilities {
    pub const UNATTENDED: Self = Self {
        supports_unattended_image_write: true,
        requires_user_gesture_to_write: false,
        supports_blob_write_at_all: true,
    };

    pub const GESTURE: Self = Self {
        supports_unattended_image_write: false,
        requires_user_gesture_to_write: true,
        supports_blob_write_at_all: true,
    };

    pub const MANUAL: Self = Self {
        supports_unattended_image_write: false,
        requires_user_gesture_to_write: true,
        supports_blob_write_at_all: false,
    };

    pub fn route(&self) -> DeliveryRoute {
        if self.supports_unattended_image_write {
            DeliveryRoute::Unattended
        } else if self.supports_blob_write_at_all {
            DeliveryRoute::GestureConfirm
        } else {
            DeliveryRoute::ManualSave
        }
    }
}

impl DeliveryRoute {
    pub fn capabilities(self) -> PlatformCapabilities {
        match self {
            Self::Unattended => PlatformCapabilities::UNATTENDED,
            Self::GestureConfirm => PlatformCapabilities::GESTURE,
            Self::ManualSave => PlatformCapabilities::MANUAL,
        }
    }
}
