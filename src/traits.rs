use bevy::prelude::*;

/// Extension trait for `Transform` to provide more concise construction methods
pub trait TransformExt {
    /// Creates a `Transform` from translation, rotation, and scale in one call
    fn from_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Self;
}

impl TransformExt for Transform {
    fn from_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }
}

/// Extension trait for `Visibility` so show/hide flags map onto it in one place
pub trait VisibilityExt {
    /// `Inherited` when shown, `Hidden` otherwise
    fn shown(shown: bool) -> Self;
}

impl VisibilityExt for Visibility {
    #[inline]
    fn shown(shown: bool) -> Self {
        if shown {
            Self::Inherited
        } else {
            Self::Hidden
        }
    }
}
