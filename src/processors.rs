pub(crate) mod raster;
pub mod shapes;
pub(crate) mod vector;

use crate::foundation::error::{CaptchaError, CaptchaResult};

/// Alignment of a block along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Start,
    #[default]
    Center,
    End,
}

impl Anchor {
    /// Offset that places a span of `extent` anchored at `at`.
    pub fn place(self, at: f64, extent: f64) -> f64 {
        match self {
            Self::Start => at,
            Self::Center => at - extent / 2.0,
            Self::End => at - extent,
        }
    }
}

impl TryFrom<i32> for Anchor {
    type Error = CaptchaError;

    fn try_from(v: i32) -> CaptchaResult<Self> {
        match v {
            0 => Ok(Self::Start),
            1 => Ok(Self::Center),
            2 => Ok(Self::End),
            other => Err(CaptchaError::range(format!(
                "anchor must be 0, 1 or 2, got {other}"
            ))),
        }
    }
}
