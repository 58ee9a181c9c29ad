use serde::Serialize;
use std::fmt;

use crate::Error;

/// Number of global secondary indexes on a table
///
/// Construction validates the input, so a `GsiCount` is always a
/// non-negative integer. Unsigned widths up to `u32` convert infallibly;
/// everything else goes through `TryFrom` and fails with
/// [`Error::InvalidArgument`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GsiCount(u32);

impl GsiCount {
    /// A table with only the default index
    pub const ZERO: GsiCount = GsiCount(0);

    /// Create a count from an unsigned integer
    pub const fn new(count: u32) -> Self {
        GsiCount(count)
    }

    /// The raw count
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Secondary index numbers `1..=count`
    pub fn numbers(self) -> impl Iterator<Item = u32> {
        1..=self.0
    }
}

impl fmt::Display for GsiCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for GsiCount {
                fn from(count: $ty) -> Self {
                    GsiCount(u32::from(count))
                }
            }
        )*
    };
}

macro_rules! impl_try_from_signed {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<$ty> for GsiCount {
                type Error = Error;

                fn try_from(count: $ty) -> Result<Self, Self::Error> {
                    if count < 0 {
                        return Err(Error::invalid_argument(format!(
                            "gsi count must not be negative, got {count}"
                        )));
                    }
                    u32::try_from(count).map(GsiCount).map_err(|_| too_large(count))
                }
            }
        )*
    };
}

macro_rules! impl_try_from_wide_unsigned {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<$ty> for GsiCount {
                type Error = Error;

                fn try_from(count: $ty) -> Result<Self, Self::Error> {
                    u32::try_from(count).map(GsiCount).map_err(|_| too_large(count))
                }
            }
        )*
    };
}

fn too_large(count: impl fmt::Display) -> Error {
    Error::invalid_argument(format!("gsi count {count} is too large"))
}

impl_from_unsigned!(u8, u16, u32);
impl_try_from_signed!(i8, i16, i32, i64, isize);
impl_try_from_wide_unsigned!(u64, usize);

impl TryFrom<f64> for GsiCount {
    type Error = Error;

    fn try_from(count: f64) -> Result<Self, Self::Error> {
        if !count.is_finite() {
            return Err(Error::invalid_argument(format!(
                "gsi count must be finite, got {count}"
            )));
        }
        if count.fract() != 0.0 {
            return Err(Error::invalid_argument(format!(
                "gsi count must be an integer, got {count}"
            )));
        }
        if count < 0.0 {
            return Err(Error::invalid_argument(format!(
                "gsi count must not be negative, got {count}"
            )));
        }
        if count > f64::from(u32::MAX) {
            return Err(too_large(count));
        }
        Ok(GsiCount(count as u32))
    }
}
