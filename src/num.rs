//! numerical trait constraints
use ndarray::ScalarOperand;
use std::fmt::{Debug, Display};
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

pub trait Float:
    Sized
    + num_traits::Float
    + num_traits::FromPrimitive
    + ScalarOperand
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Debug
    + Display
    + Send
    + Sync
    + 'static
{
    /// Convert a literal constant into the working float type.
    fn lit(x: f64) -> Self {
        <Self as num_traits::NumCast>::from(x).unwrap_or_else(Self::nan)
    }

    /// Convert a count into the working float type.
    fn from_count(n: usize) -> Self {
        <Self as num_traits::NumCast>::from(n).unwrap_or_else(Self::infinity)
    }
}

impl Float for f32 {}
impl Float for f64 {}
