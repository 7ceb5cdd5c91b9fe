use num_traits::{AsPrimitive, FromPrimitive, NumAssign, PrimInt, Unsigned};
use std::fmt::{Debug, Display};

pub trait UnsignedInt:
    PrimInt
    + Unsigned
    + Display
    + Debug
    + AsPrimitive<usize>
    + AsPrimitive<f64>
    + FromPrimitive
    + NumAssign
{
}

impl<I> UnsignedInt for I where
    I: PrimInt
        + Unsigned
        + Display
        + Debug
        + AsPrimitive<usize>
        + AsPrimitive<f64>
        + FromPrimitive
        + NumAssign
{
}

///
/// Solution of the dense linear assignment problem
///
#[derive(Debug, Clone)]
pub struct MatchingSolution<I>
where
    I: UnsignedInt,
{
    /// index u gives the right vertex, v, matched to left vertex u
    ///
    /// Unmatched left vertices are marked by MAX value of the integer type (u32::MAX for u32)
    pub left_to_right: Vec<I>,
    /// index v gives the left vertex, u, matched to right vertex v
    ///
    /// Unmatched right vertices are marked by MAX value of the integer type (u32::MAX for u32)
    pub right_to_left: Vec<I>,
    /// number of matched pairs; equals the matrix order once a perfect matching is found
    pub num_assigned: I,
    /// total matched weight under the caller's convention (profit when maximizing,
    /// cost when minimizing)
    pub objective: f64,
}

impl<I> MatchingSolution<I>
where
    I: UnsignedInt,
{
    pub fn new(vertex_capacity: usize) -> MatchingSolution<I> {
        MatchingSolution::<I> {
            left_to_right: Vec::with_capacity(vertex_capacity),
            right_to_left: Vec::with_capacity(vertex_capacity),
            num_assigned: I::zero(),
            objective: f64::NAN,
        }
    }

    /// True if both mappings are total and mutually inverse.
    pub fn is_perfect(&self) -> bool {
        if self.left_to_right.len() != self.right_to_left.len() {
            return false;
        }
        self.left_to_right.iter().enumerate().all(|(u, v_ref)| {
            if *v_ref == I::max_value() {
                return false;
            }
            let v: usize = (*v_ref).as_();
            let back: usize = self.right_to_left[v].as_();
            back == u
        })
    }
}
