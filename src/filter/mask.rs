//! Mask compositor
//!
//! Forces hidden pixels to black whatever the effect produced. Runs before
//! current limiting so hidden pixels never take a share of the budget.

use super::Filter;
use crate::color::Color;

#[derive(Debug, Clone, Copy)]
pub struct MaskFilter<'a> {
    mask: &'a [bool],
}

impl<'a> MaskFilter<'a> {
    pub const fn new(mask: &'a [bool]) -> Self {
        Self { mask }
    }
}

impl Filter for MaskFilter<'_> {
    fn apply(&mut self, frame: &mut [Color]) {
        for (pixel, visible) in frame.iter_mut().zip(self.mask) {
            if !visible {
                *pixel = Color::BLACK;
            }
        }
    }
}
