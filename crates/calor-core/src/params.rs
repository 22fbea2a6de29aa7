//! Physical parameters of the explicit scheme.

/// Diffusion coefficients along X (`cx`) and Y (`cy`).
///
/// Fixed for a run and passed by value to every component that needs
/// them. The defaults (`0.1`, `0.1`) are the classic heat2D values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Diffusivity {
    /// Coefficient applied to the second difference along rows (X).
    pub cx: f32,
    /// Coefficient applied to the second difference along columns (Y).
    pub cy: f32,
}

impl Diffusivity {
    /// Create a coefficient pair.
    pub fn new(cx: f32, cy: f32) -> Self {
        Self { cx, cy }
    }

    /// Whether both coefficients are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.cx.is_finite() && self.cy.is_finite()
    }
}

impl Default for Diffusivity {
    fn default() -> Self {
        Self { cx: 0.1, cy: 0.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_tenth() {
        let d = Diffusivity::default();
        assert_eq!(d.cx, 0.1);
        assert_eq!(d.cy, 0.1);
        assert!(d.is_finite());
    }

    #[test]
    fn nan_is_not_finite() {
        assert!(!Diffusivity::new(f32::NAN, 0.1).is_finite());
        assert!(!Diffusivity::new(0.1, f32::INFINITY).is_finite());
    }
}
