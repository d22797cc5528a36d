//! The family of complex step functions the renderer can iterate.  A
//! family is picked by name when the renderer is configured and never
//! changes during a render; the engine is generic over `Polynomial`, so
//! the choice is made once rather than on every iteration.

use errors::RenderError;
use num::Complex;
use std::fmt;
use std::str::FromStr;

/// One step of an escape-time iteration: `z' = f(z, c)`.
///
/// Implementations must be pure.  The subdivision engine relies on
/// the same point always producing the same value, no matter which
/// thread asks or how often.
pub trait Polynomial: Sync {
    /// Advance `z` one step under the constant `c`.
    fn step(&self, z: Complex<f64>, c: Complex<f64>) -> Complex<f64>;
}

/// The built-in families.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PolynomialKind {
    /// z² + c, the classic Mandelbrot
    Standard,
    /// z³ + c
    Cubic,
    /// z² + c² / (c⁴ − ¼)
    QuadraticRational,
    /// z² + 1 / (c − 1)
    InvC,
    /// z² + 1 / c + ¼
    InvCParabola,
}

const REGISTRY: [(&str, PolynomialKind); 5] = [
    ("standard", PolynomialKind::Standard),
    ("cubic", PolynomialKind::Cubic),
    ("quadratic-rational", PolynomialKind::QuadraticRational),
    ("inv-c", PolynomialKind::InvC),
    ("inv-c-parabola", PolynomialKind::InvCParabola),
];

impl PolynomialKind {
    /// Every name the registry knows, in a stable order.
    pub fn names() -> Vec<&'static str> {
        REGISTRY.iter().map(|(name, _)| *name).collect()
    }

    /// The registry name of this family.
    pub fn name(self) -> &'static str {
        REGISTRY
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(name, _)| *name)
            .unwrap_or("standard")
    }
}

impl Default for PolynomialKind {
    fn default() -> Self {
        PolynomialKind::Standard
    }
}

impl FromStr for PolynomialKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        REGISTRY
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| RenderError::UnknownPolynomial(s.to_string()))
    }
}

impl fmt::Display for PolynomialKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Polynomial for PolynomialKind {
    #[inline]
    fn step(&self, z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
        let one = Complex::new(1.0, 0.0);
        let quarter = Complex::new(0.25, 0.0);
        match *self {
            PolynomialKind::Standard => z * z + c,
            PolynomialKind::Cubic => z * z * z + c,
            PolynomialKind::QuadraticRational => {
                let c2 = c * c;
                z * z + c2 / (c2 * c2 - quarter)
            }
            PolynomialKind::InvC => z * z + one / (c - one),
            PolynomialKind::InvCParabola => z * z + one / c + quarter,
        }
    }
}
