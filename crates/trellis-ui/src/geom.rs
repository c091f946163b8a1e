use core::ops::Add;

/// Integer width/height pair in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Dimension {
    pub width: i32,
    pub height: i32,
}

impl Dimension {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { width: 0, height: 0 }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Dimension) -> Dimension {
        Dimension::new(self.width.max(other.width), self.height.max(other.height))
    }
}

impl Add for Dimension {
    type Output = Dimension;
    #[inline]
    fn add(self, rhs: Dimension) -> Dimension {
        Dimension::new(self.width + rhs.width, self.height + rhs.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_is_component_wise() {
        assert_eq!(Dimension::new(3, 9).max(Dimension::new(5, 2)), Dimension::new(5, 9));
    }

    #[test]
    fn add_sums_both_axes() {
        assert_eq!(Dimension::new(1, 2) + Dimension::new(10, 20), Dimension::new(11, 22));
    }
}
