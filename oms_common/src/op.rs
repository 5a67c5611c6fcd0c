/// Implements the `std::ops` arithmetic traits for single-field newtypes.
///
/// ```rust,ignore
/// op!(binary Money, Add, add);
/// op!(inplace Money, AddAssign, add_assign);
/// op!(unary Money, Neg, neg);
/// ```
#[macro_export]
macro_rules! op {
    (binary $unit:ty, $trt:ident, $fn:ident) => {
        impl std::ops::$trt for $unit {
            type Output = Self;

            fn $fn(self, rhs: Self) -> Self::Output {
                Self(std::ops::$trt::$fn(self.0, rhs.0))
            }
        }
    };

    (inplace $unit:ty, $trt:ident, $fn:ident) => {
        impl std::ops::$trt for $unit {
            fn $fn(&mut self, rhs: Self) {
                std::ops::$trt::$fn(&mut self.0, rhs.0)
            }
        }
    };

    (unary $unit:ty, $trt:ident, $fn:ident) => {
        impl std::ops::$trt for $unit {
            type Output = Self;

            fn $fn(self) -> Self::Output {
                Self(std::ops::$trt::$fn(self.0))
            }
        }
    };
}
