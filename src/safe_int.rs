use std::fmt;
use std::ops::{
    Add, AddAssign,
    Sub, SubAssign,
    Mul, MulAssign,
    Div, DivAssign,
    Rem, RemAssign,
    BitAnd, BitAndAssign,
    BitOr, BitOrAssign,
    BitXor, BitXorAssign,
    Shl, ShlAssign,
    Shr, ShrAssign,
    Not,
};

use num::{PrimInt, ToPrimitive};
use num::traits::AsPrimitive;

/// Checked integer wrapper used as the storage unit of every register.
///
/// Conversions that cannot lose information are plain `From` impls.
/// Anything else has to go through `cast` (wrapping, like `as`) or
/// `checked_cast`, so a narrowing conversion is always spelled out.
#[repr(transparent)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SafeInt<T>(T);

impl<T: PrimInt> SafeInt<T> {
    pub const fn new(value: T) -> Self {
        SafeInt(value)
    }

    pub fn get(self) -> T {
        self.0
    }

    /// Explicit conversion with `as` semantics.
    pub fn cast<U>(self) -> SafeInt<U>
    where
        T: AsPrimitive<U>,
        U: PrimInt + 'static,
    {
        SafeInt(self.0.as_())
    }

    /// Explicit conversion that fails if the value does not fit.
    pub fn checked_cast<U: PrimInt>(self) -> Option<SafeInt<U>> {
        num::cast::<T, U>(self.0).map(SafeInt)
    }

    /// Converts to an array index.
    ///
    /// Panics if the value is negative.
    pub fn index(self) -> usize {
        match self.0.to_usize() {
            Some(index) => index,
            None => panic!("attempted to convert negative or oversized value to array index"),
        }
    }

    pub fn is_nonzero(self) -> bool {
        self.0 != T::zero()
    }
}

impl<T: fmt::Display> fmt::Display for SafeInt<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: fmt::UpperHex> fmt::UpperHex for SafeInt<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

// Wrapping and unwrapping the same type.
macro_rules! same_type_impl {
    ($($typ:ty),+) => {
        $(
            impl From<$typ> for SafeInt<$typ> {
                fn from(value: $typ) -> Self {
                    SafeInt(value)
                }
            }

            impl From<SafeInt<$typ>> for $typ {
                fn from(value: SafeInt<$typ>) -> Self {
                    value.0
                }
            }
        )+
    }
}

// Widening that keeps every value: same sign and larger,
// or unsigned into a strictly larger signed type.
macro_rules! lossless_impl {
    ($from:ty => $($to:ty),+) => {
        $(
            impl From<$from> for SafeInt<$to> {
                fn from(value: $from) -> Self {
                    SafeInt(<$to>::from(value))
                }
            }

            impl From<SafeInt<$from>> for SafeInt<$to> {
                fn from(value: SafeInt<$from>) -> Self {
                    SafeInt(<$to>::from(value.0))
                }
            }
        )+
    }
}

same_type_impl!(u8, u16, u32, u64, usize, i8, i16, i32, i64);

lossless_impl!(u8 => u16, u32, u64, usize, i16, i32, i64);
lossless_impl!(u16 => u32, u64, usize, i32, i64);
lossless_impl!(u32 => u64, i64);
lossless_impl!(i8 => i16, i32, i64);
lossless_impl!(i16 => i32, i64);
lossless_impl!(i32 => i64);

impl From<SafeInt<u8>> for usize {
    fn from(value: SafeInt<u8>) -> Self {
        usize::from(value.0)
    }
}

impl From<SafeInt<u16>> for usize {
    fn from(value: SafeInt<u16>) -> Self {
        usize::from(value.0)
    }
}

macro_rules! binary_op_impl {
    ($($op:ident, $method:ident, $assign_op:ident, $assign_method:ident);+ $(;)?) => {
        $(
            impl<T: PrimInt> $op for SafeInt<T> {
                type Output = Self;

                fn $method(self, rhs: Self) -> Self {
                    SafeInt($op::$method(self.0, rhs.0))
                }
            }

            impl<T: PrimInt> $assign_op for SafeInt<T> {
                fn $assign_method(&mut self, rhs: Self) {
                    *self = $op::$method(*self, rhs);
                }
            }
        )+
    }
}

binary_op_impl!(
    Add, add, AddAssign, add_assign;
    Sub, sub, SubAssign, sub_assign;
    Mul, mul, MulAssign, mul_assign;
    Div, div, DivAssign, div_assign;
    Rem, rem, RemAssign, rem_assign;
    BitAnd, bitand, BitAndAssign, bitand_assign;
    BitOr, bitor, BitOrAssign, bitor_assign;
    BitXor, bitxor, BitXorAssign, bitxor_assign;
);

impl<T: PrimInt> Shl<usize> for SafeInt<T> {
    type Output = Self;

    fn shl(self, rhs: usize) -> Self {
        SafeInt(self.0 << rhs)
    }
}

impl<T: PrimInt> Shr<usize> for SafeInt<T> {
    type Output = Self;

    fn shr(self, rhs: usize) -> Self {
        SafeInt(self.0 >> rhs)
    }
}

impl<T: PrimInt> ShlAssign<usize> for SafeInt<T> {
    fn shl_assign(&mut self, rhs: usize) {
        *self = *self << rhs;
    }
}

impl<T: PrimInt> ShrAssign<usize> for SafeInt<T> {
    fn shr_assign(&mut self, rhs: usize) {
        *self = *self >> rhs;
    }
}

impl<T: PrimInt> Not for SafeInt<T> {
    type Output = Self;

    fn not(self) -> Self {
        SafeInt(!self.0)
    }
}
