//! Null-marker capability for keys.
//!
//! Strict dictionary construction rejects null keys; everything else treats a
//! null key as an ordinary value compared through the injected comparer.

/// Reports whether a value is the absent-value marker.
pub trait MaybeNull {
    fn is_null(&self) -> bool {
        false
    }
}

impl<T> MaybeNull for Option<T> {
    fn is_null(&self) -> bool {
        self.is_none()
    }
}

impl<T: MaybeNull + ?Sized> MaybeNull for &T {
    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

impl<T: MaybeNull + ?Sized> MaybeNull for Box<T> {
    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

macro_rules! never_null {
    ($($t:ty),* $(,)?) => {
        $(impl MaybeNull for $t {})*
    };
}

never_null!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, str,
    String,
);

macro_rules! never_null_tuple {
    ($($name:ident),+) => {
        impl<$($name),+> MaybeNull for ($($name,)+) {}
    };
}

never_null_tuple!(A);
never_null_tuple!(A, B);
never_null_tuple!(A, B, C);
never_null_tuple!(A, B, C, D);
