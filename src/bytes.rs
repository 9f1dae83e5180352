use alloc::{
    borrow::{Cow, ToOwned},
    boxed::Box,
    ffi::CString,
    rc::Rc,
    string::String,
    sync::Arc,
    vec::Vec,
};
use core::{
    ffi::CStr,
    marker::PhantomData,
    num::{
        NonZeroI128, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI8, NonZeroIsize, NonZeroU128,
        NonZeroU16, NonZeroU32, NonZeroU64, NonZeroU8, NonZeroUsize,
    },
};
use paste::paste;

/// Any type implementing `AsBytes` can be decomposed into bytes.
///
/// The primary purpose of this trait is to allow different types to be used as
/// keys on the [`crate::RadixTrie`] type. Keys are compared purely by their
/// byte representation, there is no notion of characters or code points.
pub trait AsBytes {
    /// View the current value as a byte array.
    fn as_bytes(&self) -> &[u8];
}

macro_rules! as_bytes_for_integer_like_types {
    ($($type:ty),*) => {
        $(
            impl AsBytes for $type {
                fn as_bytes(&self) -> &[u8] {
                    bytemuck::bytes_of(self)
                }
            }

            impl AsBytes for [$type] {
                fn as_bytes(&self) -> &[u8] {
                    bytemuck::cast_slice(self)
                }
            }

            impl AsBytes for Vec<$type> {
                fn as_bytes(&self) -> &[u8] {
                    bytemuck::cast_slice(self)
                }
            }
        )*
    };
}

as_bytes_for_integer_like_types!(
    u8,
    i8,
    u16,
    i16,
    u32,
    i32,
    u64,
    i64,
    u128,
    i128,
    usize,
    isize,
    NonZeroU8,
    NonZeroI8,
    NonZeroU16,
    NonZeroI16,
    NonZeroU32,
    NonZeroI32,
    NonZeroU64,
    NonZeroI64,
    NonZeroU128,
    NonZeroI128,
    NonZeroUsize,
    NonZeroIsize
);

impl<const N: usize> AsBytes for [u8; N] {
    fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsBytes for str {
    fn as_bytes(&self) -> &[u8] {
        str::as_bytes(self)
    }
}

impl AsBytes for String {
    fn as_bytes(&self) -> &[u8] {
        str::as_bytes(self)
    }
}

impl AsBytes for CStr {
    fn as_bytes(&self) -> &[u8] {
        self.to_bytes()
    }
}

impl AsBytes for CString {
    fn as_bytes(&self) -> &[u8] {
        self.as_c_str().to_bytes()
    }
}

impl<'a, B> AsBytes for Cow<'a, B>
where
    B: ToOwned + AsBytes + ?Sized,
{
    fn as_bytes(&self) -> &[u8] {
        <B as AsBytes>::as_bytes(self)
    }
}

impl<'a, T> AsBytes for &'a T
where
    T: AsBytes + ?Sized,
{
    fn as_bytes(&self) -> &[u8] {
        <T as AsBytes>::as_bytes(self)
    }
}

impl<'a, T> AsBytes for &'a mut T
where
    T: AsBytes + ?Sized,
{
    fn as_bytes(&self) -> &[u8] {
        <T as AsBytes>::as_bytes(self)
    }
}

impl<T> AsBytes for Rc<T>
where
    T: AsBytes + ?Sized,
{
    fn as_bytes(&self) -> &[u8] {
        <T as AsBytes>::as_bytes(self)
    }
}

impl<T> AsBytes for Arc<T>
where
    T: AsBytes + ?Sized,
{
    fn as_bytes(&self) -> &[u8] {
        <T as AsBytes>::as_bytes(self)
    }
}

impl<T> AsBytes for Box<T>
where
    T: AsBytes + ?Sized,
{
    fn as_bytes(&self) -> &[u8] {
        <T as AsBytes>::as_bytes(self)
    }
}

/// Concats two or more types that implement [`AsBytes`] into a single flat
/// key.
///
/// This is handy when the key of a record is spread over several columns. The
/// construction of this type will allocate memory, since the concatenated bytes
/// need to be in a flat buffer.
///
/// ```rust
/// use compact_radix::{AsBytes, Concat};
///
/// let key = Concat::<(&str, &str)>::from((&"AA", &"-AB"));
/// assert_eq!(key.as_bytes(), b"AA-AB");
/// ```
#[derive(Debug)]
pub struct Concat<T>(Box<[u8]>, PhantomData<T>);

impl<T> AsBytes for Concat<T> {
    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl<T> Clone for Concat<T> {
    fn clone(&self) -> Self {
        Concat(self.0.clone(), PhantomData)
    }
}

impl<T> PartialEq for Concat<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Concat<T> {}

macro_rules! as_bytes_for_concat {
    ($(($($ty:ident)+))+) => {
        $(
            paste! {
                impl<$($ty, [< Q $ty >],)+> From<($(&[< Q $ty >],)*)> for Concat<($($ty,)+)>
                where
                    $(
                        [< Q $ty >]: AsBytes + ?Sized,
                    )+
                {
                    #[inline(always)]
                    fn from(value: ($(&[< Q $ty >],)+)) -> Self {
                        #[allow(non_snake_case)]
                        let ($($ty,)+) = value;

                        $(
                            #[allow(non_snake_case)]
                            let $ty = $ty.as_bytes();
                        )+

                        let mut sum = 0;
                        $(sum += $ty.len();)+

                        let mut buf = Vec::with_capacity(sum);
                        $(buf.extend_from_slice($ty);)+

                        Self(buf.into_boxed_slice(), PhantomData)
                    }
                }
            }
        )*
    };
}

as_bytes_for_concat!(
    (T0 T1)
    (T0 T1 T2)
    (T0 T1 T2 T3)
    (T0 T1 T2 T3 T4)
    (T0 T1 T2 T3 T4 T5)
);
