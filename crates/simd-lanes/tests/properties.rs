//! Cross-type properties of vectors and arrays.
#![cfg(target_arch = "x86_64")]

use approx::assert_relative_eq;
use simd_lanes::{
    capabilities, Error, F32x4, F32x8, F64x4, I16x16, I32x4, I32x8, I64x2, I8x16, InstructionSet,
    U16x8, U32x4, U64x4, U8x16, U8x32, Vector, VectorArray, VectorView, W128, W256,
};

/// Skip the rest of a test when the host cannot construct the vector type.
macro_rules! or_skip {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(Error::UnsupportedCapability { .. }) => {
                println!("skipping: vector type not supported on this host");
                return;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    };
}

macro_rules! round_trip {
    ($($(#[$meta:meta])* $name:ident: $ty:ty => $values:expr;)*) => {
        $(
            $(#[$meta])*
            #[test]
            fn $name() {
                let values = $values;
                let v = or_skip!(<$ty>::from_slice(&values));
                for (i, expected) in values.iter().enumerate() {
                    assert_eq!(v.element_at(i), *expected);
                }
                for i in values.len()..<$ty>::LANES {
                    assert_eq!(v.element_at(i), Default::default());
                }
            }
        )*
    };
}

round_trip! {
    test_round_trip_i8x16: I8x16 => [-128i8, -1, 0, 1, 127];
    test_round_trip_u8x32: U8x32 => [255u8; 32];
    test_round_trip_u16x8: U16x8 => [1u16, 65_535, 7];
    test_round_trip_i32x8: I32x8 => [i32::MIN, -1, 0, 1, i32::MAX, 42, 43];
    test_round_trip_i64x2: I64x2 => [i64::MIN, i64::MAX];
    test_round_trip_u64x4: U64x4 => [u64::MAX];
    test_round_trip_f32x8: F32x8 => [0.5f32, -0.0, f32::MAX, f32::MIN_POSITIVE];
    test_round_trip_f64x4: F64x4 => [1.0e300f64, -2.5, 0.0];
    #[cfg(feature = "avx512")]
    test_round_trip_i8x64: simd_lanes::I8x64 => [-128i8, 127, 1, -1, 5];
    #[cfg(feature = "avx512")]
    test_round_trip_i16x32: simd_lanes::I16x32 => [i16::MIN, i16::MAX, 300];
    #[cfg(feature = "avx512")]
    test_round_trip_i32x16: simd_lanes::I32x16 => [i32::MIN, 0, i32::MAX, 9];
    #[cfg(feature = "avx512")]
    test_round_trip_f32x16: simd_lanes::F32x16 => [1.5f32; 16];
    #[cfg(feature = "avx512")]
    test_round_trip_f64x8: simd_lanes::F64x8 => [-0.5f64, 1.0e-300, 8.0];
}

#[test]
fn test_identities() {
    fn check<W, E>(values: &[E])
    where
        W: simd_lanes::Width,
        E: simd_lanes::LaneMul<W>,
    {
        let a = or_skip!(Vector::<W, E>::from_slice(values));
        let zero = or_skip!(Vector::<W, E>::new());
        let one = or_skip!(Vector::<W, E>::splat(E::ONE));

        assert_eq!(&a + &zero, a);
        assert_eq!(&a - &zero, a);
        assert_eq!(&a * &one, a);
    }

    check::<W128, i16>(&[1, -2, 3, i16::MAX, i16::MIN]);
    check::<W128, u32>(&[0, 1, u32::MAX, 12_345]);
    check::<W128, f32>(&[1.5, -0.25, 1.0e30, 3.0]);
    check::<W256, i32>(&[7, -7, i32::MAX]);
    check::<W256, f64>(&[1.0, 2.0, -3.0, 0.125]);

    #[cfg(feature = "avx512")]
    {
        use simd_lanes::W512;
        check::<W512, i16>(&[-1, 2, i16::MIN, i16::MAX, 1_000]);
        check::<W512, u32>(&[u32::MAX, 0, 77]);
        check::<W512, f32>(&[0.25, -8.0, 1.0e20]);
        check::<W512, f64>(&[3.0, -1.0e-200, 2.5]);
    }
}

#[test]
fn test_u8_wraps_never_saturates() {
    let a = or_skip!(U8x16::splat(200));
    let b = or_skip!(U8x16::splat(100));
    assert!((&a + &b).get().iter().all(|&x| x == 44));
    assert!((&b - &a).get().iter().all(|&x| x == 156));
}

#[test]
fn test_i8_wraps_as_bits() {
    let a = or_skip!(I8x16::splat(-56));
    let b = or_skip!(I8x16::splat(100));
    assert!((&a + &b).get().iter().all(|&x| x == 44));

    let max = or_skip!(I8x16::splat(i8::MAX));
    let one = or_skip!(I8x16::splat(1));
    assert!((&max + &one).get().iter().all(|&x| x == i8::MIN));
}

#[test]
fn test_i32x4_concrete_sum() {
    let a = or_skip!(I32x4::from_array([1, 2, 3, 4]));
    let b = or_skip!(I32x4::from_array([5, 6, 7, 8]));
    assert_eq!((&a + &b).get(), &[6, 8, 10, 12]);
}

#[test]
fn test_u32_multiply_keeps_low_bits() {
    let a = or_skip!(U32x4::from_array([0xFFFF_FFFF, 0x8000_0000, 3, 0x1_0001]));
    let b = or_skip!(U32x4::from_array([0xFFFF_FFFF, 2, 5, 0x1_0001]));
    let expected: Vec<u32> = a
        .get()
        .iter()
        .zip(b.get())
        .map(|(x, y)| x.wrapping_mul(*y))
        .collect();
    assert_eq!((&a * &b).to_vec(), expected);
}

#[test]
fn test_i16x16_multiply_matches_scalar() {
    let values: Vec<i16> = (0..16).map(|i| i * 1_000 - 7_000).collect();
    let a = or_skip!(I16x16::from_slice(&values));
    let product = &a * &a;
    for (i, x) in values.iter().enumerate() {
        assert_eq!(product.element_at(i), x.wrapping_mul(*x));
    }
}

#[test]
fn test_f32_ops_match_wide() {
    let xs = [1.25f32, -3.5, 1.0e-3, 8.0];
    let ys = [0.5f32, 2.0, -4.0, 3.0];
    let a = or_skip!(F32x4::from_array(xs));
    let b = or_skip!(F32x4::from_array(ys));

    let wa = wide::f32x4::from(xs);
    let wb = wide::f32x4::from(ys);

    assert_eq!((&a + &b).get(), &(wa + wb).to_array());
    assert_eq!((&a - &b).get(), &(wa - wb).to_array());
    assert_eq!((&a * &b).get(), &(wa * wb).to_array());
    assert_eq!((&a / &b).get(), &(wa / wb).to_array());
}

#[test]
fn test_f64x4_ops_match_wide() {
    let xs = [1.0e10f64, -0.1, 7.5, 2.0];
    let ys = [3.0f64, 0.3, -2.5, 1.0e-10];
    let a = or_skip!(F64x4::from_array(xs));
    let b = or_skip!(F64x4::from_array(ys));

    let wa = wide::f64x4::from(xs);
    let wb = wide::f64x4::from(ys);

    assert_eq!((&a * &b).get(), &(wa * wb).to_array());
    assert_eq!((&a / &b).get(), &(wa / wb).to_array());
}

#[test]
fn test_nan_propagates() {
    let a = or_skip!(F32x4::from_array([f32::NAN, 1.0, f32::INFINITY, 0.0]));
    let b = or_skip!(F32x4::from_array([1.0, f32::NAN, f32::NEG_INFINITY, 0.0]));
    let sum = &a + &b;
    assert!(sum.element_at(0).is_nan());
    assert!(sum.element_at(1).is_nan());
    assert!(sum.element_at(2).is_nan());
    assert!((&a / &b).element_at(3).is_nan());
}

#[test]
fn test_raw_import_one_byte_off_fails() {
    #[repr(C, align(32))]
    struct Storage([u8; 64]);

    let mut storage = Storage([0; 64]);
    let base = storage.0.as_mut_ptr();

    let ok = unsafe { VectorView::<W128, u8>::from_raw(base) };
    assert!(ok.is_ok());
    drop(ok);

    let shifted = base.wrapping_add(1);
    for _ in 0..3 {
        let err = unsafe { VectorView::<W128, u8>::from_raw(shifted) }.unwrap_err();
        assert!(matches!(err, Error::MisalignedImport { alignment: 16, .. }));
    }
}

#[test]
fn test_bulk_integer_round_trip() {
    let lanes: Vec<i32> = (0..2048i32).map(|i| i.wrapping_mul(0x9E37_79B1u32 as i32)).collect();
    let original = or_skip!(VectorArray::<I32x8, 256>::from_slice(&lanes));
    let other = or_skip!(VectorArray::<I32x8, 256>::splat(-1_000_000_007));

    let mut a = original.clone();
    a += &other;
    a -= &other;
    assert_eq!(a.as_slice(), original.as_slice());
}

#[test]
fn test_bulk_float_round_trip() {
    let lanes: Vec<f32> = (0..8 * 128).map(|i| (i as f32).sin() * 100.0).collect();
    let original = or_skip!(VectorArray::<F32x8, 128>::from_slice(&lanes));
    let other = or_skip!(VectorArray::<F32x8, 128>::splat(0.1));

    let mut a = original.clone();
    a += &other;
    a -= &other;
    for (x, y) in a.as_slice().iter().zip(original.as_slice()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-4);
    }
}

#[test]
fn test_baseline_only_rejects_256_bit_uniformly() {
    let caps = capabilities().limit(InstructionSet::Sse2);

    #[repr(C, align(32))]
    struct Storage([f32; 8]);
    let mut storage = Storage([0.0; 8]);
    let raw = storage.0.as_mut_ptr();

    let results = [
        F32x8::new_with(&caps).err(),
        F32x8::splat_with(1.0, &caps).err(),
        F32x8::from_array_with([1.0, 2.0], &caps).err(),
        F32x8::from_slice_with(&[1.0; 8], &caps).err(),
        unsafe { VectorView::<W256, f32>::from_raw_with(raw, &caps) }.err(),
        VectorView::<W256, f32>::import_with(&mut storage.0, &caps).err(),
        VectorArray::<F32x8, 4>::new_with(&caps).err(),
        VectorArray::<F32x8, 4>::splat_with(1.0, &caps).err(),
    ];
    for result in results {
        assert_eq!(
            result,
            Some(Error::UnsupportedCapability {
                lane: "f32",
                bits: 256,
                required: InstructionSet::Avx,
            })
        );
    }

    // The 128-bit types still construct under the same descriptor.
    assert!(I32x4::new_with(&caps).is_ok());
    assert!(U8x16::new_with(&caps).is_ok());
}

#[test]
fn test_is_supported_follows_descriptor() {
    let caps = capabilities();
    assert_eq!(F32x8::is_supported(), caps.supports(InstructionSet::Avx));
    assert_eq!(I32x8::is_supported(), caps.supports(InstructionSet::Avx2));
    assert!(I32x4::is_supported());
}

#[cfg(feature = "avx512")]
mod wide_512 {
    use super::*;
    use simd_lanes::{F32x16, F64x8, I16x32, I8x64, U64x8};

    #[test]
    fn test_i8x64_wraps() {
        let max = or_skip!(I8x64::splat(i8::MAX));
        let one = or_skip!(I8x64::splat(1));
        assert!((&max + &one).get().iter().all(|&x| x == i8::MIN));
        assert!((&one - &max).get().iter().all(|&x| x == -126));
    }

    #[test]
    fn test_i16x32_multiply_matches_scalar() {
        let values: Vec<i16> = (0..32).map(|i| i * 1_111 - 17_000).collect();
        let a = or_skip!(I16x32::from_slice(&values));
        let product = &a * &a;
        for (i, x) in values.iter().enumerate() {
            assert_eq!(product.element_at(i), x.wrapping_mul(*x));
        }
    }

    #[test]
    fn test_u64x8_add_sub_wraps() {
        let a = or_skip!(U64x8::splat(u64::MAX));
        let b = or_skip!(U64x8::splat(2));
        assert!((&a + &b).get().iter().all(|&x| x == 1));
        assert!((&b - &a).get().iter().all(|&x| x == 3));
    }

    #[test]
    fn test_float_ops_match_scalar() {
        let xs: Vec<f32> = (0..16).map(|i| i as f32 * 0.75 - 4.0).collect();
        let a = or_skip!(F32x16::from_slice(&xs));
        let b = or_skip!(F32x16::splat(-1.5));
        let (sum, diff, prod, quot) = (&a + &b, &a - &b, &a * &b, &a / &b);
        for (i, x) in xs.iter().enumerate() {
            assert_eq!(sum.element_at(i), x + -1.5);
            assert_eq!(diff.element_at(i), x - -1.5);
            assert_eq!(prod.element_at(i), x * -1.5);
            assert_eq!(quot.element_at(i), x / -1.5);
        }

        let c = or_skip!(F64x8::from_array([1.0, -2.0, 4.0, 0.5, 3.0, 6.0, -7.0, 9.5]));
        let d = or_skip!(F64x8::splat(2.0));
        assert_eq!((&c / &d).get(), &[0.5, -1.0, 2.0, 0.25, 1.5, 3.0, -3.5, 4.75]);
    }

    #[test]
    fn test_bulk_f64x8_round_trip() {
        let lanes: Vec<f64> = (0..8 * 64).map(|i| (i as f64).cos() * 1.0e3).collect();
        let original = or_skip!(VectorArray::<F64x8, 64>::from_slice(&lanes));
        let other = or_skip!(VectorArray::<F64x8, 64>::splat(0.3));

        let mut a = original.clone();
        a += &other;
        a -= &other;
        for (x, y) in a.as_slice().iter().zip(original.as_slice()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-9);
        }

        let shifted = a.clone();
        a *= &other;
        a /= &other;
        for (x, y) in a.as_slice().iter().zip(shifted.as_slice()) {
            assert_relative_eq!(*x, *y, max_relative = 1e-12);
        }
    }
}
