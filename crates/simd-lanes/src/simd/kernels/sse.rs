//! 128-bit kernels.
//!
//! SSE2 is part of the x86-64 baseline, so the integer kernels use SSE2
//! encodings even for the lane types whose requirement is plain SSE.

use core::arch::x86_64::*;

binary_kernel! {
    add_epi8: "sse2", _mm_load_si128, _mm_store_si128, _mm_add_epi8;
    add_epi16: "sse2", _mm_load_si128, _mm_store_si128, _mm_add_epi16;
    add_epi32: "sse2", _mm_load_si128, _mm_store_si128, _mm_add_epi32;
    add_epi64: "sse2", _mm_load_si128, _mm_store_si128, _mm_add_epi64;

    sub_epi8: "sse2", _mm_load_si128, _mm_store_si128, _mm_sub_epi8;
    sub_epi16: "sse2", _mm_load_si128, _mm_store_si128, _mm_sub_epi16;
    sub_epi32: "sse2", _mm_load_si128, _mm_store_si128, _mm_sub_epi32;
    sub_epi64: "sse2", _mm_load_si128, _mm_store_si128, _mm_sub_epi64;

    mullo_epi16: "sse2", _mm_load_si128, _mm_store_si128, _mm_mullo_epi16;

    add_ps: "sse", _mm_load_ps, _mm_store_ps, _mm_add_ps;
    sub_ps: "sse", _mm_load_ps, _mm_store_ps, _mm_sub_ps;
    mul_ps: "sse", _mm_load_ps, _mm_store_ps, _mm_mul_ps;
    div_ps: "sse", _mm_load_ps, _mm_store_ps, _mm_div_ps;

    add_pd: "sse2", _mm_load_pd, _mm_store_pd, _mm_add_pd;
    sub_pd: "sse2", _mm_load_pd, _mm_store_pd, _mm_sub_pd;
    mul_pd: "sse2", _mm_load_pd, _mm_store_pd, _mm_mul_pd;
    div_pd: "sse2", _mm_load_pd, _mm_store_pd, _mm_div_pd;
}

/// Low 32 bits of each 32-bit lane product.
///
/// `pmulld` is SSE4.1, so this builds it from two `pmuludq` over the even
/// and odd lanes and interleaves the low halves back.
#[inline]
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn mullo_epi32(to: *mut u8, from: *const u8) {
    let a = _mm_load_si128(to.cast_const().cast());
    let b = _mm_load_si128(from.cast());

    let even = _mm_mul_epu32(a, b);
    let odd = _mm_mul_epu32(_mm_srli_epi64::<32>(a), _mm_srli_epi64::<32>(b));

    // Lanes 0 and 2 hold the low halves of each 64-bit product.
    let even_lo = _mm_shuffle_epi32::<0b00_00_10_00>(even);
    let odd_lo = _mm_shuffle_epi32::<0b00_00_10_00>(odd);

    _mm_store_si128(to.cast(), _mm_unpacklo_epi32(even_lo, odd_lo));
}
