//! 512-bit kernels (AVX-512F, and AVX-512BW for byte/word lanes).

use core::arch::x86_64::*;

binary_kernel! {
    add_epi8: "avx512bw", _mm512_load_si512, _mm512_store_si512, _mm512_add_epi8;
    add_epi16: "avx512bw", _mm512_load_si512, _mm512_store_si512, _mm512_add_epi16;
    add_epi32: "avx512f", _mm512_load_si512, _mm512_store_si512, _mm512_add_epi32;
    add_epi64: "avx512f", _mm512_load_si512, _mm512_store_si512, _mm512_add_epi64;

    sub_epi8: "avx512bw", _mm512_load_si512, _mm512_store_si512, _mm512_sub_epi8;
    sub_epi16: "avx512bw", _mm512_load_si512, _mm512_store_si512, _mm512_sub_epi16;
    sub_epi32: "avx512f", _mm512_load_si512, _mm512_store_si512, _mm512_sub_epi32;
    sub_epi64: "avx512f", _mm512_load_si512, _mm512_store_si512, _mm512_sub_epi64;

    mullo_epi16: "avx512bw", _mm512_load_si512, _mm512_store_si512, _mm512_mullo_epi16;
    mullo_epi32: "avx512f", _mm512_load_si512, _mm512_store_si512, _mm512_mullo_epi32;

    add_ps: "avx512f", _mm512_load_ps, _mm512_store_ps, _mm512_add_ps;
    sub_ps: "avx512f", _mm512_load_ps, _mm512_store_ps, _mm512_sub_ps;
    mul_ps: "avx512f", _mm512_load_ps, _mm512_store_ps, _mm512_mul_ps;
    div_ps: "avx512f", _mm512_load_ps, _mm512_store_ps, _mm512_div_ps;

    add_pd: "avx512f", _mm512_load_pd, _mm512_store_pd, _mm512_add_pd;
    sub_pd: "avx512f", _mm512_load_pd, _mm512_store_pd, _mm512_sub_pd;
    mul_pd: "avx512f", _mm512_load_pd, _mm512_store_pd, _mm512_mul_pd;
    div_pd: "avx512f", _mm512_load_pd, _mm512_store_pd, _mm512_div_pd;
}
