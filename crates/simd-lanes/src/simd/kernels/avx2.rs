//! 256-bit integer kernels (AVX2).

use core::arch::x86_64::*;

binary_kernel! {
    add_epi8: "avx2", _mm256_load_si256, _mm256_store_si256, _mm256_add_epi8;
    add_epi16: "avx2", _mm256_load_si256, _mm256_store_si256, _mm256_add_epi16;
    add_epi32: "avx2", _mm256_load_si256, _mm256_store_si256, _mm256_add_epi32;
    add_epi64: "avx2", _mm256_load_si256, _mm256_store_si256, _mm256_add_epi64;

    sub_epi8: "avx2", _mm256_load_si256, _mm256_store_si256, _mm256_sub_epi8;
    sub_epi16: "avx2", _mm256_load_si256, _mm256_store_si256, _mm256_sub_epi16;
    sub_epi32: "avx2", _mm256_load_si256, _mm256_store_si256, _mm256_sub_epi32;
    sub_epi64: "avx2", _mm256_load_si256, _mm256_store_si256, _mm256_sub_epi64;

    mullo_epi16: "avx2", _mm256_load_si256, _mm256_store_si256, _mm256_mullo_epi16;
    mullo_epi32: "avx2", _mm256_load_si256, _mm256_store_si256, _mm256_mullo_epi32;
}
