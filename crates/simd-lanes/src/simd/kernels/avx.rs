//! 256-bit floating-point kernels (AVX).

use core::arch::x86_64::*;

binary_kernel! {
    add_ps: "avx", _mm256_load_ps, _mm256_store_ps, _mm256_add_ps;
    sub_ps: "avx", _mm256_load_ps, _mm256_store_ps, _mm256_sub_ps;
    mul_ps: "avx", _mm256_load_ps, _mm256_store_ps, _mm256_mul_ps;
    div_ps: "avx", _mm256_load_ps, _mm256_store_ps, _mm256_div_ps;

    add_pd: "avx", _mm256_load_pd, _mm256_store_pd, _mm256_add_pd;
    sub_pd: "avx", _mm256_load_pd, _mm256_store_pd, _mm256_sub_pd;
    mul_pd: "avx", _mm256_load_pd, _mm256_store_pd, _mm256_mul_pd;
    div_pd: "avx", _mm256_load_pd, _mm256_store_pd, _mm256_div_pd;
}
