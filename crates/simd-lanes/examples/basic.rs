//! Basic example of capability-gated vectors.

#[cfg(target_arch = "x86_64")]
fn main() {
    use simd_lanes::prelude::*;
    use simd_lanes::{CapabilityMatrix, F32x8, I32x4, U8x16};

    println!("SIMD Lanes - Basic Example\n");
    println!("{}\n", simd_lanes::version_info());

    println!("Capability matrix:");
    println!("{}\n", CapabilityMatrix::current());

    // 128-bit integer lanes are always available on x86-64.
    let a = I32x4::from_array([1, 2, 3, 4]).expect("SSE2 is part of x86-64");
    let b = I32x4::from_array([5, 6, 7, 8]).expect("SSE2 is part of x86-64");
    println!("{:?} + {:?} = {:?}", a.get(), b.get(), (&a + &b).get());

    // Integer lanes wrap instead of saturating.
    let x = U8x16::splat(200).expect("SSE2 is part of x86-64");
    let y = U8x16::splat(100).expect("SSE2 is part of x86-64");
    println!("200u8 + 100u8 = {} (wrapped)", (&x + &y).element_at(0));

    // 256-bit float lanes need AVX, which the host may not have.
    println!("\n--- 256-bit floats ---\n");
    match F32x8::splat(1.5) {
        Ok(mut v) => {
            let two = F32x8::splat(2.0).expect("AVX already checked");
            v *= &two;
            println!("1.5 * 2.0 = {:?}", v.get());
        }
        Err(err) => println!("Skipped: {}", err),
    }

    // Forcing the baseline shows every 256-bit constructor failing the same way.
    let baseline = capabilities().limit(InstructionSet::Sse2);
    if let Err(err) = F32x8::new_with(&baseline) {
        println!("With an SSE2 ceiling: {}", err);
    }

    // Bulk arithmetic over many registers.
    println!("\n--- VectorArray ---\n");
    let lanes: Vec<i32> = (0..64).collect();
    let mut arr = VectorArray::<I32x4, 16>::from_slice(&lanes).expect("64 lanes fill 16 blocks");
    let ones = VectorArray::<I32x4, 16>::splat(1).expect("SSE2 is part of x86-64");

    arr += &ones;
    println!("block 0 after += 1: {:?}", arr.block(0));
    arr -= &ones;
    println!("block 0 after -= 1: {:?}", arr.block(0));
    assert_eq!(arr.as_slice(), lanes.as_slice());

    // A block can be borrowed as a vector without another capability check.
    let mut view = arr.view_mut(15);
    view += &a;
    println!("block 15 + [1, 2, 3, 4] = {:?}", view.get());

    println!("\nDone!");
}

#[cfg(not(target_arch = "x86_64"))]
fn main() {
    println!("{}", simd_lanes::version_info());
    println!("No vector types are available on this target.");
}
