/*++

Licensed under the Apache-2.0 license.

File Name:

    test_ecc.rs

Abstract:

    File contains P-256 and P-384 point multiplication tests against known
    multiples of the generator and the RustCrypto curve implementations.

--*/

use casper_drivers::{Casper, CasperError, Curve, EmuEngine, Layout};
use rand::rngs::StdRng;
use rand::SeedableRng;

const P256_2G_X: [u32; 8] = [
    0x47669978, 0xa60b48fc, 0x77f21b35, 0xc08969e2, 0x04b51ac3, 0x8a523803, 0x8d034f7e, 0x7cf27b18,
];

const P256_2G_Y: [u32; 8] = [
    0x227873d1, 0x9e04b79d, 0x3ce98229, 0xba7dade6, 0x9f7430db, 0x293d9ac6, 0xdb8ed040, 0x07775510,
];

const P256_3G_X: [u32; 8] = [
    0xc6e7fd6c, 0xfb41661b, 0xefada985, 0xe6c6b721, 0x1d4bf165, 0xc8f7ef95, 0xa6330a44, 0x5ecbe4d1,
];

const P256_3G_Y: [u32; 8] = [
    0xa27d5032, 0x9a79b127, 0x384fb83d, 0xd82ab036, 0x1a64a2ec, 0x374b06ce, 0x4998ff7e, 0x8734640c,
];

const P256_NEG_GY: [u32; 8] = [
    0xc840ae0a, 0x3449bf97, 0x94cea131, 0xd431cca9, 0x83f061e9, 0x711814b5, 0x01e58065, 0xb01cbd1c,
];

const P384_2G_X: [u32; 12] = [
    0x5295df61, 0x5b96a9c7, 0xbe0e64f8, 0x4fe0e86e, 0x9fb96e9e, 0x51d207d1, 0xa6f434d6, 0x89025959,
    0xc55b97f0, 0x69260045, 0x7ba3d2d9, 0x08d99905,
];

const P384_2G_Y: [u32; 12] = [
    0x0a940e80, 0x61501e70, 0x4d39e22d, 0x5ffd43e9, 0x256ab425, 0x904e505f, 0xbc6cc43e, 0xb275d875,
    0xfd6dba74, 0xb7bfe8df, 0x5b1b3ced, 0x8e80f1fa,
];

const P384_3G_X: [u32; 12] = [
    0x0500c831, 0x02d7e5c7, 0x5026580d, 0xb408bbae, 0xd3566da6, 0xbea4f240, 0x202dcd06, 0xcb9d3910,
    0x5fdc7d98, 0x64793c7e, 0x606ffa14, 0x077a41d4,
];

const P384_3G_Y: [u32; 12] = [
    0x0a2f1df1, 0xb65f2860, 0xe4b5d298, 0xc24abd6b, 0xdc111eac, 0xf7684c0e, 0x85115aa5, 0x8520b41c,
    0x02a9fc99, 0x7d0bbe96, 0x0b0c4283, 0xc995f7ca,
];

const P384_NEG_GY: [u32; 12] = [
    0x6f15f1a0, 0x85bce284, 0xe2817e62, 0xf59f4e30, 0x4a0f473e, 0x1625ceec, 0xd765eb83, 0x070be242,
    0x6d6d23d6, 0xa2616740, 0x69d9d390, 0xc9e821b5,
];

/// Big-endian bytes to little-endian words
fn words(be: &[u8]) -> Vec<u32> {
    be.rchunks(4)
        .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

macro_rules! reference_curve {
    ($module:ident, $krate:ident) => {
        mod $module {
            use super::words;
            use elliptic_curve::sec1::ToEncodedPoint;
            use elliptic_curve::{Field, PrimeField};
            use rand::rngs::StdRng;

            pub use $krate::{AffinePoint, ProjectivePoint, Scalar};

            pub fn scalar_words(k: Scalar) -> Vec<u32> {
                words(&k.to_repr())
            }

            pub fn random_scalar(rng: &mut StdRng) -> (Scalar, Vec<u32>) {
                let k = Scalar::random(&mut *rng);
                (k, scalar_words(k))
            }

            /// Affine coordinates, with the identity as `(0, 0)`
            pub fn affine(p: ProjectivePoint) -> (Vec<u32>, Vec<u32>) {
                let encoded = AffinePoint::from(p).to_encoded_point(false);
                if encoded.is_identity() {
                    let zero = vec![0u32; $krate::FieldBytes::default().len() / 4];
                    return (zero.clone(), zero);
                }
                (words(encoded.x().unwrap()), words(encoded.y().unwrap()))
            }
        }
    };
}

reference_curve!(ref256, p256);
reference_curve!(ref384, p384);

fn plus(a: &[u32], n: u32) -> Vec<u32> {
    let mut v = a.to_vec();
    v[0] += n;
    v
}

fn minus(a: &[u32], n: u32) -> Vec<u32> {
    let mut v = a.to_vec();
    v[0] -= n;
    v
}

fn small(curve: Curve, k: u32) -> Vec<u32> {
    let mut v = vec![0u32; curve.limbs()];
    v[0] = k;
    v
}

/// Multiples of G that have known answers
fn check_generator_multiples(
    curve: Curve,
    layout: Layout,
    g2: (&[u32], &[u32]),
    g3: (&[u32], &[u32]),
    neg_gy: &[u32],
) {
    let params = curve.params();
    let (gx, gy, q) = (params.gx, params.gy, params.q);
    let limbs = curve.limbs();
    let zero = vec![0u32; limbs];
    let mut casper = Casper::new(EmuEngine::new(layout));

    let cases: [(Vec<u32>, &[u32], &[u32]); 6] = [
        (small(curve, 2), g2.0, g2.1),
        (small(curve, 3), g3.0, g3.1),
        (minus(q, 1), gx, neg_gy),
        (small(curve, 0), &zero[..], &zero[..]),
        (q.to_vec(), &zero[..], &zero[..]),
        (plus(q, 1), gx, gy),
    ];
    for (k, x, y) in cases.iter() {
        let mut out_x = vec![0u32; limbs];
        let mut out_y = vec![0u32; limbs];
        casper
            .ecc_mul(curve, gx, gy, k, &mut out_x, &mut out_y)
            .unwrap();
        assert_eq!(&out_x[..], *x, "k = {:x?}", k);
        assert_eq!(&out_y[..], *y, "k = {:x?}", k);
    }
}

#[test]
fn test_p256_generator_multiples() {
    for layout in [Layout::Linear, Layout::Interleaved] {
        check_generator_multiples(
            Curve::P256,
            layout,
            (&P256_2G_X, &P256_2G_Y),
            (&P256_3G_X, &P256_3G_Y),
            &P256_NEG_GY,
        );
    }
}

#[test]
fn test_p384_generator_multiples() {
    for layout in [Layout::Linear, Layout::Interleaved] {
        check_generator_multiples(
            Curve::P384,
            layout,
            (&P384_2G_X, &P384_2G_Y),
            (&P384_3G_X, &P384_3G_Y),
            &P384_NEG_GY,
        );
    }
}

#[test]
fn test_p256_fixed_size_api() {
    let params = Curve::P256.params();
    let mut gx = [0u32; 8];
    let mut gy = [0u32; 8];
    gx.copy_from_slice(params.gx);
    gy.copy_from_slice(params.gy);
    let mut casper = Casper::new(EmuEngine::new(Layout::Interleaved));

    let mut k = [0u32; 8];
    k[0] = 2;
    assert_eq!(
        casper.ecc_secp256r1_mul(&gx, &gy, &k).unwrap(),
        (P256_2G_X, P256_2G_Y)
    );

    // G + G, then 2G + G
    let one = {
        let mut one = [0u32; 8];
        one[0] = 1;
        one
    };
    assert_eq!(
        casper
            .ecc_secp256r1_mul_add((&gx, &gy), &one, (&gx, &gy), &one)
            .unwrap(),
        (P256_2G_X, P256_2G_Y)
    );
    assert_eq!(
        casper
            .ecc_secp256r1_mul_add((&P256_2G_X, &P256_2G_Y), &one, (&gx, &gy), &one)
            .unwrap(),
        (P256_3G_X, P256_3G_Y)
    );
}

#[test]
fn test_p384_fixed_size_api() {
    let params = Curve::P384.params();
    let mut gx = [0u32; 12];
    let mut gy = [0u32; 12];
    gx.copy_from_slice(params.gx);
    gy.copy_from_slice(params.gy);
    let mut one = [0u32; 12];
    one[0] = 1;
    let mut two = [0u32; 12];
    two[0] = 2;

    let mut casper = Casper::new(EmuEngine::new(Layout::Linear));
    assert_eq!(
        casper.ecc_secp384r1_mul(&gx, &gy, &two).unwrap(),
        (P384_2G_X, P384_2G_Y)
    );
    assert_eq!(
        casper
            .ecc_secp384r1_mul_add((&gx, &gy), &two, (&gx, &gy), &one)
            .unwrap(),
        (P384_3G_X, P384_3G_Y)
    );
}

#[test]
fn test_p256_random_against_reference() {
    use ref256::*;
    let mut rng = StdRng::seed_from_u64(256);
    for layout in [Layout::Linear, Layout::Interleaved] {
        let mut casper = Casper::new(EmuEngine::new(layout));
        for _ in 0..3 {
            let (r, _) = random_scalar(&mut rng);
            let (k1, k1_words) = random_scalar(&mut rng);
            let (k2, k2_words) = random_scalar(&mut rng);
            let g = ProjectivePoint::GENERATOR;
            let p = g * r;
            let (px, py) = affine(p);
            let (gx, gy) = affine(g);

            let mut out_x = [0u32; 8];
            let mut out_y = [0u32; 8];
            casper
                .ecc_mul(Curve::P256, &px, &py, &k1_words, &mut out_x, &mut out_y)
                .unwrap();
            assert_eq!((out_x.to_vec(), out_y.to_vec()), affine(p * k1));

            casper
                .ecc_mul_add(
                    Curve::P256,
                    &gx,
                    &gy,
                    &k1_words,
                    &px,
                    &py,
                    &k2_words,
                    &mut out_x,
                    &mut out_y,
                )
                .unwrap();
            assert_eq!((out_x.to_vec(), out_y.to_vec()), affine(g * k1 + p * k2));
        }
    }
}

#[test]
fn test_p384_random_against_reference() {
    use ref384::*;
    let mut rng = StdRng::seed_from_u64(384);
    let mut casper = Casper::new(EmuEngine::new(Layout::Interleaved));
    for _ in 0..2 {
        let (r, _) = random_scalar(&mut rng);
        let (k1, k1_words) = random_scalar(&mut rng);
        let (k2, k2_words) = random_scalar(&mut rng);
        let g = ProjectivePoint::GENERATOR;
        let p = g * r;
        let (px, py) = affine(p);
        let (gx, gy) = affine(g);

        let mut out_x = [0u32; 12];
        let mut out_y = [0u32; 12];
        casper
            .ecc_mul(Curve::P384, &px, &py, &k2_words, &mut out_x, &mut out_y)
            .unwrap();
        assert_eq!((out_x.to_vec(), out_y.to_vec()), affine(p * k2));

        casper
            .ecc_mul_add(
                Curve::P384,
                &px,
                &py,
                &k1_words,
                &gx,
                &gy,
                &k2_words,
                &mut out_x,
                &mut out_y,
            )
            .unwrap();
        assert_eq!((out_x.to_vec(), out_y.to_vec()), affine(p * k1 + g * k2));
    }
}

/// `k1 * P + k2 * Q` for zero, one, unbalanced and cancelling scalars,
/// including `P == Q`
macro_rules! mul_add_edge_scalars {
    ($name:ident, $module:ident, $curve:expr, $seed:expr) => {
        #[test]
        fn $name() {
            use $module::*;
            use elliptic_curve::Field;
            let mut rng = StdRng::seed_from_u64($seed);
            let (r, _) = random_scalar(&mut rng);
            let (k, _) = random_scalar(&mut rng);
            let g = ProjectivePoint::GENERATOR;
            let p = g * r;
            let (zero, one) = (Scalar::from(0u64), Scalar::from(1u64));
            let seven = Scalar::from(7u64);
            let big = Scalar::from(2u64).pow_vartime(&[254u64]);
            let cases = [
                (p, zero, g, zero),
                (p, k, g, zero),
                (p, zero, g, k),
                (p, one, g, zero),
                (p, zero, g, one),
                (p, big, g, seven),
                (p, seven, g, big),
                (p, seven, p, k),
                (p, k, p, k),
                (p, k, p, -k),
                (g, big, g, big),
            ];

            let limbs = $curve.limbs();
            for layout in [Layout::Linear, Layout::Interleaved] {
                let mut casper = Casper::new(EmuEngine::new(layout));
                for (p, k1, q, k2) in cases {
                    let (px, py) = affine(p);
                    let (qx, qy) = affine(q);
                    let mut out_x = vec![0u32; limbs];
                    let mut out_y = vec![0u32; limbs];
                    casper
                        .ecc_mul_add(
                            $curve,
                            &px,
                            &py,
                            &scalar_words(k1),
                            &qx,
                            &qy,
                            &scalar_words(k2),
                            &mut out_x,
                            &mut out_y,
                        )
                        .unwrap();
                    assert_eq!(
                        (out_x, out_y),
                        affine(p * k1 + q * k2),
                        "k1 = {:?}, k2 = {:?}",
                        k1,
                        k2
                    );
                }
            }
        }
    };
}

mul_add_edge_scalars!(test_p256_mul_add_edge_scalars, ref256, Curve::P256, 2561);
mul_add_edge_scalars!(test_p384_mul_add_edge_scalars, ref384, Curve::P384, 3841);

#[test]
fn test_session_reuse() {
    let params = Curve::P256.params();
    let mut casper = Casper::new(EmuEngine::new(Layout::Interleaved));
    let mut session = casper.ecc_session(Curve::P256).unwrap();
    let (mut x, mut y) = ([0u32; 8], [0u32; 8]);
    for (k, ex, ey) in [(2, &P256_2G_X, &P256_2G_Y), (3, &P256_3G_X, &P256_3G_Y)] {
        session
            .mul(params.gx, params.gy, &small(Curve::P256, k), &mut x, &mut y)
            .unwrap();
        assert_eq!((&x, &y), (ex, ey));
    }
}

#[test]
fn test_point_validation() {
    let mut casper = Casper::new(EmuEngine::new(Layout::Linear));
    for curve in [Curve::P256, Curve::P384] {
        let params = curve.params();
        assert!(casper.point_on_curve(curve, params.gx, params.gy).unwrap());
        assert_eq!(casper.validate_point(curve, params.gx, params.gy), Ok(()));

        let bumped = plus(params.gy, 1);
        assert!(!casper.point_on_curve(curve, params.gx, &bumped).unwrap());
        assert_eq!(
            casper.validate_point(curve, params.gx, &bumped),
            Err(CasperError::DRIVER_CASPER_POINT_NOT_ON_CURVE)
        );

        // x = p is not a reduced coordinate
        assert!(!casper.point_on_curve(curve, params.p, params.gy).unwrap());
    }
    assert!(casper.point_on_curve(Curve::P256, &P256_3G_X, &P256_3G_Y).unwrap());
    let gx = Curve::P384.params().gx;
    assert!(casper.point_on_curve(Curve::P384, gx, &P384_NEG_GY).unwrap());
}

#[test]
fn test_bad_lengths() {
    let params = Curve::P384.params();
    let mut casper = Casper::new(EmuEngine::new(Layout::Linear));
    let (mut x, mut y) = ([0u32; 8], [0u32; 8]);
    assert_eq!(
        casper.ecc_mul(Curve::P256, params.gx, params.gy, &[1; 8], &mut x, &mut y),
        Err(CasperError::DRIVER_CASPER_INVALID_WORD_LEN)
    );
    assert_eq!(
        casper.point_on_curve(Curve::P256, params.gx, params.gy),
        Err(CasperError::DRIVER_CASPER_INVALID_WORD_LEN)
    );
}
