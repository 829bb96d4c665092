/*++

Licensed under the Apache-2.0 license.

File Name:

    curve.rs

Abstract:

    File contains the NIST P-256 and P-384 domain parameters in the
    little-endian word order used by the coprocessor.

--*/

/// Largest number of limbs of any supported curve
pub const MAX_LIMBS: usize = 12;

/// Supported curves
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Curve {
    /// NIST P-256 (secp256r1)
    P256,

    /// NIST P-384 (secp384r1)
    P384,
}

/// Domain parameters of a short Weierstrass curve with `a = -3`
#[derive(Debug)]
pub struct CurveParams {
    /// Field prime `p`
    pub p: &'static [u32],

    /// Group order `q`
    pub q: &'static [u32],

    /// Curve constant `b`
    pub b: &'static [u32],

    /// Generator x coordinate
    pub gx: &'static [u32],

    /// Generator y coordinate
    pub gy: &'static [u32],

    /// `R mod p`, the Montgomery form of 1
    pub r_mod_p: &'static [u32],

    /// `R^2 mod p`
    pub r2_mod_p: &'static [u32],
}

impl Curve {
    /// Number of 32-bit limbs of a field element or scalar
    pub fn limbs(self) -> usize {
        match self {
            Curve::P256 => 8,
            Curve::P384 => 12,
        }
    }

    /// Bit length of the field and of the scalars
    pub fn bits(self) -> usize {
        self.limbs() * 32
    }

    pub fn params(self) -> &'static CurveParams {
        match self {
            Curve::P256 => &P256,
            Curve::P384 => &P384,
        }
    }
}

static P256: CurveParams = CurveParams {
    p: &[
        0xffffffff, 0xffffffff, 0xffffffff, 0x00000000, 0x00000000, 0x00000000, 0x00000001,
        0xffffffff,
    ],
    q: &[
        0xfc632551, 0xf3b9cac2, 0xa7179e84, 0xbce6faad, 0xffffffff, 0xffffffff, 0x00000000,
        0xffffffff,
    ],
    b: &[
        0x27d2604b, 0x3bce3c3e, 0xcc53b0f6, 0x651d06b0, 0x769886bc, 0xb3ebbd55, 0xaa3a93e7,
        0x5ac635d8,
    ],
    gx: &[
        0xd898c296, 0xf4a13945, 0x2deb33a0, 0x77037d81, 0x63a440f2, 0xf8bce6e5, 0xe12c4247,
        0x6b17d1f2,
    ],
    gy: &[
        0x37bf51f5, 0xcbb64068, 0x6b315ece, 0x2bce3357, 0x7c0f9e16, 0x8ee7eb4a, 0xfe1a7f9b,
        0x4fe342e2,
    ],
    r_mod_p: &[
        0x00000001, 0x00000000, 0x00000000, 0xffffffff, 0xffffffff, 0xffffffff, 0xfffffffe,
        0x00000000,
    ],
    r2_mod_p: &[
        0x00000003, 0x00000000, 0xffffffff, 0xfffffffb, 0xfffffffe, 0xffffffff, 0xfffffffd,
        0x00000004,
    ],
};

static P384: CurveParams = CurveParams {
    p: &[
        0xffffffff, 0x00000000, 0x00000000, 0xffffffff, 0xfffffffe, 0xffffffff, 0xffffffff,
        0xffffffff, 0xffffffff, 0xffffffff, 0xffffffff, 0xffffffff,
    ],
    q: &[
        0xccc52973, 0xecec196a, 0x48b0a77a, 0x581a0db2, 0xf4372ddf, 0xc7634d81, 0xffffffff,
        0xffffffff, 0xffffffff, 0xffffffff, 0xffffffff, 0xffffffff,
    ],
    b: &[
        0xd3ec2aef, 0x2a85c8ed, 0x8a2ed19d, 0xc656398d, 0x5013875a, 0x0314088f, 0xfe814112,
        0x181d9c6e, 0xe3f82d19, 0x988e056b, 0xe23ee7e4, 0xb3312fa7,
    ],
    gx: &[
        0x72760ab7, 0x3a545e38, 0xbf55296c, 0x5502f25d, 0x82542a38, 0x59f741e0, 0x8ba79b98,
        0x6e1d3b62, 0xf320ad74, 0x8eb1c71e, 0xbe8b0537, 0xaa87ca22,
    ],
    gy: &[
        0x90ea0e5f, 0x7a431d7c, 0x1d7e819d, 0x0a60b1ce, 0xb5f0b8c0, 0xe9da3113, 0x289a147c,
        0xf8f41dbd, 0x9292dc29, 0x5d9e98bf, 0x96262c6f, 0x3617de4a,
    ],
    r_mod_p: &[
        0x00000001, 0xffffffff, 0xffffffff, 0x00000000, 0x00000001, 0x00000000, 0x00000000,
        0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    ],
    r2_mod_p: &[
        0x00000001, 0xfffffffe, 0x00000000, 0x00000002, 0x00000000, 0xfffffffe, 0x00000000,
        0x00000002, 0x00000001, 0x00000000, 0x00000000, 0x00000000,
    ],
};
