/*++

Licensed under the Apache-2.0 license.

File Name:

    test_rsa.rs

Abstract:

    File contains RSA modular exponentiation tests against known
    signatures and a software reference.

--*/

use casper_drivers::{Casper, CasperError, EmuEngine, Layout};
use crypto_bigint::modular::runtime_mod::{DynResidue, DynResidueParams};
use crypto_bigint::{Encoding, U1024};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const N_2048: &[&str] = &[
    "d6f61579064cab5f050f7e05af31f8f20b31bca2f239790915aa246bd58444be",
    "d3ba4c49096e30be6692a4d056bcddf90dca13bb2d26967f79ae463291939cc3",
    "3f6b8df94cb1da2426c1d939c0a6c87d6852b663edf891246232015729c00712",
    "6e350af5f3c2a85fd3e96277a6e0a9345035c42f57e026488722bd8180b2b37f",
    "65dec5d4f7e064db1b743df450cd577a8c67c6c8e176a4cbe9a81d250c596a7e",
    "b495d33ab46873681e4da3897b0b78422b47836a8b0a66b7ca960b13cdbd3798",
    "12b95ab142c704ebdad5762e9086432eaacc1916ae66a94670d7d628b79a1408",
    "ac892a9d85ba04a9ab14fe12feefbd2ccf6420c5d1a19f2a1aee7721c46c9cc9",
];

const S_2048: &[&str] = &[
    "166c91f09c279b8143441bb9c60fc29cb647cd612bf505097d15203274f83c50",
    "fa0f7c21d02e28bab51fffdd9cca40a7b05b90d8b7386d4cd392244f32e90cdf",
    "352de41a135a73d0b9a80c23b3daa2e3c2a36f54d8e8bd4fe5fa72c98b3eef09",
    "09b7fcc4f6c98bc81a2a0087fd5f9633ce6b9f9c439e027b028e6386eab7229a",
    "730bea43cc18ae6b291ea1fddcea88aa9a46461e8e0053a5787ffd200da6dc60",
    "6199dc2716e63ba12e20483e44d61966eb825859e994d52a61f2479107a5473d",
    "2c6628f477e9b8f0a85b9c2f1a2bf7d4b82818ad6fd4af70f87ec81b0d36f0b3",
    "61be9a0eceb724fb75efcf9b277e517d364f94e410e3530e6fc55d94410567fa",
];

const M_2048: &[&str] = &[
    "008e1908392219c94f60651855426bd8e3fd1e72e0b572930e4d5fa7b9181146",
    "c331b29b7328cb86bceef44c7f004c4a20e645b04b9270bad0ae2aba67ab78b7",
    "3555628b478535300c0837d9d3a736696a501458d59b47d2fde3aa07fb2fffab",
    "40dea3011084b9972433fff4705a4e8529996b4934503e28096c659f041b3fe4",
    "785291206fdacc93248e3b4d652c8db452ceaead8bb9bcd590388c6b2ba19c7f",
    "439f8459ee781c9e96a1025cadab61d13b8c085be90ba36e3a7492ee481a2997",
    "1e26dd586f22ab99f526ceb953d012d06a189c901467a9c9aa4546e04873ee08",
    "717432c0cdcc95eb3f05b0a1aade29d53e6992ad7ac341d13aadf9652ef01988",
];

const N_1024: &[&str] = &[
    "c2640a4675a0ab92be7a4bc52f17d4dfc3f54934043acbb17d0ca74bb22220ab",
    "6d123de927ceb94636bc6cf929062e51fa868bcd04c668ea2c95dd5d402eb287",
    "6fd776f6b4f7863a34fae9b03df3cfbe6225f836400532fef9166c8146062c46",
    "982f049954177d33d57681ee365e2ea09e1880b512a022caa6efa8b52f0b3e53",
];

const S_1024: &[&str] = &[
    "10c2be77ef1552a4b3122d2dfcdf4d96e975903d5700ca3793746de09de4754f",
    "3926eba1a2954d4fe07aefa98c77a1b5c642faca7d96fe63b70bbbbc653fd342",
    "93ff22db28f629cd283326e9fa6da96928e0cda8cfcc4cc3f18857eede9cd0fc",
    "7957b03bb336474c894fc7c5d2351257afa1f030e61311d27427e0046647c747",
];

const M_1024: &[&str] = &[
    "00284450018bab472163397557d8c47fde881f3943de3797e3e1d017ebe9a6de",
    "8892a88be1a893f1e444cb0a8c658d7df22b3432aab0677c9cd487ac0b96394d",
    "85035046d87257d218da9eecb83ca52f6280c4ad1ed19fc7c84c5571f0d14b97",
    "e3a1ff2478f8ca95ceb6e77bacf02ec3bd40f6b71019eee66e9e96db48f06c2d",
];

/// Big-endian hex to little-endian bytes
fn le_bytes(hex: &[&str]) -> Vec<u8> {
    let mut bytes = hex::decode(hex.concat()).unwrap();
    bytes.reverse();
    bytes
}

fn check_signature(layout: Layout, n: &[&str], s: &[&str], m: &[&str], e: u32) {
    let (n, s, m) = (le_bytes(n), le_bytes(s), le_bytes(m));
    let mut casper = Casper::new(EmuEngine::new(layout));
    let mut out = vec![0u8; n.len()];
    casper.mod_exp(&s, &n, n.len() / 4, e, &mut out).unwrap();
    assert_eq!(out, m);
}

#[test]
fn test_rsa2048_e65537() {
    check_signature(Layout::Linear, N_2048, S_2048, M_2048, 65537);
    check_signature(Layout::Interleaved, N_2048, S_2048, M_2048, 65537);
}

#[test]
fn test_rsa1024_e3() {
    check_signature(Layout::Linear, N_1024, S_1024, M_1024, 3);
    check_signature(Layout::Interleaved, N_1024, S_1024, M_1024, 3);
}

#[test]
fn test_random_against_reference() {
    let mut rng = StdRng::seed_from_u64(0x00ca_5be7);
    let mut casper = Casper::new(EmuEngine::new(Layout::Interleaved));
    for e in [3u32, 17, 65537, 0xdead_beef] {
        let mut n = [0u8; U1024::BYTES];
        let mut s = [0u8; U1024::BYTES];
        rng.fill(&mut n[..]);
        rng.fill(&mut s[..]);
        n[0] |= 1;
        n[U1024::BYTES - 1] |= 0x80;

        let modulus = U1024::from_le_bytes(n);
        let params = DynResidueParams::new(&modulus);
        let expected = DynResidue::new(&U1024::from_le_bytes(s), params)
            .pow(&U1024::from_u32(e))
            .retrieve();

        let mut out = [0u8; U1024::BYTES];
        casper.mod_exp(&s, &n, U1024::BYTES / 4, e, &mut out).unwrap();
        assert_eq!(U1024::from_le_bytes(out), expected);
    }
    assert!(casper.engine().op_count() > 0);
}

#[test]
fn test_odd_word_len() {
    // 96-bit modulus 2^95 + 3 is padded to two double-words
    let n = [3u32, 0, 0x8000_0000];
    let s = [0x1234_5678u32, 0x9abc_def0, 0x0fed_cba9];
    let to_bytes = |w: &[u32]| w.iter().flat_map(|v| v.to_le_bytes()).collect::<Vec<u8>>();
    let mut out = [0u8; 12];
    let mut casper = Casper::new(EmuEngine::new(Layout::Linear));
    casper
        .mod_exp(&to_bytes(&s), &to_bytes(&n), 3, 1, &mut out)
        .unwrap();
    assert_eq!(out.to_vec(), to_bytes(&s));
}

#[test]
fn test_invalid_modulus() {
    let mut casper = Casper::new(EmuEngine::new(Layout::Linear));
    let mut out = [0u8; 8];
    assert_eq!(
        casper.mod_exp(&[1; 8], &[2, 0, 0, 0, 0, 0, 0, 1], 2, 3, &mut out),
        Err(CasperError::DRIVER_CASPER_INVALID_MODULUS)
    );
    assert_eq!(
        casper.mod_exp(&[1; 8], &[1; 8], 129, 3, &mut out),
        Err(CasperError::DRIVER_CASPER_INVALID_WORD_LEN)
    );
}
