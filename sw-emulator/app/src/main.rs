/*++

Licensed under the Apache-2.0 license.

File Name:

    main.rs

Abstract:

    File contains main entrypoint for the CASPER emulator: runs driver
    operations against the emulated coprocessor.

--*/

use anyhow::{bail, Context};
use casper_drivers::{BignumEngine, Casper, Curve, EmuEngine};
use clap::Parser;
use simple_logger::SimpleLogger;

mod cli;
use cli::{Args, Commands};

/// Number of 32-bit words spanned by a big-endian hex string
fn hex_word_len(hex: &str) -> usize {
    hex.trim_start_matches("0x").len().div_ceil(8)
}

/// Big-endian hex to `len` little-endian words
fn words(hex: &str, len: usize) -> anyhow::Result<Vec<u32>> {
    let hex = hex.trim_start_matches("0x");
    let hex = if hex.len() % 2 == 1 {
        format!("0{}", hex)
    } else {
        hex.to_string()
    };
    let mut bytes = hex::decode(&hex).with_context(|| format!("invalid hex {:?}", hex))?;
    if bytes.len() > len * 4 {
        bail!("{} is longer than {} bits", hex, len * 32);
    }
    let mut padded = vec![0u8; len * 4 - bytes.len()];
    padded.append(&mut bytes);
    Ok(padded
        .rchunks(4)
        .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Little-endian words to big-endian hex
fn to_hex(words: &[u32]) -> String {
    words.iter().rev().map(|w| format!("{:08x}", w)).collect()
}

fn point(curve: Curve, x: &str, y: &str) -> anyhow::Result<(Vec<u32>, Vec<u32>)> {
    Ok((words(x, curve.limbs())?, words(y, curve.limbs())?))
}

/// `signature^exponent mod modulus`; the operand length follows the modulus
fn mod_exp<E: BignumEngine>(
    casper: &mut Casper<E>,
    signature: &str,
    modulus: &str,
    exponent: u32,
) -> anyhow::Result<Vec<u32>> {
    let word_len = hex_word_len(modulus);
    let le_bytes = |w: Vec<u32>| -> Vec<u8> { w.iter().flat_map(|v| v.to_le_bytes()).collect() };
    let s = le_bytes(words(signature, word_len).context("signature")?);
    let n = le_bytes(words(modulus, word_len)?);
    let mut m = vec![0u8; word_len * 4];
    casper.mod_exp(&s, &n, word_len, exponent, &mut m)?;
    Ok(m
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut casper = Casper::new(EmuEngine::new(args.layout.into()));

    match args.command {
        Commands::ModExp {
            signature,
            modulus,
            exponent,
        } => {
            let m = mod_exp(&mut casper, &signature, &modulus, exponent)?;
            println!("{}", to_hex(&m));
        }
        Commands::EccMul { curve, k, x, y } => {
            let curve: Curve = curve.into();
            let params = curve.params();
            let (x, y) = match (x, y) {
                (Some(x), Some(y)) => point(curve, &x, &y)?,
                _ => (params.gx.to_vec(), params.gy.to_vec()),
            };
            let k = words(&k, curve.limbs())?;
            let (mut rx, mut ry) = (vec![0u32; curve.limbs()], vec![0u32; curve.limbs()]);
            casper.ecc_mul(curve, &x, &y, &k, &mut rx, &mut ry)?;
            println!("x: {}", to_hex(&rx));
            println!("y: {}", to_hex(&ry));
        }
        Commands::EccMulAdd {
            curve,
            k1,
            k2,
            x,
            y,
        } => {
            let curve: Curve = curve.into();
            let params = curve.params();
            let (x, y) = point(curve, &x, &y)?;
            casper.validate_point(curve, &x, &y)?;
            let (k1, k2) = (words(&k1, curve.limbs())?, words(&k2, curve.limbs())?);
            let (mut rx, mut ry) = (vec![0u32; curve.limbs()], vec![0u32; curve.limbs()]);
            casper.ecc_mul_add(
                curve, params.gx, params.gy, &k1, &x, &y, &k2, &mut rx, &mut ry,
            )?;
            println!("x: {}", to_hex(&rx));
            println!("y: {}", to_hex(&ry));
        }
        Commands::OnCurve { curve, x, y } => {
            let curve: Curve = curve.into();
            let (x, y) = point(curve, &x, &y)?;
            println!("{}", casper.point_on_curve(curve, &x, &y)?);
        }
    }

    log::info!("{} coprocessor operations", casper.engine().op_count());
    Ok(())
}

fn main() {
    let args = Args::parse();
    let _ = SimpleLogger::new().with_level(args.log_level).init();
    run(args).unwrap_or_else(|e| {
        log::error!("Error: {:#}", e);
        std::process::exit(1);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_words() {
        assert_eq!(words("0x0102030405", 2).unwrap(), vec![0x0203_0405, 0x01]);
        assert_eq!(to_hex(&[0x0203_0405, 0x01]), "0000000102030405");
        assert!(words("010203040506070809", 2).is_err());
        assert!(words("zz", 2).is_err());
        assert_eq!(words("0x102", 1).unwrap(), vec![0x0102]);
        assert_eq!(hex_word_len("0x0000000100000000f"), 3);
    }

    #[test]
    fn test_mod_exp_width_from_modulus() {
        let mut casper = Casper::new(EmuEngine::new(casper_drivers::Layout::Linear));
        // 2^3 mod 2^32 + 15, with a signature much shorter than the modulus
        let m = mod_exp(&mut casper, "2", "0x000000010000000f", 3).unwrap();
        assert_eq!(to_hex(&m), "0000000000000008");
        // 2^32 + 16 = 1 mod 2^32 + 15
        let m = mod_exp(&mut casper, "0x100000010", "000000010000000f", 65537).unwrap();
        assert_eq!(m, vec![1, 0]);
        assert!(mod_exp(&mut casper, "0x0102030405060708090a", "0f", 3).is_err());
    }
}
