// Licensed under the Apache-2.0 license

use casper_drivers::{Curve, Layout};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
pub struct Args {
    /// Mapping of the coprocessor RAM
    #[arg(long, value_enum, default_value_t = ArgsLayout::Interleaved)]
    pub layout: ArgsLayout,

    /// Log verbosity
    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute signature^exponent mod modulus
    ModExp {
        /// Signature, big-endian hex, at most as long as the modulus
        signature: String,

        /// Odd modulus, big-endian hex; its length sets the operand width
        modulus: String,

        /// Public exponent
        #[arg(long, default_value_t = 65537)]
        exponent: u32,
    },

    /// Compute k * P
    EccMul {
        #[arg(long, value_enum)]
        curve: ArgsCurve,

        /// Scalar, big-endian hex
        k: String,

        /// x of P, big-endian hex; the generator when omitted
        #[arg(long, requires = "y")]
        x: Option<String>,

        /// y of P, big-endian hex
        #[arg(long, requires = "x")]
        y: Option<String>,
    },

    /// Compute k1 * G + k2 * Q
    EccMulAdd {
        #[arg(long, value_enum)]
        curve: ArgsCurve,

        /// Scalar for the generator, big-endian hex
        k1: String,

        /// Scalar for Q, big-endian hex
        k2: String,

        /// x of Q, big-endian hex
        x: String,

        /// y of Q, big-endian hex
        y: String,
    },

    /// Check that (x, y) is on the curve
    OnCurve {
        #[arg(long, value_enum)]
        curve: ArgsCurve,

        x: String,

        y: String,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum ArgsLayout {
    Linear,
    Interleaved,
}

impl From<ArgsLayout> for Layout {
    fn from(value: ArgsLayout) -> Self {
        match value {
            ArgsLayout::Linear => Layout::Linear,
            ArgsLayout::Interleaved => Layout::Interleaved,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum ArgsCurve {
    P256,
    P384,
}

impl From<ArgsCurve> for Curve {
    fn from(value: ArgsCurve) -> Self {
        match value {
            ArgsCurve::P256 => Curve::P256,
            ArgsCurve::P384 => Curve::P384,
        }
    }
}
