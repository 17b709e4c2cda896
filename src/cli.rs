use std::str::FromStr;

use argp::FromArgs;
use picoboot_uf2::Family;

/// Builds a flashable UF2 image that turns a GameCube DOL into a PicoBoot payload.
#[derive(FromArgs, Debug)]
pub struct Args {
    /// be verbose (stack up to -vvvvv for trace output)
    #[argp(switch, short = 'v', global)]
    pub verbose: bool,

    /// base PicoBoot firmware image, in UF2 form
    #[argp(option, short = 'b')]
    pub base: String,

    /// GameCube DOL executable to wrap
    #[argp(option, short = 'd')]
    pub dol: String,

    /// target microcontroller family (rp2040 or rp2350)
    #[argp(option, short = 'f')]
    pub family: FamilyArg,

    /// merged UF2 image to write
    #[argp(option, short = 'o')]
    pub output: String,
}

/// Thin wrapper so [`Family`] can be parsed straight out of the command line.
#[derive(Debug, Clone, Copy)]
pub struct FamilyArg(pub Family);

impl FromStr for FamilyArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rp2040" => Ok(Self(Family::Rp2040)),
            "rp2350" => Ok(Self(Family::Rp2350)),
            other => Err(format!("unknown family \"{other}\", expected rp2040 or rp2350")),
        }
    }
}
