//! Encodes a small survey-page model and decodes an assignment.
//!
//! Run with:
//! ```bash
//! cargo run --example survey -- 0 1 3 7
//! ```
//!
//! The positional arguments are the bits set in the assignment. Without them,
//! the first satisfying assignments are enumerated instead.

use clap::Parser;
use color_eyre::eyre::ensure;
use combo_rs::builder::Builder;
use combo_rs::instance::BitArray;
use combo_rs::variable::Variable;

#[derive(Debug, Parser)]
#[command(author, version, about = "Encode a survey model and decode an assignment")]
struct Cli {
    /// Bits set in the assignment to decode
    bits: Vec<usize>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: simplelog::LevelFilter,

    /// Number of satisfying assignments to list when no bits are given
    #[arg(long, default_value = "5")]
    limit: usize,
}

/// Builds the assignment with the given bits set.
fn assignment(nbr_bits: usize, bits: &[usize]) -> color_eyre::Result<BitArray> {
    for &bit in bits {
        ensure!(bit < nbr_bits, "bit {} is outside the model's {} bits", bit, nbr_bits);
    }
    Ok(BitArray::from_bits(nbr_bits, bits.iter().copied()))
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    simplelog::TermLogger::init(
        cli.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut builder = Builder::new("survey");
    let root = builder.root().as_value();
    let theme = builder.nominal("theme", false, root, ["light", "dark", "sepia"])?;
    let banner = builder.flag("banner", true, root)?;
    let color = builder.nominal("banner_color", false, banner.as_value(), ["red", "blue"])?;
    let widgets = builder.multiple("widgets", true, root, ["clock", "weather", "news"])?;
    let model = builder.build();

    println!("bits = {}", model.nbr_bits());
    for (id, range) in model.index().ranges() {
        println!("- {} -> [{}, {})", id, range.start, range.end);
    }
    println!("constraints:");
    for constraint in model.constraints() {
        println!("- {}", constraint);
    }
    let outcomes = theme.outcomes() * banner.outcomes() * color.outcomes() * widgets.outcomes();
    println!("outcomes (upper bound) = {}", outcomes);

    let instances = if cli.bits.is_empty() {
        (0u32..1 << model.nbr_bits())
            .map(|mask| BitArray::from_bits(model.nbr_bits(), (0..model.nbr_bits()).filter(|ix| mask >> ix & 1 == 1)))
            .filter(|instance| model.is_satisfied(instance))
            .take(cli.limit)
            .collect()
    } else {
        vec![assignment(model.nbr_bits(), &cli.bits)?]
    };

    for instance in &instances {
        println!("----------------------------------");
        println!("instance = {:?}", instance.iter_ones().collect::<Vec<_>>());
        if !model.is_satisfied(instance) {
            println!("instance violates the model constraints");
            continue;
        }
        println!("{} = {:?}", theme.name(), model.value_of(&theme, instance));
        println!("{} = {:?}", banner.name(), model.value_of(&banner, instance));
        println!("{} = {:?}", color.name(), model.value_of(&color, instance));
        println!("{} = {:?}", widgets.name(), model.value_of(&widgets, instance));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment() {
        let instance = assignment(4, &[0, 3]).unwrap();
        assert_eq!(instance.iter_ones().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn test_assignment_bit_out_of_range() {
        let err = assignment(4, &[1, 4]).unwrap_err();
        assert_eq!(err.to_string(), "bit 4 is outside the model's 4 bits");
    }
}
